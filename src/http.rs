//! Axum HTTP surface. Handlers are thin: resolve the caller identity from
//! the request headers, lock the store, and delegate to the operation layer.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::handlers::{auth, students, teachers};
use crate::model::Identity;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> AppState {
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(api_root))
        .route("/login", post(login))
        .route("/api/students", get(students_list).post(students_create))
        .route("/api/students/search", get(students_search))
        .route("/api/students/{id}/assign", put(students_assign))
        .route("/api/students/{id}/unassign", put(students_unassign))
        .route("/api/students/{id}/grade", put(students_grade))
        .route("/api/students/{id}/finalize", put(students_finalize))
        .route("/api/students/{id}/unfinalize", put(students_unfinalize))
        .route("/api/students/{id}", delete(students_delete))
        .route("/api/teachers", get(teachers_list))
        .with_state(state)
}

/// Identity Resolver: map the role/user-id headers to an `Identity`. The
/// headers are trusted as-is in this prototype; a verified session source
/// slots in here without touching the policy downstream.
fn identity_from_headers(headers: &HeaderMap) -> Identity {
    let role = headers.get("x-user-role").and_then(|v| v.to_str().ok());
    let user_id = headers.get("x-user-id").and_then(|v| v.to_str().ok());
    Identity::resolve(role, user_id)
}

async fn api_root() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to the roster administration API!" }))
}

async fn login(State(state): State<AppState>, Json(body): Json<Value>) -> ApiResult<impl IntoResponse> {
    let store = state.store.lock();
    Ok(Json(auth::login(&store, &body)?))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    name: Option<String>,
}

async fn students_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::list(&store, &ident)?))
}

async fn students_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::search(&store, &ident, query.name.as_deref())?))
}

async fn students_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    let created = students::create(&store, &ident, &body)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn students_assign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::assign(&store, &ident, &id, &body)?))
}

async fn students_unassign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::unassign(&store, &ident, &id)?))
}

async fn students_grade(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::grade(&store, &ident, &id, &body)?))
}

async fn students_finalize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::finalize(&store, &ident, &id)?))
}

async fn students_unfinalize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(students::unfinalize(&store, &ident, &id)?))
}

async fn students_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    students::delete(&store, &ident, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn teachers_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let ident = identity_from_headers(&headers);
    let store = state.store.lock();
    Ok(Json(teachers::list(&store, &ident)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn identity_comes_from_the_two_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-role", HeaderValue::from_static("teacher"));
        headers.insert("x-user-id", HeaderValue::from_static("t1"));
        let ident = identity_from_headers(&headers);
        assert_eq!(ident, Identity::teacher("t1"));

        let ident = identity_from_headers(&HeaderMap::new());
        assert_eq!(ident.role, None);
        assert_eq!(ident.user_id, None);
    }
}
