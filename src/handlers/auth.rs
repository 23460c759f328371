//! Login against the hardcoded prototype credential list.
//!
//! This is a stand-in for a real identity provider; everything downstream
//! consumes only the resolved `Identity`, so swapping in verified sessions
//! touches this module alone.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::model::Role;
use crate::seed::ensure_teacher;
use crate::store::Store;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

struct TeacherCredential {
    username: &'static str,
    password: &'static str,
    /// Name of the backing teacher record, upserted on first login.
    teacher_name: &'static str,
}

const TEACHER_CREDENTIALS: [TeacherCredential; 2] = [
    TeacherCredential {
        username: "teacher1",
        password: "pass123",
        teacher_name: "Professor Smith",
    },
    TeacherCredential {
        username: "teacher2",
        password: "pass456",
        teacher_name: "Dr. Johnson",
    },
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub role: Role,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub message: String,
}

pub fn login(store: &Store, params: &Value) -> ApiResult<LoginResponse> {
    let username = params.get("username").and_then(Value::as_str);
    let password = params.get("password").and_then(Value::as_str);
    let (username, password) = match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(ApiError::validation(
                "Username and password are required",
            ))
        }
    };

    if username == ADMIN_USERNAME && password == ADMIN_PASSWORD {
        return Ok(LoginResponse {
            role: Role::Admin,
            // The admin is not backed by a record; the fixed id is only used
            // for identity echoing.
            user_id: "admin".to_string(),
            user_name: None,
            message: "Login successful".to_string(),
        });
    }

    if let Some(cred) = TEACHER_CREDENTIALS
        .iter()
        .find(|c| c.username == username && c.password == password)
    {
        let teacher = ensure_teacher(store, cred.teacher_name)?;
        return Ok(LoginResponse {
            role: Role::Teacher,
            user_id: teacher.id,
            user_name: Some(teacher.name),
            message: "Login successful".to_string(),
        });
    }

    Err(ApiError::InvalidCredentials("Invalid credentials".to_string()))
}
