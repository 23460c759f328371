use crate::error::ApiResult;
use crate::model::{Identity, Teacher};
use crate::policy::{authorize, Action};
use crate::store::Store;

/// Full teacher list, admin only.
pub fn list(store: &Store, identity: &Identity) -> ApiResult<Vec<Teacher>> {
    authorize(identity, Action::ListTeachers, None)?;
    Ok(store.list_teachers()?)
}
