//! Bootstrap seeding for the fixed teacher roster.
//!
//! Runs at startup and again on teacher login; lookup is by name, so
//! repeated runs never duplicate a teacher.

use crate::model::Teacher;
use crate::store::Store;

/// Teacher identities that must always exist. These back the prototype
/// credential list in `handlers::auth`.
pub const SEED_TEACHER_NAMES: [&str; 2] = ["Professor Smith", "Dr. Johnson"];

/// Find a teacher by name, creating it with a fresh id when absent.
pub fn ensure_teacher(store: &Store, name: &str) -> anyhow::Result<Teacher> {
    if let Some(existing) = store.teacher_by_name(name)? {
        return Ok(existing);
    }
    let created = store.create_teacher(name)?;
    tracing::info!(teacher = name, id = %created.id, "seeded teacher record");
    Ok(created)
}

pub fn ensure_seed_teachers(store: &Store) -> anyhow::Result<Vec<Teacher>> {
    SEED_TEACHER_NAMES
        .iter()
        .map(|name| ensure_teacher(store, name))
        .collect()
}
