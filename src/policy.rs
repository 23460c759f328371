//! Authorization policy: given a caller identity and an intended action,
//! allow or deny. Denials carry the operation-specific reason. State
//! preconditions (finalized and friends) are `lifecycle`'s job; this module
//! decides role and ownership only.

use crate::error::{ApiError, ApiResult};
use crate::model::{Identity, Role, Student};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListStudents,
    SearchStudents,
    CreateStudent,
    AssignTeacher,
    UnassignTeacher,
    GradeStudent,
    FinalizeStudent,
    UnfinalizeStudent,
    DeleteStudent,
    ListTeachers,
}

/// Check whether `identity` may perform `action`.
///
/// Callers invoke this twice for teacher-owned mutations: once before the
/// record lookup (role only, `target: None`) so role failures precede 404s,
/// and once after (`target: Some(..)`) for the ownership check.
pub fn authorize(identity: &Identity, action: Action, target: Option<&Student>) -> ApiResult<()> {
    match action {
        Action::ListStudents => match (identity.role, &identity.user_id) {
            (Some(Role::Admin), _) => Ok(()),
            (Some(Role::Teacher), Some(_)) => Ok(()),
            _ => Err(ApiError::forbidden(
                "Forbidden: Access denied or missing user ID.",
            )),
        },
        Action::SearchStudents => match (identity.role, &identity.user_id) {
            (Some(Role::Admin), _) => Ok(()),
            (Some(Role::Teacher), Some(_)) => Ok(()),
            _ => Err(ApiError::forbidden("Forbidden: Access denied.")),
        },
        Action::CreateStudent => {
            admin_only(identity, "Forbidden: Only admins can add students.")
        }
        Action::AssignTeacher => {
            admin_only(identity, "Forbidden: Only admins can assign teachers.")
        }
        Action::UnassignTeacher => {
            admin_only(identity, "Forbidden: Only admins can unassign teachers.")
        }
        Action::UnfinalizeStudent => admin_only(
            identity,
            "Forbidden: Only admins can unfinalize student records.",
        ),
        Action::DeleteStudent => {
            admin_only(identity, "Forbidden: Only admins can delete students.")
        }
        Action::ListTeachers => admin_only(
            identity,
            "Forbidden: Only admins can access the teacher list.",
        ),
        Action::GradeStudent => {
            assigned_teacher_only(identity, target, "Forbidden: Only teachers can grade students.")
        }
        Action::FinalizeStudent => assigned_teacher_only(
            identity,
            target,
            "Forbidden: Only teachers can finalize student records.",
        ),
    }
}

/// The student-list scope for an already-authorized caller: admins see
/// everyone, teachers only their own students.
pub fn student_scope(identity: &Identity) -> Option<&str> {
    match identity.role {
        Some(Role::Teacher) => identity.user_id.as_deref(),
        _ => None,
    }
}

fn admin_only(identity: &Identity, reason: &str) -> ApiResult<()> {
    match identity.role {
        Some(Role::Admin) => Ok(()),
        Some(Role::Teacher) | None => Err(ApiError::forbidden(reason)),
    }
}

fn assigned_teacher_only(
    identity: &Identity,
    target: Option<&Student>,
    role_reason: &str,
) -> ApiResult<()> {
    let user_id = match (identity.role, &identity.user_id) {
        (Some(Role::Teacher), Some(user_id)) => user_id,
        _ => return Err(ApiError::forbidden(role_reason)),
    };
    if let Some(student) = target {
        if student.assigned_teacher_id.as_deref() != Some(user_id.as_str()) {
            return Err(ApiError::forbidden(
                "Forbidden: You are not assigned to this student.",
            ));
        }
    }
    Ok(())
}
