use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::lifecycle;
use crate::model::{Identity, ReportType, Student, StudentView};
use crate::policy::{authorize, student_scope, Action};
use crate::store::{Store, StudentFilter};

/// Student list scoped by role: admins see everyone, teachers only their
/// assigned students.
pub fn list(store: &Store, identity: &Identity) -> ApiResult<Vec<StudentView>> {
    authorize(identity, Action::ListStudents, None)?;
    let filter = StudentFilter {
        assigned_teacher_id: student_scope(identity),
        name_contains: None,
    };
    Ok(store.list_students(&filter)?)
}

/// Case-insensitive name substring search, scoped like `list`. A missing
/// query matches everything the caller may see.
pub fn search(store: &Store, identity: &Identity, name: Option<&str>) -> ApiResult<Vec<StudentView>> {
    authorize(identity, Action::SearchStudents, None)?;
    let filter = StudentFilter {
        assigned_teacher_id: student_scope(identity),
        name_contains: Some(name.unwrap_or("")),
    };
    Ok(store.list_students(&filter)?)
}

pub fn create(store: &Store, identity: &Identity, params: &Value) -> ApiResult<StudentView> {
    authorize(identity, Action::CreateStudent, None)?;

    let name = params
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Bad Request: Student name is required."))?;

    let student = store.create_student(name)?;
    Ok(StudentView {
        student,
        teacher: None,
    })
}

pub fn assign(
    store: &Store,
    identity: &Identity,
    student_id: &str,
    params: &Value,
) -> ApiResult<StudentView> {
    authorize(identity, Action::AssignTeacher, None)?;

    let teacher_id = params
        .get("teacherId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Bad Request: Teacher ID is required."))?;

    let mut student = fetch(store, student_id)?;
    lifecycle::ensure_mutable(&student)?;
    if store.teacher_by_id(teacher_id)?.is_none() {
        return Err(ApiError::not_found("Teacher not found."));
    }

    lifecycle::assign(&mut student, teacher_id)?;
    store.save_student(&student)?;
    view_of(store, student_id)
}

pub fn unassign(store: &Store, identity: &Identity, student_id: &str) -> ApiResult<StudentView> {
    authorize(identity, Action::UnassignTeacher, None)?;

    let mut student = fetch(store, student_id)?;
    lifecycle::unassign(&mut student)?;
    store.save_student(&student)?;
    view_of(store, student_id)
}

pub fn grade(
    store: &Store,
    identity: &Identity,
    student_id: &str,
    params: &Value,
) -> ApiResult<StudentView> {
    authorize(identity, Action::GradeStudent, None)?;

    let report_type = params
        .get("reportType")
        .and_then(Value::as_str)
        .and_then(ReportType::parse)
        .ok_or_else(|| {
            ApiError::validation("Bad Request: Valid reportType (progress or final) is required.")
        })?;
    // Non-integer grades never reach the record; range and type failures
    // share one message.
    let grade_value = params
        .get("grade")
        .and_then(Value::as_i64)
        .filter(|g| (lifecycle::GRADE_MIN..=lifecycle::GRADE_MAX).contains(g))
        .ok_or_else(|| {
            ApiError::validation("Bad Request: Grade must be a number between 0 and 100.")
        })?;

    let mut student = fetch(store, student_id)?;
    authorize(identity, Action::GradeStudent, Some(&student))?;

    lifecycle::set_grade(&mut student, report_type, grade_value)?;
    store.save_student(&student)?;
    view_of(store, student_id)
}

pub fn finalize(store: &Store, identity: &Identity, student_id: &str) -> ApiResult<StudentView> {
    authorize(identity, Action::FinalizeStudent, None)?;

    let mut student = fetch(store, student_id)?;
    authorize(identity, Action::FinalizeStudent, Some(&student))?;

    lifecycle::finalize(&mut student)?;
    store.save_student(&student)?;
    view_of(store, student_id)
}

pub fn unfinalize(store: &Store, identity: &Identity, student_id: &str) -> ApiResult<StudentView> {
    authorize(identity, Action::UnfinalizeStudent, None)?;

    let mut student = fetch(store, student_id)?;
    lifecycle::unfinalize(&mut student)?;
    store.save_student(&student)?;
    view_of(store, student_id)
}

pub fn delete(store: &Store, identity: &Identity, student_id: &str) -> ApiResult<()> {
    authorize(identity, Action::DeleteStudent, None)?;

    let student = fetch(store, student_id)?;
    lifecycle::ensure_deletable(&student)?;
    store.delete_student(student_id)?;
    Ok(())
}

fn fetch(store: &Store, student_id: &str) -> ApiResult<Student> {
    store
        .student_by_id(student_id)?
        .ok_or_else(|| ApiError::not_found("Student not found."))
}

fn view_of(store: &Store, student_id: &str) -> ApiResult<StudentView> {
    store.student_view(student_id)?.ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!("student {student_id} missing after update"))
    })
}
