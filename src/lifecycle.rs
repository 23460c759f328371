//! Record lifecycle state machine.
//!
//! A student's state is derived from its fields; the only stored flag is
//! `finalized`. Every transition validates its preconditions before touching
//! the record, so a rejected call never leaves a partial update behind.
//! Ownership and role checks live in `policy`; this module only enforces
//! state.

use crate::error::{ApiError, ApiResult};
use crate::model::{ReportType, Student};

pub const GRADE_MIN: i64 = 0;
pub const GRADE_MAX: i64 = 100;

/// Derived lifecycle state, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Unassigned,
    AssignedUngraded,
    PartiallyGraded,
    Finalized,
}

pub fn state(student: &Student) -> RecordState {
    if student.finalized {
        RecordState::Finalized
    } else if student.assigned_teacher_id.is_none() {
        RecordState::Unassigned
    } else if student.progress_report_grade.is_none() && student.final_report_grade.is_none() {
        RecordState::AssignedUngraded
    } else {
        RecordState::PartiallyGraded
    }
}

/// Finalized records reject every normal edit; callers that need the check
/// ahead of other lookups (assign checks it before resolving the teacher)
/// use this directly.
pub fn ensure_mutable(student: &Student) -> ApiResult<()> {
    if student.finalized {
        return Err(ApiError::conflict("Conflict: Cannot modify a finalized record."));
    }
    Ok(())
}

/// Point the record at a teacher. Reassignment overwrites; grades entered by
/// a previous teacher are left intact (see DESIGN.md).
pub fn assign(student: &mut Student, teacher_id: &str) -> ApiResult<()> {
    ensure_mutable(student)?;
    student.assigned_teacher_id = Some(teacher_id.to_string());
    Ok(())
}

/// Clear the teacher link. Grades are left intact.
pub fn unassign(student: &mut Student) -> ApiResult<()> {
    ensure_mutable(student)?;
    student.assigned_teacher_id = None;
    Ok(())
}

pub fn set_grade(student: &mut Student, kind: ReportType, grade: i64) -> ApiResult<()> {
    if !(GRADE_MIN..=GRADE_MAX).contains(&grade) {
        return Err(ApiError::validation(
            "Bad Request: Grade must be a number between 0 and 100.",
        ));
    }
    ensure_mutable(student)?;
    match kind {
        ReportType::Progress => student.progress_report_grade = Some(grade),
        ReportType::Final => student.final_report_grade = Some(grade),
    }
    Ok(())
}

/// One-way gate: requires a final report grade and a not-yet-finalized
/// record. The progress grade is not consulted.
pub fn finalize(student: &mut Student) -> ApiResult<()> {
    if student.finalized {
        return Err(ApiError::conflict("Conflict: Record is already finalized."));
    }
    if student.final_report_grade.is_none() {
        return Err(ApiError::conflict(
            "Conflict: Final report grade must be entered before finalizing.",
        ));
    }
    student.finalized = true;
    Ok(())
}

/// Admin override reopening a finalized record. Clears only the flag;
/// grades and assignment stay as they were.
pub fn unfinalize(student: &mut Student) -> ApiResult<()> {
    if !student.finalized {
        return Err(ApiError::conflict("Conflict: Record is not finalized."));
    }
    student.finalized = false;
    Ok(())
}

pub fn ensure_deletable(student: &Student) -> ApiResult<()> {
    if student.finalized {
        return Err(ApiError::conflict("Conflict: Cannot delete a finalized record."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student {
            id: "s1".into(),
            name: "Alice".into(),
            assigned_teacher_id: None,
            progress_report_grade: None,
            final_report_grade: None,
            finalized: false,
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn state_is_derived_from_fields() {
        let mut s = student();
        assert_eq!(state(&s), RecordState::Unassigned);

        s.assigned_teacher_id = Some("t1".into());
        assert_eq!(state(&s), RecordState::AssignedUngraded);

        s.progress_report_grade = Some(60);
        assert_eq!(state(&s), RecordState::PartiallyGraded);

        s.final_report_grade = Some(85);
        s.finalized = true;
        assert_eq!(state(&s), RecordState::Finalized);
    }

    #[test]
    fn finalize_requires_a_final_grade() {
        let mut s = student();
        s.assigned_teacher_id = Some("t1".into());
        let err = finalize(&mut s).expect_err("no final grade yet");
        assert!(matches!(err, ApiError::Conflict(_)));
        assert!(!s.finalized);

        s.final_report_grade = Some(85);
        finalize(&mut s).expect("finalize");
        assert!(s.finalized);
    }

    #[test]
    fn finalized_records_reject_every_mutation() {
        let mut s = student();
        s.assigned_teacher_id = Some("t1".into());
        s.final_report_grade = Some(85);
        finalize(&mut s).expect("finalize");

        assert!(matches!(assign(&mut s, "t2"), Err(ApiError::Conflict(_))));
        assert!(matches!(unassign(&mut s), Err(ApiError::Conflict(_))));
        assert!(matches!(
            set_grade(&mut s, ReportType::Progress, 50),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(finalize(&mut s), Err(ApiError::Conflict(_))));
        assert!(matches!(ensure_deletable(&s), Err(ApiError::Conflict(_))));

        // The record itself is untouched by the rejected calls.
        assert_eq!(s.assigned_teacher_id.as_deref(), Some("t1"));
        assert_eq!(s.final_report_grade, Some(85));
        assert!(s.finalized);
    }

    #[test]
    fn grade_range_is_checked_before_state() {
        let mut s = student();
        s.assigned_teacher_id = Some("t1".into());
        s.finalized = true;
        s.final_report_grade = Some(90);

        // Out-of-range reports 400 even though the record is also finalized.
        let err = set_grade(&mut s, ReportType::Final, 101).expect_err("out of range");
        assert!(matches!(err, ApiError::Validation(_)));

        let mut open = student();
        assert!(set_grade(&mut open, ReportType::Final, -1).is_err());
        set_grade(&mut open, ReportType::Final, 0).expect("lower bound");
        set_grade(&mut open, ReportType::Final, 100).expect("upper bound");
        assert_eq!(open.final_report_grade, Some(100));
    }

    #[test]
    fn unfinalize_only_clears_the_flag() {
        let mut s = student();
        assert!(matches!(unfinalize(&mut s), Err(ApiError::Conflict(_))));

        s.assigned_teacher_id = Some("t1".into());
        s.progress_report_grade = Some(70);
        s.final_report_grade = Some(85);
        s.finalized = true;

        unfinalize(&mut s).expect("unfinalize");
        assert!(!s.finalized);
        assert_eq!(s.assigned_teacher_id.as_deref(), Some("t1"));
        assert_eq!(s.progress_report_grade, Some(70));
        assert_eq!(s.final_report_grade, Some(85));
    }

    #[test]
    fn unassign_keeps_grades() {
        let mut s = student();
        s.assigned_teacher_id = Some("t1".into());
        s.progress_report_grade = Some(70);
        unassign(&mut s).expect("unassign");
        assert_eq!(s.assigned_teacher_id, None);
        assert_eq!(s.progress_report_grade, Some(70));
        assert_eq!(state(&s), RecordState::PartiallyGraded);
    }
}
