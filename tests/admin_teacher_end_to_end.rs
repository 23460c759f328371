use rosterd::error::ApiError;
use rosterd::handlers::students;
use rosterd::model::Identity;
use rosterd::store::Store;
use serde_json::json;

fn store_with_teachers() -> (Store, String, String) {
    let store = Store::open_in_memory().expect("open in-memory store");
    let teachers = rosterd::seed::ensure_seed_teachers(&store).expect("seed teachers");
    let t1 = teachers[0].id.clone();
    let t2 = teachers[1].id.clone();
    (store, t1, t2)
}

#[test]
fn full_admin_and_teacher_flow_from_create_to_delete() {
    let (store, t1, _) = store_with_teachers();
    let admin = Identity::admin();
    let teacher = Identity::teacher(&t1);

    // Admin creates the student.
    let created = students::create(&store, &admin, &json!({ "name": "Alice" }))
        .expect("create student");
    let id = created.student.id.clone();
    assert_eq!(created.student.name, "Alice");
    assert!(!created.student.finalized);

    // Admin assigns teacher T1; the response carries the joined teacher.
    let assigned = students::assign(&store, &admin, &id, &json!({ "teacherId": t1 }))
        .expect("assign teacher");
    assert_eq!(assigned.student.assigned_teacher_id.as_deref(), Some(t1.as_str()));
    assert_eq!(
        assigned.teacher.as_ref().map(|t| t.name.as_str()),
        Some("Professor Smith")
    );

    // T1 enters the final grade and finalizes.
    let graded = students::grade(
        &store,
        &teacher,
        &id,
        &json!({ "reportType": "final", "grade": 85 }),
    )
    .expect("enter final grade");
    assert_eq!(graded.student.final_report_grade, Some(85));

    let finalized = students::finalize(&store, &teacher, &id).expect("finalize");
    assert!(finalized.student.finalized);

    // Further grading now conflicts, and the grade is untouched.
    let err = students::grade(
        &store,
        &teacher,
        &id,
        &json!({ "reportType": "final", "grade": 60 }),
    )
    .expect_err("finalized record rejects grading");
    assert!(matches!(err, ApiError::Conflict(_)));
    let after = store.student_by_id(&id).expect("query").expect("present");
    assert_eq!(after.final_report_grade, Some(85));
    assert!(after.finalized);

    // Deleting a finalized record conflicts as well.
    let err = students::delete(&store, &admin, &id).expect_err("finalized record survives delete");
    assert_eq!(err.status().as_u16(), 409);

    // Admin unfinalizes, then delete succeeds.
    let reopened = students::unfinalize(&store, &admin, &id).expect("unfinalize");
    assert!(!reopened.student.finalized);
    assert_eq!(reopened.student.final_report_grade, Some(85));

    students::delete(&store, &admin, &id).expect("delete after unfinalize");
    assert!(store.student_by_id(&id).expect("query").is_none());
}

#[test]
fn finalize_without_final_grade_leaves_record_open() {
    let (store, t1, _) = store_with_teachers();
    let admin = Identity::admin();
    let teacher = Identity::teacher(&t1);

    let id = students::create(&store, &admin, &json!({ "name": "Bob" }))
        .expect("create")
        .student
        .id;
    students::assign(&store, &admin, &id, &json!({ "teacherId": t1 })).expect("assign");

    // A progress grade alone is not enough.
    students::grade(
        &store,
        &teacher,
        &id,
        &json!({ "reportType": "progress", "grade": 70 }),
    )
    .expect("progress grade");

    let err = students::finalize(&store, &teacher, &id).expect_err("final grade missing");
    assert!(matches!(err, ApiError::Conflict(_)));

    let after = store.student_by_id(&id).expect("query").expect("present");
    assert!(!after.finalized);
    assert_eq!(after.progress_report_grade, Some(70));
}

#[test]
fn unassigned_former_teacher_loses_access() {
    let (store, t1, _) = store_with_teachers();
    let admin = Identity::admin();
    let teacher = Identity::teacher(&t1);

    let id = students::create(&store, &admin, &json!({ "name": "Carol" }))
        .expect("create")
        .student
        .id;
    students::assign(&store, &admin, &id, &json!({ "teacherId": t1 })).expect("assign");
    students::grade(
        &store,
        &teacher,
        &id,
        &json!({ "reportType": "progress", "grade": 55 }),
    )
    .expect("grade while assigned");

    let unassigned = students::unassign(&store, &admin, &id).expect("unassign");
    assert_eq!(unassigned.student.assigned_teacher_id, None);
    // Grades from the previous assignment are retained.
    assert_eq!(unassigned.student.progress_report_grade, Some(55));

    let err = students::grade(
        &store,
        &teacher,
        &id,
        &json!({ "reportType": "progress", "grade": 60 }),
    )
    .expect_err("former teacher is no longer the owner");
    assert_eq!(err.status().as_u16(), 403);
}

#[test]
fn reassignment_overwrites_and_keeps_grades() {
    let (store, t1, t2) = store_with_teachers();
    let admin = Identity::admin();

    let id = students::create(&store, &admin, &json!({ "name": "Dave" }))
        .expect("create")
        .student
        .id;
    students::assign(&store, &admin, &id, &json!({ "teacherId": t1 })).expect("assign t1");
    students::grade(
        &store,
        &Identity::teacher(&t1),
        &id,
        &json!({ "reportType": "progress", "grade": 40 }),
    )
    .expect("t1 grades");

    let reassigned = students::assign(&store, &admin, &id, &json!({ "teacherId": t2 }))
        .expect("reassign to t2");
    assert_eq!(
        reassigned.student.assigned_teacher_id.as_deref(),
        Some(t2.as_str())
    );
    assert_eq!(reassigned.student.progress_report_grade, Some(40));

    // The new teacher can grade, the old one cannot.
    assert!(students::grade(
        &store,
        &Identity::teacher(&t2),
        &id,
        &json!({ "reportType": "final", "grade": 88 }),
    )
    .is_ok());
    assert!(students::grade(
        &store,
        &Identity::teacher(&t1),
        &id,
        &json!({ "reportType": "final", "grade": 10 }),
    )
    .is_err());
}

#[test]
fn assign_rejects_unknown_ids_and_missing_body() {
    let (store, t1, _) = store_with_teachers();
    let admin = Identity::admin();

    let id = students::create(&store, &admin, &json!({ "name": "Eve" }))
        .expect("create")
        .student
        .id;

    let err = students::assign(&store, &admin, &id, &json!({}))
        .expect_err("teacherId is required");
    assert_eq!(err.status().as_u16(), 400);

    let err = students::assign(&store, &admin, &id, &json!({ "teacherId": "nope" }))
        .expect_err("unknown teacher");
    assert_eq!(err.to_string(), "Teacher not found.");

    let err = students::assign(&store, &admin, "nope", &json!({ "teacherId": t1 }))
        .expect_err("unknown student");
    assert_eq!(err.to_string(), "Student not found.");
}
