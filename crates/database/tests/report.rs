mod common;

use common::{admin, branch, date, employee, group, midnight, setup_db, student};
use database::{
    ServiceError,
    services::{
        attendance::{AttendanceEntry, AttendanceService},
        dashboard::DashboardService,
        enrollment::EnrollmentService,
        report::ReportService,
        student::StudentService,
    },
};
use models::{AttendanceStatus, DayPattern};

fn entry(student_id: uuid::Uuid, status: AttendanceStatus, due: bool) -> AttendanceEntry {
    AttendanceEntry {
        student_id,
        status,
        is_installment_due: due,
    }
}

#[tokio::test]
async fn test_group_report() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    let alice = student(&db, &admin, north.id, "Alice").await;
    let bob = student(&db, &admin, north.id, "Bob").await;

    for s in [&alice, &bob] {
        EnrollmentService::enroll(&db, &admin, s.id, alpha.id, Some(midnight(date(2025, 1, 1))))
            .await
            .unwrap();
    }

    AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        date(2025, 1, 4),
        vec![
            entry(alice.id, AttendanceStatus::Present, true),
            entry(bob.id, AttendanceStatus::Absent, false),
        ],
    )
    .await
    .unwrap();

    // Bob has no record for the second lecture
    AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        date(2025, 1, 7),
        vec![entry(alice.id, AttendanceStatus::Excused, false)],
    )
    .await
    .unwrap();

    let report = ReportService::group_report(&db, &admin, alpha.id, None, None)
        .await
        .unwrap();
    assert_eq!(report.sessions.len(), 2);
    assert_eq!(report.lectures_held, 2);
    assert_eq!(report.lectures_remaining, 6);

    let alice_row = &report.rows[0];
    assert_eq!(alice_row.student.id, alice.id);
    assert_eq!(
        alice_row.statuses,
        vec![Some(AttendanceStatus::Present), Some(AttendanceStatus::Excused)]
    );
    assert_eq!(alice_row.counts.present, 1);
    assert_eq!(alice_row.counts.excused, 1);
    assert_eq!(alice_row.installments_due, 1);
    assert_eq!(alice_row.attendance_rate, Some(0.5));

    let bob_row = &report.rows[1];
    assert_eq!(bob_row.statuses, vec![Some(AttendanceStatus::Absent), None]);
    assert_eq!(bob_row.attendance_rate, Some(0.0));

    // The range narrows the sessions but not the lecture totals
    let ranged = ReportService::group_report(
        &db,
        &admin,
        alpha.id,
        Some(date(2025, 1, 5)),
        Some(date(2025, 1, 31)),
    )
    .await
    .unwrap();
    assert_eq!(ranged.sessions.len(), 1);
    assert_eq!(ranged.sessions[0].lecture_number, 2);
    assert_eq!(ranged.lectures_held, 2);
    assert_eq!(ranged.rows[1].attendance_rate, None);

    let err = ReportService::group_report(
        &db,
        &admin,
        alpha.id,
        Some(date(2025, 2, 1)),
        Some(date(2025, 1, 1)),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref e) if e.contains("to")));

    let summary = StudentService::attendance_summary(&db, &admin, alice.id)
        .await
        .unwrap();
    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.records[0].date, date(2025, 1, 4));
    assert_eq!(summary.records[0].group_name, "Alpha");
    assert_eq!(summary.counts.total(), 2);
    assert_eq!(summary.installments_due, 1);
}

#[tokio::test]
async fn test_dashboard_counts_are_scoped() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let south = branch(&db, &admin, "South").await;

    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    group(&db, &admin, north.id, "Beta", DayPattern::MonThu).await;
    group(&db, &admin, south.id, "Far", DayPattern::SatTue).await;

    let alice = student(&db, &admin, north.id, "Alice").await;
    student(&db, &admin, south.id, "Bob").await;
    EnrollmentService::enroll(&db, &admin, alice.id, alpha.id, None)
        .await
        .unwrap();

    let saturday = date(2025, 1, 4);

    let overall = DashboardService::overview(&db, &admin, saturday)
        .await
        .unwrap();
    assert_eq!(overall.branches, 2);
    assert_eq!(overall.active_groups, 3);
    assert_eq!(overall.students, 2);
    assert_eq!(overall.open_enrollments, 1);
    assert_eq!(overall.groups_today, 2);

    let clerk = employee(&db, "Clerk", south.id).await;
    let local = DashboardService::overview(&db, &clerk, saturday)
        .await
        .unwrap();
    assert_eq!(local.branches, 1);
    assert_eq!(local.active_groups, 1);
    assert_eq!(local.students, 1);
    assert_eq!(local.open_enrollments, 0);
    assert_eq!(local.groups_today, 1);

    let friday = DashboardService::overview(&db, &admin, date(2025, 1, 10))
        .await
        .unwrap();
    assert_eq!(friday.groups_today, 0);
}
