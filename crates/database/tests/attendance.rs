mod common;

use common::{admin, at, branch, date, employee, group, midnight, setup_db, student};
use database::{
    ServiceError,
    entities::{attendances, lecture_sessions},
    services::{
        attendance::{AttendanceEntry, AttendanceService},
        enrollment::EnrollmentService,
        group::GroupService,
    },
};
use models::{AttendanceStatus, DayPattern};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, PaginatorTrait};

fn saturday() -> chrono::NaiveDate {
    date(2025, 1, 4)
}

fn entry(student_id: uuid::Uuid, status: AttendanceStatus) -> AttendanceEntry {
    AttendanceEntry {
        student_id,
        status,
        is_installment_due: false,
    }
}

#[tokio::test]
async fn test_active_groups_follow_day_pattern() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;

    let sat_tue = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    group(&db, &admin, north.id, "Beta", DayPattern::SunWed).await;
    let paused = group(&db, &admin, north.id, "Gamma", DayPattern::SatTue).await;
    GroupService::toggle_status(&db, &admin, paused.id)
        .await
        .unwrap();

    let alice = student(&db, &admin, north.id, "Alice").await;
    EnrollmentService::enroll(&db, &admin, alice.id, sat_tue.id, Some(midnight(date(2025, 1, 1))))
        .await
        .unwrap();

    let groups = AttendanceService::active_groups_for_date(&db, &admin, saturday())
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].group.id, sat_tue.id);
    assert_eq!(groups[0].roster.len(), 1);
    assert!(groups[0].session.is_none());

    // Tuesday follows the same pattern
    let tuesday = AttendanceService::active_groups_for_date(&db, &admin, date(2025, 1, 7))
        .await
        .unwrap();
    assert_eq!(tuesday.len(), 1);

    // No pattern covers Friday
    let friday = AttendanceService::active_groups_for_date(&db, &admin, date(2025, 1, 10))
        .await
        .unwrap();
    assert!(friday.is_empty());
}

#[tokio::test]
async fn test_store_opens_numbered_sessions_and_upserts() {
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

    let first = AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        saturday(),
        vec![
            entry(alice.id, AttendanceStatus::Present),
            entry(bob.id, AttendanceStatus::Absent),
        ],
    )
    .await
    .unwrap();
    assert!(first.created);
    assert_eq!(first.session.lecture_number, 1);
    assert_eq!(first.stored, 2);

    // Resubmitting the same day reuses the session and overwrites the rows
    let again = AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        saturday(),
        vec![AttendanceEntry {
            student_id: bob.id,
            status: AttendanceStatus::Excused,
            is_installment_due: true,
        }],
    )
    .await
    .unwrap();
    assert!(!again.created);
    assert_eq!(again.session.id, first.session.id);
    assert_eq!(attendances::Entity::find().count(&db).await.unwrap(), 2);

    let session = AttendanceService::session_attendance(&db, &admin, first.session.id)
        .await
        .unwrap();
    let statuses: Vec<_> = session
        .rows
        .iter()
        .map(|(a, s)| (s.name.as_str(), a.status, a.is_installment_due))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("Alice", AttendanceStatus::Present, false),
            ("Bob", AttendanceStatus::Excused, true),
        ]
    );

    let tuesday = AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        date(2025, 1, 7),
        vec![entry(alice.id, AttendanceStatus::Present)],
    )
    .await
    .unwrap();
    assert_eq!(tuesday.session.lecture_number, 2);

    let groups = AttendanceService::active_groups_for_date(&db, &admin, saturday())
        .await
        .unwrap();
    assert_eq!(groups[0].session.as_ref().map(|s| s.id), Some(first.session.id));
    assert_eq!(groups[0].attendance.len(), 2);
}

#[tokio::test]
async fn test_store_rejects_bad_entries() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    let alice = student(&db, &admin, north.id, "Alice").await;
    let stranger = student(&db, &admin, north.id, "Stranger").await;
    EnrollmentService::enroll(&db, &admin, alice.id, alpha.id, Some(midnight(date(2025, 1, 1))))
        .await
        .unwrap();

    let err = AttendanceService::store(&db, &admin, alpha.id, saturday(), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(ref e) if e.contains("entries")));

    let err = AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        saturday(),
        vec![
            entry(alice.id, AttendanceStatus::Present),
            entry(alice.id, AttendanceStatus::Absent),
            entry(stranger.id, AttendanceStatus::Present),
        ],
    )
    .await
    .unwrap_err();
    let ServiceError::Validation(errors) = err else {
        panic!("expected a validation error");
    };
    assert!(!errors.contains("entries.0.student_id"));
    assert!(errors.contains("entries.1.student_id"));
    assert!(errors.contains("entries.2.student_id"));

    // Nothing was written, not even the session
    let groups = AttendanceService::active_groups_for_date(&db, &admin, saturday())
        .await
        .unwrap();
    assert!(groups[0].session.is_none());
}

#[tokio::test]
async fn test_roster_uses_day_window() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    let late = student(&db, &admin, north.id, "Late").await;
    let gone = student(&db, &admin, north.id, "Gone").await;

    // Enrolled in the afternoon of the lecture day still counts
    EnrollmentService::enroll(&db, &admin, late.id, alpha.id, Some(at(saturday(), 15)))
        .await
        .unwrap();

    // Ended at the very start of the day does not
    let enrollment =
        EnrollmentService::enroll(&db, &admin, gone.id, alpha.id, Some(midnight(date(2025, 1, 1))))
            .await
            .unwrap();
    EnrollmentService::end(&db, &admin, enrollment.id, Some(midnight(saturday())))
        .await
        .unwrap();

    let (_, roster) = GroupService::roster(&db, &admin, alpha.id, saturday())
        .await
        .unwrap();
    let names: Vec<_> = roster.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Late"]);

    // The day before, only the student who had not left yet
    let (_, roster) = GroupService::roster(&db, &admin, alpha.id, date(2025, 1, 3))
        .await
        .unwrap();
    let names: Vec<_> = roster.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Gone"]);
}

#[tokio::test]
async fn test_other_branch_cannot_store_or_read() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let south = branch(&db, &admin, "South").await;
    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    let alice = student(&db, &admin, north.id, "Alice").await;
    EnrollmentService::enroll(&db, &admin, alice.id, alpha.id, Some(midnight(date(2025, 1, 1))))
        .await
        .unwrap();

    let stored = AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        saturday(),
        vec![entry(alice.id, AttendanceStatus::Present)],
    )
    .await
    .unwrap();

    let outsider = employee(&db, "Outsider", south.id).await;

    let err = AttendanceService::store(
        &db,
        &outsider,
        alpha.id,
        saturday(),
        vec![entry(alice.id, AttendanceStatus::Absent)],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Group" }));

    let err = AttendanceService::session_attendance(&db, &outsider, stored.session.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "Lecture session" }));

    let groups = AttendanceService::active_groups_for_date(&db, &outsider, saturday())
        .await
        .unwrap();
    assert!(groups.is_empty());
}

#[tokio::test]
async fn test_second_session_on_same_date_is_a_conflict() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;
    let alice = student(&db, &admin, north.id, "Alice").await;

    EnrollmentService::enroll(&db, &admin, alice.id, alpha.id, Some(midnight(date(2025, 1, 1))))
        .await
        .unwrap();
    let stored = AttendanceService::store(
        &db,
        &admin,
        alpha.id,
        saturday(),
        vec![entry(alice.id, AttendanceStatus::Present)],
    )
    .await
    .unwrap();

    // What a concurrent request opening the same session would write
    let now = chrono::Utc::now().naive_utc();
    let err: ServiceError = lecture_sessions::ActiveModel {
        id: Set(uuid::Uuid::new_v4()),
        group_id: Set(alpha.id),
        date: Set(saturday()),
        lecture_number: Set(stored.session.lecture_number + 1),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await
    .unwrap_err()
    .into();

    assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_last_representable_date_does_not_fail() {
    let db = setup_db().await;
    let admin = admin(&db).await;
    let north = branch(&db, &admin, "North").await;
    let alpha = group(&db, &admin, north.id, "Alpha", DayPattern::SatTue).await;

    let last = chrono::NaiveDate::MAX;
    GroupService::roster(&db, &admin, alpha.id, last)
        .await
        .unwrap();
    AttendanceService::active_groups_for_date(&db, &admin, last)
        .await
        .unwrap();
}
