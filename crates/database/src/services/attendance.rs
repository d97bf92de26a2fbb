use crate::{
    entities::{attendances, groups, lecture_sessions, students},
    error::{ServiceError, ServiceResult},
    now,
    scope::Scope,
    services::group::GroupService,
    validation::ValidationErrors,
};
use chrono::NaiveDate;
use models::{AttendanceStatus, DayPattern};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::OnConflict,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub is_installment_due: bool,
}

/// A group meeting on a given date, with what has been recorded so far
#[derive(Debug, Clone)]
pub struct GroupAttendance {
    pub group: groups::Model,
    pub roster: Vec<students::Model>,
    pub session: Option<lecture_sessions::Model>,
    pub attendance: Vec<attendances::Model>,
}

#[derive(Debug, Clone)]
pub struct StoredAttendance {
    pub session: lecture_sessions::Model,
    /// Whether the session was opened by this call
    pub created: bool,
    pub stored: usize,
}

#[derive(Debug, Clone)]
pub struct SessionAttendance {
    pub session: lecture_sessions::Model,
    pub group: groups::Model,
    /// Ordered by student name
    pub rows: Vec<(attendances::Model, students::Model)>,
}

pub struct AttendanceService;

impl AttendanceService {
    /// The active groups that meet on `date`, each with its roster and any
    /// attendance already taken for that day
    pub async fn active_groups_for_date(
        db: &DatabaseConnection,
        scope: &Scope,
        date: NaiveDate,
    ) -> ServiceResult<Vec<GroupAttendance>> {
        let Some(pattern) = DayPattern::for_date(date) else {
            log::debug!("No day pattern covers {date}");
            return Ok(vec![]);
        };

        let groups = scope
            .find::<groups::Entity>()
            .filter(groups::Column::IsActive.eq(true))
            .filter(groups::Column::DayPattern.eq(pattern))
            .order_by_asc(groups::Column::Name)
            .all(db)
            .await?;

        if groups.is_empty() {
            return Ok(vec![]);
        }

        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let mut rosters = GroupService::rosters_for(db, &group_ids, date).await?;

        // Batch fetch the sessions held on the date
        let sessions = lecture_sessions::Entity::find()
            .filter(lecture_sessions::Column::GroupId.is_in(group_ids))
            .filter(lecture_sessions::Column::Date.eq(date))
            .all(db)
            .await?;

        let session_ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let mut sessions_by_group: HashMap<Uuid, lecture_sessions::Model> =
            sessions.into_iter().map(|s| (s.group_id, s)).collect();

        let mut attendance_by_session: HashMap<Uuid, Vec<attendances::Model>> = HashMap::new();
        if !session_ids.is_empty() {
            let rows = attendances::Entity::find()
                .filter(attendances::Column::LectureSessionId.is_in(session_ids))
                .all(db)
                .await?;

            for row in rows {
                attendance_by_session
                    .entry(row.lecture_session_id)
                    .or_default()
                    .push(row);
            }
        }

        let result = groups
            .into_iter()
            .map(|group| {
                let roster = rosters.remove(&group.id).unwrap_or_default();
                let session = sessions_by_group.remove(&group.id);
                let attendance = session
                    .as_ref()
                    .and_then(|s| attendance_by_session.remove(&s.id))
                    .unwrap_or_default();

                GroupAttendance {
                    group,
                    roster,
                    session,
                    attendance,
                }
            })
            .collect();

        Ok(result)
    }

    /// Records attendance for a group on a date.
    ///
    /// The lecture session is opened on first use and numbered after the
    /// group's existing sessions. Resubmitting overwrites earlier entries.
    pub async fn store(
        db: &DatabaseConnection,
        scope: &Scope,
        group_id: Uuid,
        date: NaiveDate,
        entries: Vec<AttendanceEntry>,
    ) -> ServiceResult<StoredAttendance> {
        let group = scope.get::<groups::Entity, _>(db, group_id).await?;
        Self::validate_entries(db, &group, date, &entries).await?;

        let txn = db.begin().await?;

        let (session, created) = Self::find_or_open_session(&txn, &group, date).await?;

        let timestamp = now();
        let rows = entries.iter().map(|entry| attendances::ActiveModel {
            id: Set(Uuid::new_v4()),
            lecture_session_id: Set(session.id),
            student_id: Set(entry.student_id),
            status: Set(entry.status),
            is_installment_due: Set(entry.is_installment_due),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        });

        attendances::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    attendances::Column::LectureSessionId,
                    attendances::Column::StudentId,
                ])
                .update_columns([
                    attendances::Column::Status,
                    attendances::Column::IsInstallmentDue,
                    attendances::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        log::info!(
            "Stored attendance for {} students in group {} lecture {} ({})",
            entries.len(),
            group.id,
            session.lecture_number,
            date
        );

        Ok(StoredAttendance {
            session,
            created,
            stored: entries.len(),
        })
    }

    pub async fn session_attendance(
        db: &DatabaseConnection,
        scope: &Scope,
        session_id: Uuid,
    ) -> ServiceResult<SessionAttendance> {
        let not_found = || ServiceError::not_found("Lecture session");

        let session = lecture_sessions::Entity::find_by_id(session_id)
            .one(db)
            .await?
            .ok_or_else(not_found)?;

        let group = scope
            .get::<groups::Entity, _>(db, session.group_id)
            .await
            .map_err(|e| match e {
                ServiceError::NotFound { .. } => not_found(),
                other => other,
            })?;

        let rows = attendances::Entity::find()
            .filter(attendances::Column::LectureSessionId.eq(session.id))
            .find_also_related(students::Entity)
            .order_by_asc(students::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(attendance, student)| student.map(|s| (attendance, s)))
            .collect();

        Ok(SessionAttendance {
            session,
            group,
            rows,
        })
    }

    async fn validate_entries(
        db: &DatabaseConnection,
        group: &groups::Model,
        date: NaiveDate,
        entries: &[AttendanceEntry],
    ) -> ServiceResult<()> {
        let mut errors = ValidationErrors::new();

        if entries.is_empty() {
            errors.add("entries", "The entries field is required.");
            return errors.into_result();
        }

        let roster: HashSet<Uuid> = GroupService::rosters_for(db, &[group.id], date)
            .await?
            .remove(&group.id)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.id)
            .collect();

        let mut seen = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            let field = format!("entries.{i}.student_id");

            if !seen.insert(entry.student_id) {
                errors.add(&field, "The student appears more than once.");
            } else if !roster.contains(&entry.student_id) {
                errors.add(&field, "The student is not enrolled in this group on the given date.");
            }
        }

        if !errors.is_empty() {
            log::warn!("Rejected attendance for group {} on {date}", group.id);
        }

        errors.into_result()
    }

    /// The group's session on `date`, opening the next numbered one when none exists
    async fn find_or_open_session<C: ConnectionTrait>(
        db: &C,
        group: &groups::Model,
        date: NaiveDate,
    ) -> ServiceResult<(lecture_sessions::Model, bool)> {
        let existing = lecture_sessions::Entity::find()
            .filter(lecture_sessions::Column::GroupId.eq(group.id))
            .filter(lecture_sessions::Column::Date.eq(date))
            .one(db)
            .await?;

        if let Some(session) = existing {
            return Ok((session, false));
        }

        let held = lecture_sessions::Entity::find()
            .filter(lecture_sessions::Column::GroupId.eq(group.id))
            .count(db)
            .await?;

        let lecture_number = i32::try_from(held + 1).map_err(|_| {
            ServiceError::Conflict(format!("Group {} has too many lecture sessions", group.id))
        })?;

        let timestamp = now();
        let session = lecture_sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            group_id: Set(group.id),
            date: Set(date),
            lecture_number: Set(lecture_number),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        log::info!(
            "Opened lecture {} for group {} on {}",
            session.lecture_number,
            group.id,
            date
        );
        Ok((session, true))
    }
}
