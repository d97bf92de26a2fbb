use crate::{
    entities::{attendances, enrollments, groups, lecture_sessions, students},
    error::{ServiceError, ServiceResult},
    scope::Scope,
};
use chrono::NaiveDate;
use models::{AttendanceStatus, StatusCounts};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub student: students::Model,
    /// One entry per report session, in the same order
    pub statuses: Vec<Option<AttendanceStatus>>,
    pub counts: StatusCounts,
    pub installments_due: u32,
    pub attendance_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct GroupReport {
    pub group: groups::Model,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sessions: Vec<lecture_sessions::Model>,
    pub rows: Vec<ReportRow>,
    /// Sessions held over the whole life of the group
    pub lectures_held: u64,
    pub lectures_remaining: u64,
}

pub struct ReportService;

impl ReportService {
    /// Attendance grid of a group: its sessions in the date range against every
    /// student who was ever enrolled in it
    pub async fn group_report(
        db: &DatabaseConnection,
        scope: &Scope,
        group_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> ServiceResult<GroupReport> {
        if let (Some(from), Some(to)) = (from, to)
            && to < from
        {
            return Err(ServiceError::invalid(
                "to",
                "The to date must be a date after or equal to from.",
            ));
        }

        let group = scope.get::<groups::Entity, _>(db, group_id).await?;

        let lectures_held = lecture_sessions::Entity::find()
            .filter(lecture_sessions::Column::GroupId.eq(group.id))
            .count(db)
            .await?;
        let lectures_remaining =
            u64::try_from(group.max_lectures).unwrap_or(0).saturating_sub(lectures_held);

        let mut session_query =
            lecture_sessions::Entity::find().filter(lecture_sessions::Column::GroupId.eq(group.id));
        if let Some(from) = from {
            session_query = session_query.filter(lecture_sessions::Column::Date.gte(from));
        }
        if let Some(to) = to {
            session_query = session_query.filter(lecture_sessions::Column::Date.lte(to));
        }
        let sessions = session_query
            .order_by_asc(lecture_sessions::Column::LectureNumber)
            .all(db)
            .await?;

        let mut seen = HashSet::new();
        let students: Vec<students::Model> = enrollments::Entity::find()
            .filter(enrollments::Column::GroupId.eq(group.id))
            .find_also_related(students::Entity)
            // Students moved to another branch stay out of this branch's report
            .filter(students::Column::BranchId.eq(group.branch_id))
            .order_by_asc(students::Column::Name)
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, student)| student)
            .filter(|student| seen.insert(student.id))
            .collect();

        // (session, student) -> record
        let mut records: HashMap<(Uuid, Uuid), attendances::Model> = HashMap::new();
        if !sessions.is_empty() {
            let session_ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
            let rows = attendances::Entity::find()
                .filter(attendances::Column::LectureSessionId.is_in(session_ids))
                .all(db)
                .await?;

            for row in rows {
                records.insert((row.lecture_session_id, row.student_id), row);
            }
        }

        let rows = students
            .into_iter()
            .map(|student| {
                let found: Vec<Option<&attendances::Model>> = sessions
                    .iter()
                    .map(|session| records.get(&(session.id, student.id)))
                    .collect();

                let counts: StatusCounts = found.iter().flatten().map(|a| a.status).collect();
                let installments_due =
                    found.iter().flatten().filter(|a| a.is_installment_due).count() as u32;

                ReportRow {
                    statuses: found.iter().map(|a| a.map(|a| a.status)).collect(),
                    attendance_rate: counts.attendance_rate(),
                    counts,
                    installments_due,
                    student,
                }
            })
            .collect();

        Ok(GroupReport {
            group,
            from,
            to,
            sessions,
            rows,
            lectures_held,
            lectures_remaining,
        })
    }
}
