use crate::{
    entities::{attendances, enrollments, groups, lecture_sessions, students},
    error::ServiceResult,
    now,
    scope::Scope,
    validation::ValidationErrors,
};
use chrono::NaiveDate;
use models::{AttendanceStatus, StatusCounts};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct StudentInput {
    /// Required for admins, ignored for employees
    pub branch_id: Option<Uuid>,
    pub name: String,
    pub track: String,
    pub details: Option<String>,
}

impl StudentInput {
    fn validate(&self) -> ServiceResult<()> {
        let mut errors = ValidationErrors::new();
        errors.required("name", &self.name);
        errors.required("track", &self.track);
        errors.into_result()
    }

    fn details(&self) -> Option<String> {
        self.details
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
    pub search: Option<String>,
    pub track: Option<String>,
    /// Only students currently enrolled in this group
    pub group_id: Option<Uuid>,
}

/// One attendance record as seen from the student's side
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub session_id: Uuid,
    pub date: NaiveDate,
    pub lecture_number: i32,
    pub group_id: Uuid,
    pub group_name: String,
    pub status: AttendanceStatus,
    pub is_installment_due: bool,
}

#[derive(Debug, Clone)]
pub struct StudentAttendance {
    pub student: students::Model,
    pub records: Vec<AttendanceRecord>,
    pub counts: StatusCounts,
    pub installments_due: u32,
}

pub struct StudentService;

impl StudentService {
    /// Query students with pagination and filtering
    pub async fn list(
        db: &DatabaseConnection,
        scope: &Scope,
        page: u64,
        per_page: u64,
        query: StudentQuery,
    ) -> ServiceResult<(Vec<students::Model>, u64)> {
        let mut select = scope.find::<students::Entity>();

        if let Some(search) = query.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            select = select.filter(students::Column::Name.like(format!("%{search}%")));
        }

        if let Some(track) = query.track
            && !track.is_empty()
        {
            select = select.filter(students::Column::Track.eq(track));
        }

        if let Some(group_id) = query.group_id {
            select = select.filter(
                students::Column::Id.in_subquery(
                    enrollments::Entity::find()
                        .select_only()
                        .column(enrollments::Column::StudentId)
                        .filter(enrollments::Column::GroupId.eq(group_id))
                        .filter(enrollments::Column::EndedAt.is_null())
                        .into_query(),
                ),
            );
        }

        let select = select
            .order_by_asc(students::Column::Name)
            .order_by_asc(students::Column::Id);

        let total_items = select.clone().count(db).await?;
        let paginator = select.paginate(db, per_page.max(1));
        let students = paginator.fetch_page(page.max(1) - 1).await?; // SeaORM uses 0-based pages

        Ok((students, total_items))
    }

    pub async fn get(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
    ) -> ServiceResult<students::Model> {
        scope.get::<students::Entity, _>(db, id).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        scope: &Scope,
        input: StudentInput,
    ) -> ServiceResult<students::Model> {
        input.validate()?;
        let branch_id = scope.branch_for_new_record(db, input.branch_id).await?;

        let timestamp = now();
        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            branch_id: Set(branch_id),
            name: Set(input.name.trim().to_string()),
            track: Set(input.track.trim().to_string()),
            details: Set(input.details()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        log::info!("Created student {} in branch {}", student.id, branch_id);
        Ok(student)
    }

    pub async fn update(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
        input: StudentInput,
    ) -> ServiceResult<students::Model> {
        let student = Self::get(db, scope, id).await?;
        input.validate()?;

        let requested = input.branch_id.or(Some(student.branch_id));
        let branch_id = scope.branch_for_new_record(db, requested).await?;

        let mut student = student.into_active_model();
        student.branch_id = Set(branch_id);
        student.name = Set(input.name.trim().to_string());
        student.track = Set(input.track.trim().to_string());
        student.details = Set(input.details());
        student.updated_at = Set(now());

        Ok(student.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, scope: &Scope, id: Uuid) -> ServiceResult<()> {
        let student = Self::get(db, scope, id).await?;

        log::info!("Deleting student {}", student.id);
        student.delete(db).await?;

        Ok(())
    }

    /// Every attendance record of the student, oldest session first, with totals
    pub async fn attendance_summary(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
    ) -> ServiceResult<StudentAttendance> {
        let student = Self::get(db, scope, id).await?;

        let rows: Vec<(attendances::Model, Option<lecture_sessions::Model>)> =
            attendances::Entity::find()
                .filter(attendances::Column::StudentId.eq(student.id))
                .find_also_related(lecture_sessions::Entity)
                .all(db)
                .await?;

        let group_ids: Vec<Uuid> = rows
            .iter()
            .filter_map(|(_, session)| session.as_ref().map(|s| s.group_id))
            .collect();

        // Batch fetch the group names
        let group_names: HashMap<Uuid, String> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            groups::Entity::find()
                .filter(groups::Column::Id.is_in(group_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|g| (g.id, g.name))
                .collect()
        };

        let mut records: Vec<AttendanceRecord> = rows
            .into_iter()
            .filter_map(|(attendance, session)| {
                let session = session?;
                Some(AttendanceRecord {
                    session_id: session.id,
                    date: session.date,
                    lecture_number: session.lecture_number,
                    group_id: session.group_id,
                    group_name: group_names.get(&session.group_id).cloned().unwrap_or_default(),
                    status: attendance.status,
                    is_installment_due: attendance.is_installment_due,
                })
            })
            .collect();

        records.sort_by_key(|r| (r.date, r.lecture_number));

        let counts: StatusCounts = records.iter().map(|r| r.status).collect();
        let installments_due = records.iter().filter(|r| r.is_installment_due).count() as u32;

        Ok(StudentAttendance {
            student,
            records,
            counts,
            installments_due,
        })
    }
}
