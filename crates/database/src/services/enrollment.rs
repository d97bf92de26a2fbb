use crate::{
    entities::{enrollments, groups, students, transfer_logs},
    error::{ServiceError, ServiceResult},
    now,
    scope::Scope,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use models::DayWindow;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, TransactionTrait, sea_query::Expr,
};
use serde::Deserialize;
use uuid::Uuid;

/// Enrollments that overlap the given day, the query form of [`DayWindow::covers`]
pub(crate) fn enrolled_during(window: DayWindow) -> Condition {
    Condition::all()
        .add(enrollments::Column::EnrolledAt.lt(window.next))
        .add(
            Condition::any()
                .add(enrollments::Column::EndedAt.is_null())
                .add(
                    Condition::all()
                        .add(enrollments::Column::EndedAt.gt(window.start))
                        .add(
                            Expr::col((enrollments::Entity, enrollments::Column::EndedAt)).gt(
                                Expr::col((enrollments::Entity, enrollments::Column::EnrolledAt)),
                            ),
                        ),
                ),
        )
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferInput {
    pub from_group_id: Uuid,
    pub to_group_id: Uuid,
    pub effective_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub log: transfer_logs::Model,
    /// The enrollment opened in the destination group
    pub enrollment: enrollments::Model,
}

#[derive(Debug, Clone)]
pub struct EnrollmentHistory {
    pub student: students::Model,
    /// Newest first, each with the name of its group
    pub enrollments: Vec<(enrollments::Model, String)>,
    /// Newest first
    pub transfers: Vec<transfer_logs::Model>,
}

pub struct EnrollmentService;

impl EnrollmentService {
    /// Opens an enrollment of the student in an active group of the same branch
    pub async fn enroll(
        db: &DatabaseConnection,
        scope: &Scope,
        student_id: Uuid,
        group_id: Uuid,
        enrolled_at: Option<NaiveDateTime>,
    ) -> ServiceResult<enrollments::Model> {
        let student = scope.get::<students::Entity, _>(db, student_id).await?;
        let group = Self::destination_group(db, scope, &student, group_id, "group_id").await?;

        if Self::open_enrollment(db, student.id, group.id).await?.is_some() {
            log::warn!("Student {} is already enrolled in group {}", student.id, group.id);
            return Err(ServiceError::invalid(
                "group_id",
                "The student is already enrolled in this group.",
            ));
        }

        let timestamp = now();
        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            group_id: Set(group.id),
            enrolled_at: Set(enrolled_at.unwrap_or(timestamp)),
            ended_at: Set(None),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        log::info!("Enrolled student {} in group {}", student.id, group.id);
        Ok(enrollment)
    }

    /// Moves a student between groups.
    ///
    /// The transfer log, the closing of the old enrollment and the opening of
    /// the new one are written in a single transaction.
    pub async fn transfer(
        db: &DatabaseConnection,
        scope: &Scope,
        student_id: Uuid,
        input: TransferInput,
    ) -> ServiceResult<TransferOutcome> {
        let student = scope.get::<students::Entity, _>(db, student_id).await?;

        if input.from_group_id == input.to_group_id {
            return Err(ServiceError::invalid(
                "to_group_id",
                "The destination group must be different from the current group.",
            ));
        }

        let from_group = scope
            .get::<groups::Entity, _>(db, input.from_group_id)
            .await?;
        if from_group.branch_id != student.branch_id {
            return Err(ServiceError::invalid(
                "from_group_id",
                "The group must belong to the student's branch.",
            ));
        }

        let to_group =
            Self::destination_group(db, scope, &student, input.to_group_id, "to_group_id").await?;

        let Some(open) = Self::open_enrollment(db, student.id, from_group.id).await? else {
            log::warn!(
                "Transfer rejected: student {} has no open enrollment in group {}",
                student.id,
                from_group.id
            );
            return Err(ServiceError::invalid(
                "from_group_id",
                "The student is not currently enrolled in this group.",
            ));
        };

        if input.effective_date < open.enrolled_at.date() {
            return Err(ServiceError::invalid(
                "effective_date",
                "The effective date cannot be before the current enrollment started.",
            ));
        }

        if Self::open_enrollment(db, student.id, to_group.id).await?.is_some() {
            return Err(ServiceError::invalid(
                "to_group_id",
                "The student is already enrolled in this group.",
            ));
        }

        let effective_at = input.effective_date.and_time(NaiveTime::MIN);
        let timestamp = now();

        let txn = db.begin().await?;

        let log = transfer_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            from_group_id: Set(from_group.id),
            to_group_id: Set(to_group.id),
            effective_date: Set(input.effective_date),
            reason: Set(input.reason.filter(|r| !r.trim().is_empty())),
            created_by: Set(Some(scope.user_id)),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        // Never end an enrollment before it began. A same-day transfer leaves the old
        // enrollment zero-length, so it drops off that day's rosters.
        let ended_at = effective_at.max(open.enrolled_at);
        let mut closing = open.into_active_model();
        closing.ended_at = Set(Some(ended_at));
        closing.updated_at = Set(timestamp);
        closing.update(&txn).await?;

        let enrollment = enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            group_id: Set(to_group.id),
            enrolled_at: Set(effective_at),
            ended_at: Set(None),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        log::info!(
            "Transferred student {} from group {} to group {} effective {}",
            student.id,
            from_group.id,
            to_group.id,
            input.effective_date
        );

        Ok(TransferOutcome { log, enrollment })
    }

    pub async fn end(
        db: &DatabaseConnection,
        scope: &Scope,
        enrollment_id: Uuid,
        ended_at: Option<NaiveDateTime>,
    ) -> ServiceResult<enrollments::Model> {
        let enrollment = Self::get(db, scope, enrollment_id).await?;

        if !enrollment.is_open() {
            return Err(ServiceError::invalid(
                "enrollment",
                "The enrollment has already ended.",
            ));
        }

        let timestamp = now();
        let ended_at = ended_at.unwrap_or(timestamp);
        if ended_at < enrollment.enrolled_at {
            return Err(ServiceError::invalid(
                "ended_at",
                "The end date cannot be before the enrollment started.",
            ));
        }

        let mut enrollment = enrollment.into_active_model();
        enrollment.ended_at = Set(Some(ended_at));
        enrollment.updated_at = Set(timestamp);
        let enrollment = enrollment.update(db).await?;

        log::info!("Ended enrollment {}", enrollment.id);
        Ok(enrollment)
    }

    pub async fn reactivate(
        db: &DatabaseConnection,
        scope: &Scope,
        enrollment_id: Uuid,
    ) -> ServiceResult<enrollments::Model> {
        let enrollment = Self::get(db, scope, enrollment_id).await?;

        if enrollment.is_open() {
            return Err(ServiceError::invalid(
                "enrollment",
                "The enrollment is already active.",
            ));
        }

        if Self::open_enrollment(db, enrollment.student_id, enrollment.group_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::invalid(
                "enrollment",
                "The student already has an active enrollment in this group.",
            ));
        }

        let mut enrollment = enrollment.into_active_model();
        enrollment.ended_at = Set(None);
        enrollment.updated_at = Set(now());
        let enrollment = enrollment.update(db).await?;

        log::info!("Reactivated enrollment {}", enrollment.id);
        Ok(enrollment)
    }

    pub async fn history(
        db: &DatabaseConnection,
        scope: &Scope,
        student_id: Uuid,
    ) -> ServiceResult<EnrollmentHistory> {
        let student = scope.get::<students::Entity, _>(db, student_id).await?;

        let enrollments = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student.id))
            .find_also_related(groups::Entity)
            .order_by_desc(enrollments::Column::EnrolledAt)
            .all(db)
            .await?
            .into_iter()
            .map(|(enrollment, group)| {
                let group_name = group.map(|g| g.name).unwrap_or_default();
                (enrollment, group_name)
            })
            .collect();

        let transfers = transfer_logs::Entity::find()
            .filter(transfer_logs::Column::StudentId.eq(student.id))
            .order_by_desc(transfer_logs::Column::EffectiveDate)
            .order_by_desc(transfer_logs::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(EnrollmentHistory {
            student,
            enrollments,
            transfers,
        })
    }

    /// An enrollment whose student is visible to the caller
    async fn get(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
    ) -> ServiceResult<enrollments::Model> {
        enrollments::Entity::find_by_id(id)
            .join(JoinType::InnerJoin, enrollments::Relation::Student.def())
            .filter(scope.condition::<students::Entity>())
            .one(db)
            .await?
            .ok_or(ServiceError::not_found("Enrollment"))
    }

    /// A group the student may be placed into: visible, same branch, active
    async fn destination_group(
        db: &DatabaseConnection,
        scope: &Scope,
        student: &students::Model,
        group_id: Uuid,
        field: &str,
    ) -> ServiceResult<groups::Model> {
        let group = scope.get::<groups::Entity, _>(db, group_id).await?;

        if group.branch_id != student.branch_id {
            return Err(ServiceError::invalid(
                field,
                "The group must belong to the student's branch.",
            ));
        }

        if !group.is_active {
            return Err(ServiceError::invalid(field, "The selected group is not active."));
        }

        Ok(group)
    }

    pub(crate) async fn open_enrollment<C: ConnectionTrait>(
        db: &C,
        student_id: Uuid,
        group_id: Uuid,
    ) -> ServiceResult<Option<enrollments::Model>> {
        let enrollment = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::GroupId.eq(group_id))
            .filter(enrollments::Column::EndedAt.is_null())
            .one(db)
            .await?;

        Ok(enrollment)
    }

    /// Open enrollments visible to the caller
    pub(crate) async fn count_open(db: &DatabaseConnection, scope: &Scope) -> Result<u64, DbErr> {
        enrollments::Entity::find()
            .join(JoinType::InnerJoin, enrollments::Relation::Student.def())
            .filter(scope.condition::<students::Entity>())
            .filter(enrollments::Column::EndedAt.is_null())
            .count(db)
            .await
    }
}
