use crate::{
    entities::{enrollments, groups, students},
    error::ServiceResult,
    now,
    scope::Scope,
    services::enrollment::enrolled_during,
    validation::ValidationErrors,
};
use chrono::NaiveDate;
use models::{DayPattern, DayWindow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, JoinType, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, sea_query::Expr,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
    /// Required for admins, ignored for employees
    pub branch_id: Option<Uuid>,
    pub name: String,
    pub day_pattern: DayPattern,
    pub start_date: NaiveDate,
    pub max_lectures: i32,
}

impl GroupInput {
    fn validate(&self) -> ServiceResult<()> {
        let mut errors = ValidationErrors::new();
        errors.required("name", &self.name);

        if self.max_lectures < 1 {
            errors.add("max_lectures", "The max lectures field must be at least 1.");
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GroupFilter {
    pub is_active: Option<bool>,
    pub day_pattern: Option<DayPattern>,
}

pub struct GroupService;

impl GroupService {
    pub async fn list(
        db: &DatabaseConnection,
        scope: &Scope,
        filter: GroupFilter,
    ) -> ServiceResult<Vec<groups::Model>> {
        let mut query = scope.find::<groups::Entity>();

        if let Some(is_active) = filter.is_active {
            query = query.filter(groups::Column::IsActive.eq(is_active));
        }

        if let Some(day_pattern) = filter.day_pattern {
            query = query.filter(groups::Column::DayPattern.eq(day_pattern));
        }

        let groups = query.order_by_asc(groups::Column::Name).all(db).await?;
        Ok(groups)
    }

    pub async fn get(db: &DatabaseConnection, scope: &Scope, id: Uuid) -> ServiceResult<groups::Model> {
        scope.get::<groups::Entity, _>(db, id).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        scope: &Scope,
        input: GroupInput,
    ) -> ServiceResult<groups::Model> {
        input.validate()?;
        let branch_id = scope.branch_for_new_record(db, input.branch_id).await?;

        let timestamp = now();
        let group = groups::ActiveModel {
            id: Set(Uuid::new_v4()),
            branch_id: Set(branch_id),
            name: Set(input.name.trim().to_string()),
            day_pattern: Set(input.day_pattern),
            start_date: Set(input.start_date),
            max_lectures: Set(input.max_lectures),
            is_active: Set(true),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        log::info!("Created group {} ({}) in branch {}", group.name, group.id, branch_id);
        Ok(group)
    }

    pub async fn update(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
        input: GroupInput,
    ) -> ServiceResult<groups::Model> {
        let group = Self::get(db, scope, id).await?;
        input.validate()?;

        // Omitting the branch keeps the current one
        let requested = input.branch_id.or(Some(group.branch_id));
        let branch_id = scope.branch_for_new_record(db, requested).await?;

        let mut group = group.into_active_model();
        group.branch_id = Set(branch_id);
        group.name = Set(input.name.trim().to_string());
        group.day_pattern = Set(input.day_pattern);
        group.start_date = Set(input.start_date);
        group.max_lectures = Set(input.max_lectures);
        group.updated_at = Set(now());

        Ok(group.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, scope: &Scope, id: Uuid) -> ServiceResult<()> {
        let group = Self::get(db, scope, id).await?;

        log::info!("Deleting group {} ({})", group.name, group.id);
        group.delete(db).await?;

        Ok(())
    }

    pub async fn toggle_status(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
    ) -> ServiceResult<groups::Model> {
        let group = Self::get(db, scope, id).await?;
        let is_active = !group.is_active;

        let mut group = group.into_active_model();
        group.is_active = Set(is_active);
        group.updated_at = Set(now());
        let group = group.update(db).await?;

        log::info!(
            "Group {} ({}) is now {}",
            group.name,
            group.id,
            if group.is_active { "active" } else { "inactive" }
        );
        Ok(group)
    }

    /// The students enrolled in the group on `date`, ordered by name
    pub async fn roster(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
        date: NaiveDate,
    ) -> ServiceResult<(groups::Model, Vec<students::Model>)> {
        let group = Self::get(db, scope, id).await?;
        let roster = Self::rosters_for(db, &[group.id], date)
            .await?
            .remove(&group.id)
            .unwrap_or_default();

        Ok((group, roster))
    }

    /// Rosters for several groups on one date, keyed by group id.
    ///
    /// Groups with nobody enrolled are absent from the map. A student who has since
    /// moved to another branch is left out even while the enrollment stays open.
    pub(crate) async fn rosters_for<C: ConnectionTrait>(
        db: &C,
        group_ids: &[Uuid],
        date: NaiveDate,
    ) -> Result<HashMap<Uuid, Vec<students::Model>>, DbErr> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(enrollments::Model, Option<students::Model>)> = enrollments::Entity::find()
            .filter(enrollments::Column::GroupId.is_in(group_ids.iter().copied()))
            .filter(enrolled_during(DayWindow::for_date(date)))
            .find_also_related(students::Entity)
            .join(JoinType::InnerJoin, enrollments::Relation::Group.def())
            .filter(
                Expr::col((students::Entity, students::Column::BranchId))
                    .equals((groups::Entity, groups::Column::BranchId)),
            )
            .order_by_asc(students::Column::Name)
            .order_by_asc(students::Column::Id)
            .all(db)
            .await?;

        // A student can hold two enrollments touching the same day after a round-trip transfer
        let mut seen = HashSet::new();
        let mut rosters: HashMap<Uuid, Vec<students::Model>> = HashMap::new();
        for (enrollment, student) in rows {
            let Some(student) = student else { continue };

            if seen.insert((enrollment.group_id, student.id)) {
                rosters.entry(enrollment.group_id).or_default().push(student);
            }
        }

        Ok(rosters)
    }
}
