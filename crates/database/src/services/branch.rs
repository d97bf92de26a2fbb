use crate::{
    entities::branches,
    error::ServiceResult,
    now,
    scope::Scope,
    validation::ValidationErrors,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryOrder,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct BranchInput {
    pub name: String,
    pub location: String,
}

impl BranchInput {
    fn validate(&self) -> ServiceResult<()> {
        let mut errors = ValidationErrors::new();
        errors.required("name", &self.name);
        errors.required("location", &self.location);
        errors.into_result()
    }
}

pub struct BranchService;

impl BranchService {
    /// All branches for admins, only their own for employees
    pub async fn list(db: &DatabaseConnection, scope: &Scope) -> ServiceResult<Vec<branches::Model>> {
        let branches = scope
            .find::<branches::Entity>()
            .order_by_asc(branches::Column::Name)
            .all(db)
            .await?;

        Ok(branches)
    }

    pub async fn get(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
    ) -> ServiceResult<branches::Model> {
        scope.get::<branches::Entity, _>(db, id).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        scope: &Scope,
        input: BranchInput,
    ) -> ServiceResult<branches::Model> {
        scope.require_admin()?;
        input.validate()?;

        let timestamp = now();
        let branch = branches::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            location: Set(input.location.trim().to_string()),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        log::info!("Created branch {} ({})", branch.name, branch.id);
        Ok(branch)
    }

    pub async fn update(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
        input: BranchInput,
    ) -> ServiceResult<branches::Model> {
        scope.require_admin()?;
        let branch = Self::get(db, scope, id).await?;
        input.validate()?;

        let mut branch = branch.into_active_model();
        branch.name = Set(input.name.trim().to_string());
        branch.location = Set(input.location.trim().to_string());
        branch.updated_at = Set(now());

        Ok(branch.update(db).await?)
    }

    /// Deleting a branch removes its groups, students and employees with it
    pub async fn delete(db: &DatabaseConnection, scope: &Scope, id: Uuid) -> ServiceResult<()> {
        scope.require_admin()?;
        let branch = Self::get(db, scope, id).await?;

        log::info!("Deleting branch {} ({})", branch.name, branch.id);
        branch.delete(db).await?;

        Ok(())
    }
}
