use crate::{
    entities::{branches, users},
    error::{ServiceError, ServiceResult},
    now,
    scope::Scope,
    validation::ValidationErrors,
};
use models::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub role: Role,
    pub branch_id: Option<Uuid>,
}

pub struct UserService;

impl UserService {
    pub async fn list(db: &DatabaseConnection, scope: &Scope) -> ServiceResult<Vec<users::Model>> {
        let users = scope
            .find::<users::Entity>()
            .order_by_asc(users::Column::Name)
            .all(db)
            .await?;

        Ok(users)
    }

    pub async fn get(db: &DatabaseConnection, scope: &Scope, id: Uuid) -> ServiceResult<users::Model> {
        scope.get::<users::Entity, _>(db, id).await
    }

    /// Looks up the account behind an identity-provider subject, regardless of branch
    pub async fn find_by_subject(
        db: &DatabaseConnection,
        subject: &str,
    ) -> ServiceResult<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::Subject.eq(subject))
            .one(db)
            .await?;

        Ok(user)
    }

    pub async fn create(
        db: &DatabaseConnection,
        scope: &Scope,
        input: UserInput,
    ) -> ServiceResult<users::Model> {
        scope.require_admin()?;
        Self::validate(db, &input, None).await?;

        let timestamp = now();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.trim().to_string()),
            email: Set(input.email.trim().to_lowercase()),
            subject: Set(input.subject.trim().to_string()),
            role: Set(input.role),
            branch_id: Set(input.branch_id),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
        }
        .insert(db)
        .await?;

        log::info!("Created {} user {} ({})", user.role.as_str(), user.email, user.id);
        Ok(user)
    }

    pub async fn update(
        db: &DatabaseConnection,
        scope: &Scope,
        id: Uuid,
        input: UserInput,
    ) -> ServiceResult<users::Model> {
        scope.require_admin()?;
        let user = Self::get(db, scope, id).await?;
        Self::validate(db, &input, Some(user.id)).await?;

        let mut user = user.into_active_model();
        user.name = Set(input.name.trim().to_string());
        user.email = Set(input.email.trim().to_lowercase());
        user.subject = Set(input.subject.trim().to_string());
        user.role = Set(input.role);
        user.branch_id = Set(input.branch_id);
        user.updated_at = Set(now());

        Ok(user.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, scope: &Scope, id: Uuid) -> ServiceResult<()> {
        scope.require_admin()?;

        if id == scope.user_id {
            log::warn!("User {id} attempted to delete their own account");
            return Err(ServiceError::forbidden("You cannot delete your own account"));
        }

        let user = Self::get(db, scope, id).await?;
        log::info!("Deleting user {} ({})", user.email, user.id);
        user.delete(db).await?;

        Ok(())
    }

    /// Field checks plus the uniqueness and branch rules, ignoring `existing` itself
    async fn validate(
        db: &DatabaseConnection,
        input: &UserInput,
        existing: Option<Uuid>,
    ) -> ServiceResult<()> {
        let mut errors = ValidationErrors::new();
        errors.required("name", &input.name);
        errors.required("email", &input.email);
        errors.required("subject", &input.subject);

        let email = input.email.trim().to_lowercase();
        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "The email field must be a valid email address.");
        }

        if !email.is_empty() && Self::taken(db, users::Column::Email, &email, existing).await? {
            errors.add("email", "The email has already been taken.");
        }

        let subject = input.subject.trim();
        if !subject.is_empty() && Self::taken(db, users::Column::Subject, subject, existing).await? {
            errors.add("subject", "The subject has already been taken.");
        }

        match (input.role, input.branch_id) {
            (Role::Employee, None) => {
                errors.add("branch_id", "The branch field is required for employees.");
            }
            (Role::Employee, Some(branch_id)) => {
                if branches::Entity::find_by_id(branch_id).one(db).await?.is_none() {
                    errors.add("branch_id", "The selected branch is invalid.");
                }
            }
            (Role::Admin, Some(_)) => {
                errors.add("branch_id", "An administrator cannot belong to a branch.");
            }
            (Role::Admin, None) => {}
        }

        errors.into_result()
    }

    async fn taken(
        db: &DatabaseConnection,
        column: users::Column,
        value: &str,
        existing: Option<Uuid>,
    ) -> ServiceResult<bool> {
        let mut query = users::Entity::find().filter(column.eq(value));
        if let Some(id) = existing {
            query = query.filter(users::Column::Id.ne(id));
        }

        Ok(query.count(db).await? > 0)
    }
}
