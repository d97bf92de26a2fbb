use chrono::NaiveDateTime;
use database::{entities::users, services::user::UserInput};
use models::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    #[schema(value_type = String, example = "employee")]
    pub role: Role,
    pub branch_id: Option<Uuid>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            subject: user.subject,
            role: user.role,
            branch_id: user.branch_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    /// Subject claim the identity provider issues for this user
    pub subject: String,
    #[schema(value_type = String, example = "employee")]
    pub role: Role,
    /// Required for employees, must be empty for admins
    pub branch_id: Option<Uuid>,
}

impl From<UserRequest> for UserInput {
    fn from(request: UserRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            subject: request.subject,
            role: request.role,
            branch_id: request.branch_id,
        }
    }
}
