use chrono::NaiveDateTime;
use database::{entities::branches, services::branch::BranchInput};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct BranchResponse {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<branches::Model> for BranchResponse {
    fn from(branch: branches::Model) -> Self {
        Self {
            id: branch.id,
            name: branch.name,
            location: branch.location,
            created_at: branch.created_at,
            updated_at: branch.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BranchRequest {
    pub name: String,
    pub location: String,
}

impl From<BranchRequest> for BranchInput {
    fn from(request: BranchRequest) -> Self {
        Self {
            name: request.name,
            location: request.location,
        }
    }
}
