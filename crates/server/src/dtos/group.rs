use crate::dtos::student::StudentResponse;
use chrono::{NaiveDate, NaiveDateTime};
use database::{
    entities::groups,
    services::group::{GroupFilter, GroupInput},
};
use models::DayPattern;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    pub id: Uuid,
    pub branch_id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "sat_tue")]
    pub day_pattern: DayPattern,
    /// Human-readable meeting days, e.g. "Sat, Tue"
    pub days: String,
    pub start_date: NaiveDate,
    pub max_lectures: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<groups::Model> for GroupResponse {
    fn from(group: groups::Model) -> Self {
        Self {
            id: group.id,
            branch_id: group.branch_id,
            name: group.name,
            day_pattern: group.day_pattern,
            days: group.day_pattern.days().to_string(),
            start_date: group.start_date,
            max_lectures: group.max_lectures,
            is_active: group.is_active,
            created_at: group.created_at,
            updated_at: group.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GroupRequest {
    /// Required for admins; employees always use their own branch
    pub branch_id: Option<Uuid>,
    pub name: String,
    #[schema(value_type = String, example = "sat_tue")]
    pub day_pattern: DayPattern,
    pub start_date: NaiveDate,
    pub max_lectures: i32,
}

impl From<GroupRequest> for GroupInput {
    fn from(request: GroupRequest) -> Self {
        Self {
            branch_id: request.branch_id,
            name: request.name,
            day_pattern: request.day_pattern,
            start_date: request.start_date,
            max_lectures: request.max_lectures,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GroupQueryParams {
    pub is_active: Option<bool>,
    #[param(value_type = Option<String>, example = "mon_thu")]
    pub day_pattern: Option<DayPattern>,
}

impl From<GroupQueryParams> for GroupFilter {
    fn from(params: GroupQueryParams) -> Self {
        Self {
            is_active: params.is_active,
            day_pattern: params.day_pattern,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub message: String,
    pub group: GroupResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RosterResponse {
    pub group: GroupResponse,
    pub date: NaiveDate,
    pub students: Vec<StudentResponse>,
}
