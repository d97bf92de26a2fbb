use crate::{
    auth::CurrentUser,
    dtos::{
        common::DateQuery,
        group::{GroupQueryParams, GroupRequest, GroupResponse, RosterResponse, ToggleStatusResponse},
    },
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::group::GroupService;
use uuid::Uuid;

/// List groups, optionally filtered by status and day pattern
#[utoipa::path(
    get,
    path = "/groups",
    params(GroupQueryParams),
    responses(
        (status = 200, description = "Groups ordered by name", body = Vec<GroupResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn list_groups(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<GroupQueryParams>,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    let groups = GroupService::list(&state.db, &current.scope, params.into()).await?;
    Ok(Json(groups.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/groups",
    request_body = GroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn create_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    let group = GroupService::create(&state.db, &current.scope, request.into()).await?;
    Ok((StatusCode::CREATED, Json(group.into())))
}

#[utoipa::path(
    get,
    path = "/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group found", body = GroupResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn get_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = GroupService::get(&state.db, &current.scope, id).await?;
    Ok(Json(group.into()))
}

#[utoipa::path(
    put,
    path = "/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = GroupRequest,
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn update_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<GroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = GroupService::update(&state.db, &current.scope, id, request.into()).await?;
    Ok(Json(group.into()))
}

#[utoipa::path(
    delete,
    path = "/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn delete_group(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    GroupService::delete(&state.db, &current.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate an inactive group or deactivate an active one
#[utoipa::path(
    post,
    path = "/groups/{id}/toggle-status",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Status flipped", body = ToggleStatusResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn toggle_group_status(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleStatusResponse>, AppError> {
    let group = GroupService::toggle_status(&state.db, &current.scope, id).await?;
    let message = if group.is_active {
        "Group activated successfully."
    } else {
        "Group deactivated successfully."
    };

    Ok(Json(ToggleStatusResponse {
        message: message.to_string(),
        group: group.into(),
    }))
}

/// Students enrolled in the group on a date (default today)
#[utoipa::path(
    get,
    path = "/groups/{id}/roster",
    params(("id" = Uuid, Path, description = "Group ID"), DateQuery),
    responses(
        (status = 200, description = "Roster ordered by name", body = RosterResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Groups"
)]
pub async fn get_group_roster(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<DateQuery>,
) -> Result<Json<RosterResponse>, AppError> {
    let date = params.date_or_today();
    let (group, students) = GroupService::roster(&state.db, &current.scope, id, date).await?;

    Ok(Json(RosterResponse {
        group: group.into(),
        date,
        students: students.into_iter().map(Into::into).collect(),
    }))
}
