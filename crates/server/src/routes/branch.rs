use crate::{
    auth::CurrentUser,
    dtos::branch::{BranchRequest, BranchResponse},
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::branch::BranchService;
use uuid::Uuid;

/// List the branches visible to the caller
#[utoipa::path(
    get,
    path = "/branches",
    responses(
        (status = 200, description = "Branches", body = Vec<BranchResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Branches"
)]
pub async fn list_branches(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<BranchResponse>>, AppError> {
    let branches = BranchService::list(&state.db, &current.scope).await?;
    Ok(Json(branches.into_iter().map(Into::into).collect()))
}

/// Create a branch (admins only)
#[utoipa::path(
    post,
    path = "/branches",
    request_body = BranchRequest,
    responses(
        (status = 201, description = "Branch created", body = BranchResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Branches"
)]
pub async fn create_branch(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<BranchRequest>,
) -> Result<(StatusCode, Json<BranchResponse>), AppError> {
    let branch = BranchService::create(&state.db, &current.scope, request.into()).await?;
    Ok((StatusCode::CREATED, Json(branch.into())))
}

/// Get a branch by ID
#[utoipa::path(
    get,
    path = "/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch ID")),
    responses(
        (status = 200, description = "Branch found", body = BranchResponse),
        (status = 404, description = "Branch not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Branches"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BranchResponse>, AppError> {
    let branch = BranchService::get(&state.db, &current.scope, id).await?;
    Ok(Json(branch.into()))
}

/// Update a branch (admins only)
#[utoipa::path(
    put,
    path = "/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch ID")),
    request_body = BranchRequest,
    responses(
        (status = 200, description = "Branch updated", body = BranchResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Branch not found", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Branches"
)]
pub async fn update_branch(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<BranchRequest>,
) -> Result<Json<BranchResponse>, AppError> {
    let branch = BranchService::update(&state.db, &current.scope, id, request.into()).await?;
    Ok(Json(branch.into()))
}

/// Delete a branch and everything in it (admins only)
#[utoipa::path(
    delete,
    path = "/branches/{id}",
    params(("id" = Uuid, Path, description = "Branch ID")),
    responses(
        (status = 204, description = "Branch deleted"),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Branch not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Branches"
)]
pub async fn delete_branch(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    BranchService::delete(&state.db, &current.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
