use crate::{
    auth::CurrentUser,
    dtos::{common::DateQuery, dashboard::DashboardResponse},
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};
use database::services::dashboard::DashboardService;

/// Headline counts for the caller's branch, or every branch for admins
#[utoipa::path(
    get,
    path = "/dashboard",
    params(DateQuery),
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<DateQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let overview = DashboardService::overview(&state.db, &current.scope, params.date_or_today()).await?;
    Ok(Json(overview.into()))
}
