use crate::{
    auth::CurrentUser,
    dtos::report::{GroupReportResponse, ReportQuery},
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::report::ReportService;
use uuid::Uuid;

/// Attendance grid of a group over an optional date range
#[utoipa::path(
    get,
    path = "/groups/{id}/report",
    params(("id" = Uuid, Path, description = "Group ID"), ReportQuery),
    responses(
        (status = 200, description = "Group report", body = GroupReportResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 422, description = "Invalid date range", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Reports"
)]
pub async fn get_group_report(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<GroupReportResponse>, AppError> {
    let report =
        ReportService::group_report(&state.db, &current.scope, id, params.from, params.to).await?;
    Ok(Json(report.into()))
}
