use crate::{
    auth::CurrentUser,
    dtos::{
        attendance::{
            ActiveGroupsResponse, SessionAttendanceResponse, StoreAttendanceRequest,
            StoreAttendanceResponse,
        },
        common::DateQuery,
    },
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::attendance::AttendanceService;
use models::DayPattern;
use uuid::Uuid;

/// Groups meeting on a date (default today), with rosters and recorded attendance
#[utoipa::path(
    get,
    path = "/attendance",
    params(DateQuery),
    responses(
        (status = 200, description = "Active groups for the date", body = ActiveGroupsResponse),
        (status = 400, description = "Invalid date")
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn get_active_groups(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<DateQuery>,
) -> Result<Json<ActiveGroupsResponse>, AppError> {
    let date = params.date_or_today();
    let groups = AttendanceService::active_groups_for_date(&state.db, &current.scope, date).await?;

    Ok(Json(ActiveGroupsResponse {
        date,
        day_pattern: DayPattern::for_date(date),
        groups: groups.into_iter().map(Into::into).collect(),
    }))
}

/// Record attendance for a group's lecture, overwriting earlier entries
#[utoipa::path(
    post,
    path = "/attendance",
    request_body = StoreAttendanceRequest,
    responses(
        (status = 200, description = "Attendance stored", body = StoreAttendanceResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Concurrent session creation", body = ErrorResponse),
        (status = 422, description = "Invalid entries", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn store_attendance(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<StoreAttendanceRequest>,
) -> Result<Json<StoreAttendanceResponse>, AppError> {
    let entries = request.entries.into_iter().map(Into::into).collect();
    let stored = AttendanceService::store(
        &state.db,
        &current.scope,
        request.group_id,
        request.date,
        entries,
    )
    .await?;

    Ok(Json(StoreAttendanceResponse {
        message: format!(
            "Attendance saved for lecture {}.",
            stored.session.lecture_number
        ),
        session: stored.session.into(),
        stored: stored.stored,
    }))
}

/// Attendance recorded for one lecture session
#[utoipa::path(
    get,
    path = "/sessions/{id}/attendance",
    params(("id" = Uuid, Path, description = "Lecture session ID")),
    responses(
        (status = 200, description = "Session attendance", body = SessionAttendanceResponse),
        (status = 404, description = "Lecture session not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Attendance"
)]
pub async fn get_session_attendance(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionAttendanceResponse>, AppError> {
    let result = AttendanceService::session_attendance(&state.db, &current.scope, id).await?;
    Ok(Json(result.into()))
}
