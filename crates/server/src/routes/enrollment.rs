use crate::{
    auth::CurrentUser,
    dtos::enrollment::{
        EndEnrollmentRequest, EnrollRequest, EnrollmentActionResponse, EnrollmentHistoryResponse,
        TransferRequest, TransferResponse,
    },
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::enrollment::EnrollmentService;
use uuid::Uuid;

/// Enrollments and transfers of a student, newest first
#[utoipa::path(
    get,
    path = "/students/{id}/enrollments",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Enrollment history", body = EnrollmentHistoryResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn get_enrollment_history(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentHistoryResponse>, AppError> {
    let history = EnrollmentService::history(&state.db, &current.scope, id).await?;
    Ok(Json(history.into()))
}

/// Enroll a student in an active group of their branch
#[utoipa::path(
    post,
    path = "/students/{id}/enroll",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Student enrolled", body = EnrollmentActionResponse),
        (status = 404, description = "Student or group not found", body = ErrorResponse),
        (status = 422, description = "Invalid enrollment", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn enroll_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<EnrollmentActionResponse>), AppError> {
    let enrollment = EnrollmentService::enroll(
        &state.db,
        &current.scope,
        id,
        request.group_id,
        request.enrolled_at,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentActionResponse {
            message: "Student enrolled successfully.".to_string(),
            enrollment: enrollment.into(),
        }),
    ))
}

/// Move a student from one group to another as of a date
#[utoipa::path(
    post,
    path = "/students/{id}/transfer",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = TransferRequest,
    responses(
        (status = 201, description = "Student transferred", body = TransferResponse),
        (status = 404, description = "Student or group not found", body = ErrorResponse),
        (status = 422, description = "Invalid transfer", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn transfer_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferResponse>), AppError> {
    let outcome = EnrollmentService::transfer(&state.db, &current.scope, id, request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            message: "Student transferred successfully.".to_string(),
            transfer: outcome.log.into(),
            enrollment: outcome.enrollment.into(),
        }),
    ))
}

/// Close an open enrollment. Send `{}` to end it now.
#[utoipa::path(
    post,
    path = "/enrollments/{id}/end",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    request_body = EndEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment ended", body = EnrollmentActionResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 422, description = "Enrollment already ended", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn end_enrollment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<EndEnrollmentRequest>,
) -> Result<Json<EnrollmentActionResponse>, AppError> {
    let enrollment =
        EnrollmentService::end(&state.db, &current.scope, id, request.ended_at).await?;

    Ok(Json(EnrollmentActionResponse {
        message: "Enrollment ended successfully.".to_string(),
        enrollment: enrollment.into(),
    }))
}

/// Reopen an ended enrollment
#[utoipa::path(
    post,
    path = "/enrollments/{id}/reactivate",
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment reactivated", body = EnrollmentActionResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 422, description = "Enrollment cannot be reactivated", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Enrollments"
)]
pub async fn reactivate_enrollment(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrollmentActionResponse>, AppError> {
    let enrollment = EnrollmentService::reactivate(&state.db, &current.scope, id).await?;

    Ok(Json(EnrollmentActionResponse {
        message: "Enrollment reactivated successfully.".to_string(),
        enrollment: enrollment.into(),
    }))
}
