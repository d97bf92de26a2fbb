use crate::{
    auth::CurrentUser,
    dtos::{
        common::PaginationMeta,
        student::{
            PaginatedStudentsResponse, StudentAttendanceResponse, StudentQueryParams,
            StudentRequest, StudentResponse,
        },
    },
    error::{AppError, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::student::StudentService;
use uuid::Uuid;

/// Get paginated list of students
#[utoipa::path(
    get,
    path = "/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "List of students retrieved successfully", body = PaginatedStudentsResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<StudentQueryParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let page = params.page.max(1);
    let per_page = params.per_page.clamp(1, 100);

    let (students, total_items) =
        StudentService::list(&state.db, &current.scope, page, per_page, params.query()).await?;

    Ok(Json(PaginatedStudentsResponse {
        students: students.into_iter().map(Into::into).collect(),
        pagination: PaginationMeta::new(page, per_page, total_items),
    }))
}

#[utoipa::path(
    post,
    path = "/students",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<StudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), AppError> {
    let student = StudentService::create(&state.db, &current.scope, request.into()).await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = StudentService::get(&state.db, &current.scope, id).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Invalid input", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<StudentRequest>,
) -> Result<Json<StudentResponse>, AppError> {
    let student = StudentService::update(&state.db, &current.scope, id, request.into()).await?;
    Ok(Json(student.into()))
}

#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    StudentService::delete(&state.db, &current.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every attendance record of a student, with totals
#[utoipa::path(
    get,
    path = "/students/{id}/attendance",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Attendance summary", body = StudentAttendanceResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentAttendanceResponse>, AppError> {
    let summary = StudentService::attendance_summary(&state.db, &current.scope, id).await?;
    Ok(Json(summary.into()))
}
