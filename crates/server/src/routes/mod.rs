use crate::{doc::ApiDoc, state::AppState};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};

pub mod attendance;
pub mod branch;
pub mod dashboard;
pub mod enrollment;
pub mod group;
pub mod health;
pub mod me;
pub mod report;
pub mod root;
pub mod student;
pub mod user;

/// Routes reachable without a token
pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(root::root))
        .routes(routes!(health::health))
}

/// Routes that need an authenticated user
pub fn protected_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(me::me))
        .routes(routes!(dashboard::get_dashboard))
        .routes(routes!(branch::list_branches, branch::create_branch))
        .routes(routes!(
            branch::get_branch,
            branch::update_branch,
            branch::delete_branch
        ))
        .routes(routes!(user::list_users, user::create_user))
        .routes(routes!(user::get_user, user::update_user, user::delete_user))
        .routes(routes!(group::list_groups, group::create_group))
        .routes(routes!(
            group::get_group,
            group::update_group,
            group::delete_group
        ))
        .routes(routes!(group::toggle_group_status))
        .routes(routes!(group::get_group_roster))
        .routes(routes!(report::get_group_report))
        .routes(routes!(student::list_students, student::create_student))
        .routes(routes!(
            student::get_student,
            student::update_student,
            student::delete_student
        ))
        .routes(routes!(student::get_student_attendance))
        .routes(routes!(enrollment::get_enrollment_history))
        .routes(routes!(enrollment::enroll_student))
        .routes(routes!(enrollment::transfer_student))
        .routes(routes!(enrollment::end_enrollment))
        .routes(routes!(enrollment::reactivate_enrollment))
        .routes(routes!(
            attendance::get_active_groups,
            attendance::store_attendance
        ))
        .routes(routes!(attendance::get_session_attendance))
}
