use crate::{auth::CurrentUser, dtos::user::UserResponse};
use axum::Json;

/// Returns the account behind the bearer token
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid token or unknown subject", body = crate::error::ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(current: CurrentUser) -> Json<UserResponse> {
    Json(current.user.into())
}
