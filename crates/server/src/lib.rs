pub mod auth;
pub mod config;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use axum::{Router, middleware};
use state::AppState;
use tower_http::compression::CompressionLayer;
use utoipa_swagger_ui::SwaggerUi;

/// Assembles the application.
///
/// `protect` wraps the authenticated routes, normally with the JWT layer.
/// Whatever it adds runs before the claims are turned into a subject.
pub fn app(
    state: AppState,
    protect: impl FnOnce(Router<AppState>) -> Router<AppState>,
) -> Router {
    let (public, mut openapi) = routes::public_routes().split_for_parts();
    let (protected, protected_api) = routes::protected_routes().split_for_parts();
    openapi.merge(protected_api);

    let protected = protect(protected.layer(middleware::from_fn(auth::subject_from_claims)));

    public
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new())
        .with_state(state)
}
