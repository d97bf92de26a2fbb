//! Glue between the JWT layer and the user table.
//!
//! The resource-server layer validates the bearer token and stores its claims
//! in the request. [`subject_from_claims`] lifts the `sub` claim into a
//! [`Subject`], and [`CurrentUser`] resolves that subject to a user and the
//! branch scope every service call needs.

use crate::{error::AppError, state::AppState};
use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use database::{Scope, entities::users, services::user::UserService};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// The identity-provider subject of the authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(pub String);

/// Copies the token's `sub` claim into a [`Subject`] extension
pub async fn subject_from_claims(mut request: Request, next: Next) -> Response {
    let subject = request
        .extensions()
        .get::<DefaultClaims>()
        .and_then(|claims| claims.sub.clone());

    if let Some(subject) = subject {
        request.extensions_mut().insert(Subject(subject));
    }

    next.run(request).await
}

/// The user making the request, with their branch scope
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: users::Model,
    pub scope: Scope,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(Subject(subject)) = parts.extensions.get::<Subject>().cloned() else {
            return Err(AppError::Unauthenticated);
        };

        let state = AppState::from_ref(state);
        let Some(user) = UserService::find_by_subject(&state.db, &subject).await? else {
            log::warn!("No user is registered for subject {subject}");
            return Err(AppError::Unauthenticated);
        };

        Ok(Self {
            scope: Scope::for_user(&user),
            user,
        })
    }
}
