//! Request extractors: JSON bodies and path ids that reject with the crate error, plus
//! bearer-token authentication.

use super::AppState;
use crate::{core::auth::Claims, errors::Error};
use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

/// JSON body whose rejection is a 400 with a `{message}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejection is a 400 with a `{message}` body.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

/// Claims of a caller that presented a valid bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Claims);

/// Claims of the caller if a valid bearer token was presented.
///
/// A missing or invalid token is not an error here.
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<Claims>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(Error::Unauthorized)?;
        state.auth.verify_token(token).map(Self)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(
            bearer_token(parts).and_then(|token| state.auth.verify_token(token).ok()),
        ))
    }
}

impl AuthUser {
    /// Whether the caller may modify the user with `user_id`: themselves, or any user for
    /// admins.
    #[must_use]
    pub fn can_manage(&self, user_id: i64) -> bool {
        self.0.id == user_id || self.0.role == crate::entities::user::ADMIN_ROLE
    }
}
