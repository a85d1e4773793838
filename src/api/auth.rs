//! `/api/auth` handlers.

use super::{
    AppState,
    extract::{ApiJson, AuthUser},
};
use crate::{
    core::auth::{self, LoginRequest, LoginResponse, RegisterInput},
    entities::user,
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

/// `POST /auth/register`. Self-registration always yields the default role.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(mut input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<user::Model>)> {
    input.role = None;
    let user = auth::register(&state.db, &state.auth, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(
        auth::login(&state.db, &state.auth, &request.email, &request.password).await?,
    ))
}

/// `POST /auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Value>> {
    let token = auth::refresh_token(&state.db, &state.auth, claims.id).await?;
    Ok(Json(json!({ "token": token })))
}
