//! `/api/users` handlers.
//!
//! Reads are open; changing or deleting a user requires a token for that same user or an
//! admin token.

use super::{
    AppState,
    extract::{ApiJson, ApiPath, AuthUser},
};
use crate::{
    core::user::{self, UserUpdate},
    entities::user as user_entity,
    errors::{Error, Result},
};
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// `GET /users`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<user_entity::Model>>> {
    Ok(Json(user::list_users(&state.db).await?))
}

/// `GET /users/:id`
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<user_entity::Model>> {
    user::get_user_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound { entity: "User", id })
}

/// `GET /users/me`
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<user_entity::Model>> {
    user::get_user_by_id(&state.db, claims.id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound {
            entity: "User",
            id: claims.id,
        })
}

/// `PUT /users/:id`; non-admins cannot change roles
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(mut update): ApiJson<UserUpdate>,
) -> Result<Json<user_entity::Model>> {
    if !caller.can_manage(id) {
        return Err(Error::Forbidden);
    }
    // Only admins hand out roles
    if caller.0.role != user_entity::ADMIN_ROLE {
        update.role = None;
    }
    Ok(Json(user::update_user(&state.db, &state.auth, id, update).await?))
}

/// `DELETE /users/:id`
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>> {
    if !caller.can_manage(id) {
        return Err(Error::Forbidden);
    }
    user::delete_user(&state.db, id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
