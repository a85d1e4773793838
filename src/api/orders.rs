//! `/api/orders` handlers.

use super::{
    AppState,
    extract::{ApiJson, ApiPath, MaybeAuthUser},
};
use crate::{
    core::order::{self, OrderDetails, OrderInput},
    entities::order as order_entity,
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

/// Body of `PUT /orders/:id`
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    /// New status
    pub status: String,
}

/// `GET /orders`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderDetails>>> {
    Ok(Json(order::list_orders(&state.db).await?))
}

/// `GET /orders/:id`
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<OrderDetails>> {
    order::get_order_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound { entity: "Order", id })
}

/// `POST /orders`; the bearer's user id fills in a missing `userId`.
pub async fn create(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    ApiJson(mut input): ApiJson<OrderInput>,
) -> Result<(StatusCode, Json<order_entity::Model>)> {
    if input.user_id.is_none() {
        input.user_id = caller.map(|claims| claims.id);
    }
    let order = order::create_order(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `PUT /orders/:id`
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<StatusUpdate>,
) -> Result<Json<order_entity::Model>> {
    Ok(Json(
        order::update_order_status(&state.db, id, &update.status).await?,
    ))
}

/// `GET /orders/user/:user_id`
pub async fn for_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Vec<OrderDetails>>> {
    Ok(Json(order::get_orders_for_user(&state.db, user_id).await?))
}
