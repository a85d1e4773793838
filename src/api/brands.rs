//! `/api/brands` handlers.

use super::{
    AppState,
    extract::{ApiJson, ApiPath},
};
use crate::{
    core::brand::{self, BrandInput},
    entities::brand as brand_entity,
    errors::{Error, Result},
};
use axum::{Json, extract::State, http::StatusCode};

/// `GET /brands`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<brand_entity::Model>>> {
    Ok(Json(brand::list_brands(&state.db).await?))
}

/// `GET /brands/:id`
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<brand_entity::Model>> {
    brand::get_brand_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound { entity: "Brand", id })
}

/// `POST /brands`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BrandInput>,
) -> Result<(StatusCode, Json<brand_entity::Model>)> {
    let brand = brand::create_brand(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}
