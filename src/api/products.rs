//! `/api/products` handlers.

use super::{
    AppState,
    extract::{ApiJson, ApiPath},
};
use crate::{
    core::{
        catalog::{CatalogParams, CatalogQuery},
        product::{self, ProductInput, ProductListing},
    },
    entities::product as product_entity,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};

/// `GET /products` with catalog query parameters
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<Vec<ProductListing>>> {
    let query = CatalogQuery::from(&params);
    tracing::debug!(?query, "Listing products");
    Ok(Json(product::list_products(&state.db, &query).await?))
}

/// `GET /products/:id`
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ProductListing>> {
    product::get_product_listing(&state.db, id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound {
            entity: "Product",
            id,
        })
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<product_entity::Model>)> {
    let product = product::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/:id`
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<product_entity::Model>> {
    Ok(Json(product::update_product(&state.db, id, input).await?))
}

/// `DELETE /products/:id`
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Value>> {
    product::delete_product(&state.db, id).await?;
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
