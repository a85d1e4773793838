//! Product business logic - Handles all product-related operations.
//!
//! This module provides functions for creating, retrieving, updating, and deleting products.
//! Listing with filters goes through [`crate::core::catalog`]; single lookups return the
//! product together with its brand, which is the shape the storefront renders.

use crate::{
    core::{catalog::CatalogQuery, money},
    entities::{Brand, Product, brand, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{PaginatorTrait, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// A product with its brand embedded, as returned by catalog endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    /// The product row
    #[serde(flatten)]
    pub product: product::Model,
    /// The owning brand, if the product has one
    pub brand: Option<brand::Model>,
}

impl From<(product::Model, Option<brand::Model>)> for ProductListing {
    fn from((product, brand): (product::Model, Option<brand::Model>)) -> Self {
        Self { product, brand }
    }
}

/// Editable product fields, used for both create and full update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Product name
    pub name: String,
    /// Long description
    #[serde(default)]
    pub description: String,
    /// Unit price, within `0..=99_999_999.99` with at most two decimal places
    pub price: Decimal,
    /// Image URL
    #[serde(default)]
    pub image_url: String,
    /// Catalog category
    #[serde(default)]
    pub category: String,
    /// Owning brand, must exist when given
    #[serde(default)]
    pub brand_id: Option<i64>,
}

fn validate_input(input: &ProductInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Product name cannot be empty"));
    }
    money::check_amount(input.price, "Product price")?;
    Ok(())
}

async fn ensure_brand_exists(db: &DatabaseConnection, brand_id: Option<i64>) -> Result<()> {
    if let Some(brand_id) = brand_id {
        if Brand::find_by_id(brand_id).one(db).await?.is_none() {
            return Err(Error::validation(format!("Brand {brand_id} does not exist")));
        }
    }
    Ok(())
}

/// Lists products matching a catalog query.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_products(
    db: &DatabaseConnection,
    query: &CatalogQuery,
) -> Result<Vec<ProductListing>> {
    query.fetch(db).await
}

/// Retrieves a specific product by its unique ID, without its brand.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product together with its brand.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_listing(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<ProductListing>> {
    Ok(Product::find_by_id(product_id)
        .find_also_related(Brand)
        .one(db)
        .await?
        .map(ProductListing::from))
}

/// Creates a new product, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative, above 99,999,999.99, or finer than cents
/// - The referenced brand does not exist
/// - The database insert operation fails
pub async fn create_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model> {
    validate_input(&input)?;
    ensure_brand_exists(db, input.brand_id).await?;

    let product = product::ActiveModel {
        name: Set(input.name.trim().to_string()),
        description: Set(input.description),
        price: Set(input.price),
        image_url: Set(input.image_url),
        category: Set(input.category),
        brand_id: Set(input.brand_id),
        ..Default::default()
    };
    let product = product.insert(db).await?;
    tracing::debug!(product_id = product.id, "Created product");
    Ok(product)
}

/// Overwrites every editable field of an existing product.
///
/// # Errors
/// Returns an error if:
/// - The input fails validation (see [`create_product`])
/// - The product does not exist
/// - The database update operation fails
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    validate_input(&input)?;

    let mut product: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "Product",
            id: product_id,
        })?
        .into();

    ensure_brand_exists(db, input.brand_id).await?;

    product.name = Set(input.name.trim().to_string());
    product.description = Set(input.description);
    product.price = Set(input.price);
    product.image_url = Set(input.image_url);
    product.category = Set(input.category);
    product.brand_id = Set(input.brand_id);

    product.update(db).await.map_err(Into::into)
}

/// Hard deletes a product. Orders that reference it are left untouched.
///
/// # Errors
/// Returns an error if the product does not exist or the delete fails.
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<()> {
    let result = Product::delete_by_id(product_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "Product",
            id: product_id,
        });
    }
    tracing::debug!(product_id, "Deleted product");
    Ok(())
}

/// Counts all products in the catalog.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn count_products(db: &DatabaseConnection) -> Result<u64> {
    Product::find().count(db).await.map_err(Into::into)
}
