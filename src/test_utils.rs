//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        auth::{self, Authenticator, RegisterInput},
        brand::{self, BrandInput},
        product::{self, ProductInput, ProductListing},
    },
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Signing secret used by every test authenticator
pub const TEST_SECRET: &str = "test-secret-do-not-use";

/// Password given to users made by [`create_test_user`]
pub const TEST_PASSWORD: &str = "password123";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Authenticator with a 24 hour token lifetime and the cheapest bcrypt cost.
pub fn test_authenticator() -> Authenticator {
    Authenticator::new(TEST_SECRET, 24, 4)
}

/// Sets up a test database together with a test authenticator.
pub async fn setup_with_auth() -> Result<(DatabaseConnection, Authenticator)> {
    Ok((setup_test_db().await?, test_authenticator()))
}

/// Registration payload with no explicit role.
pub fn register_input(name: &str, email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: None,
    }
}

/// Registers a customer with [`TEST_PASSWORD`], named after the local part of `email`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    auth: &Authenticator,
    email: &str,
) -> Result<entities::user::Model> {
    let name = email.split('@').next().unwrap_or(email);
    auth::register(db, auth, register_input(name, email, TEST_PASSWORD)).await
}

/// Brand payload with empty logo and description.
pub fn brand_input(name: &str) -> BrandInput {
    BrandInput {
        name: name.to_string(),
        logo: String::new(),
        description: String::new(),
    }
}

/// Product payload.
///
/// # Defaults
/// * description: empty
/// * `image_url`: empty
/// * category: "unisex"
pub fn product_input(name: &str, price: Decimal, brand_id: Option<i64>) -> ProductInput {
    ProductInput {
        name: name.to_string(),
        description: String::new(),
        price,
        image_url: String::new(),
        category: "unisex".to_string(),
        brand_id,
    }
}

/// Sets up a test database with a single "Ray-Ban" brand.
pub async fn setup_with_brand() -> Result<(DatabaseConnection, entities::brand::Model)> {
    let db = setup_test_db().await?;
    let brand = brand::create_brand(&db, brand_input("Ray-Ban")).await?;
    Ok((db, brand))
}

/// Creates a test product in the given category.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    category: &str,
    brand_id: Option<i64>,
) -> Result<entities::product::Model> {
    let mut input = product_input(name, price, brand_id);
    input.category = category.to_string();
    product::create_product(db, input).await
}

/// Rows of the shared catalog fixture: name, category, price in cents, brand name.
const CATALOG_FIXTURE: [(&str, &str, i64, Option<&str>); 6] = [
    ("Ray-Ban Aviator Classic", "sunglasses", 18000, Some("Ray-Ban")),
    ("Ray-Ban Wayfarer", "sunglasses", 15000, Some("Ray-Ban")),
    ("Gucci Square Frames", "premium", 69550, Some("Gucci")),
    ("Gucci Cat Eye", "women", 42025, Some("Gucci")),
    ("Oakley Aviator Sport", "sunglasses", 18000, Some("Oakley")),
    ("Reading Glasses", "unisex", 3500, None),
];

const FIXTURE_BRANDS: [&str; 3] = ["Ray-Ban", "Gucci", "Oakley"];

/// Sets up a test database holding the six-product catalog fixture.
///
/// Products get ids 1 through 6 in fixture order; the brands are returned in creation order.
pub async fn setup_with_catalog() -> Result<(DatabaseConnection, Vec<entities::brand::Model>)> {
    let db = setup_test_db().await?;

    let mut brands = Vec::new();
    for name in FIXTURE_BRANDS {
        brands.push(brand::create_brand(&db, brand_input(name)).await?);
    }

    for (name, category, cents, brand_name) in CATALOG_FIXTURE {
        let brand_id = brand_name
            .and_then(|wanted| brands.iter().find(|b| b.name == wanted))
            .map(|b| b.id);
        create_test_product(&db, name, Decimal::new(cents, 2), category, brand_id).await?;
    }

    Ok((db, brands))
}

/// The catalog fixture as in-memory listings, ids 1 through 6, without touching a database.
pub fn sample_listings() -> Vec<ProductListing> {
    let brands: Vec<entities::brand::Model> = FIXTURE_BRANDS
        .iter()
        .zip(1..)
        .map(|(name, id)| entities::brand::Model {
            id,
            name: (*name).to_string(),
            logo: String::new(),
            description: String::new(),
        })
        .collect();

    CATALOG_FIXTURE
        .iter()
        .zip(1..)
        .map(|((name, category, cents, brand_name), id)| {
            let brand = brand_name.and_then(|wanted| brands.iter().find(|b| b.name == wanted).cloned());
            ProductListing {
                product: entities::product::Model {
                    id,
                    name: (*name).to_string(),
                    description: String::new(),
                    price: Decimal::new(*cents, 2),
                    image_url: String::new(),
                    category: (*category).to_string(),
                    brand_id: brand.as_ref().map(|b| b.id),
                },
                brand,
            }
        })
        .collect()
}
