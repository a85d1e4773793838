//! Catalog seed loading from catalog.toml
//!
//! The seed file lists brands and the products that belong to them. It is used to populate
//! an empty catalog at startup; products name their brand rather than referencing an id.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    /// Brands to create
    #[serde(default)]
    pub brands: Vec<BrandSeed>,
    /// Products to create
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// A brand entry in the seed file
#[derive(Debug, Deserialize, Clone)]
pub struct BrandSeed {
    /// Brand name
    pub name: String,
    /// Logo URL
    pub logo: String,
    /// Description
    pub description: String,
}

/// A product entry in the seed file
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Description
    pub description: String,
    /// Unit price
    pub price: Decimal,
    /// Image URL
    pub image_url: String,
    /// Catalog category
    pub category: String,
    /// Name of a brand listed in the same file
    pub brand: Option<String>,
}

/// Loads the catalog seed from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog_seed<P: AsRef<Path>>(path: P) -> Result<CatalogSeed> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load catalog seed from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog seed {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog seed {}: {e}", path_ref.display()),
    })
}
