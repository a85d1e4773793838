//! Populates an empty catalog from the seed file at startup.

use crate::{
    config::catalog::{CatalogSeed, load_catalog_seed},
    core::{
        brand::{self, BrandInput},
        product::{self, ProductInput},
    },
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, path::Path};
use tracing::{info, instrument, warn};

/// Seeds brands and products from `path` if the product table is empty.
///
/// A missing seed file is logged and skipped rather than treated as fatal. Returns the number
/// of products created.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed, or a database operation fails.
#[instrument(skip(db))]
pub async fn seed_catalog_if_empty(db: &DatabaseConnection, path: &Path) -> Result<usize> {
    let existing = product::count_products(db).await?;
    if existing > 0 {
        info!("Catalog already has {existing} products, skipping seed");
        return Ok(0);
    }
    if !path.exists() {
        warn!("Catalog is empty and seed file {} was not found", path.display());
        return Ok(0);
    }

    let seed = load_catalog_seed(path)?;
    let created = apply_seed(db, seed).await?;
    info!("Seeded catalog with {created} products");
    Ok(created)
}

/// Inserts the seed's brands (reusing any that already exist by name) and products.
pub async fn apply_seed(db: &DatabaseConnection, seed: CatalogSeed) -> Result<usize> {
    let mut brand_ids = HashMap::new();
    for entry in seed.brands {
        let model = match brand::get_brand_by_name(db, entry.name.trim()).await? {
            Some(existing) => existing,
            None => {
                brand::create_brand(
                    db,
                    BrandInput {
                        name: entry.name,
                        logo: entry.logo,
                        description: entry.description,
                    },
                )
                .await?
            }
        };
        brand_ids.insert(model.name.clone(), model.id);
    }

    let mut created = 0;
    for entry in seed.products {
        let brand_id = match entry.brand.as_deref().map(str::trim) {
            Some(name) => match brand_ids.get(name) {
                Some(id) => Some(*id),
                None => match brand::get_brand_by_name(db, name).await? {
                    Some(existing) => Some(existing.id),
                    None => {
                        warn!(product = %entry.name, brand = name, "Seed product names an unknown brand");
                        None
                    }
                },
            },
            None => None,
        };

        product::create_product(
            db,
            ProductInput {
                name: entry.name,
                description: entry.description,
                price: entry.price,
                image_url: entry.image_url,
                category: entry.category,
                brand_id,
            },
        )
        .await?;
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::catalog::CatalogQuery, test_utils::*};
    use std::io::Write;

    const SEED: &str = r#"
[[brands]]
name = "Ray-Ban"
logo = "https://example.com/rayban.png"
description = "Iconic eyewear"

[[brands]]
name = "Oakley"
logo = "https://example.com/oakley.png"
description = "Sport performance"

[[products]]
name = "Aviator Classic"
description = "Gold frame"
price = "180.00"
image_url = "https://example.com/aviator.jpg"
category = "sunglasses"
brand = "Ray-Ban"

[[products]]
name = "Radar EV"
description = "Sport shield"
price = 150
image_url = "https://example.com/radar.jpg"
category = "sport"
brand = "Oakley"

[[products]]
name = "Readers"
description = "Plain readers"
price = "35.50"
image_url = ""
category = "unisex"
"#;

    fn write_seed(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_seed_populates_empty_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        let file = write_seed(SEED);

        let created = seed_catalog_if_empty(&db, file.path()).await?;
        assert_eq!(created, 3);
        assert_eq!(brand::list_brands(&db).await?.len(), 2);

        let listings = product::list_products(&db, &CatalogQuery::default()).await?;
        let aviator = listings
            .iter()
            .find(|l| l.product.name == "Aviator Classic")
            .unwrap();
        assert_eq!(aviator.brand.as_ref().unwrap().name, "Ray-Ban");
        let readers = listings.iter().find(|l| l.product.name == "Readers").unwrap();
        assert!(readers.brand.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_skips_non_empty_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_product(&db, "Existing", rust_decimal::Decimal::ONE, "men", None).await?;
        let file = write_seed(SEED);

        assert_eq!(seed_catalog_if_empty(&db, file.path()).await?, 0);
        assert_eq!(product::count_products(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_not_fatal() -> Result<()> {
        let db = setup_test_db().await?;
        let dir = tempfile::tempdir()?;

        let created = seed_catalog_if_empty(&db, &dir.path().join("absent.toml")).await?;
        assert_eq!(created, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_reuses_existing_brand() -> Result<()> {
        let (db, existing) = setup_with_brand().await?;
        let seed = format!(
            r#"
[[brands]]
name = "{}"
logo = ""
description = ""

[[products]]
name = "Frame"
description = ""
price = 10
image_url = ""
category = "men"
brand = "{}"
"#,
            existing.name, existing.name
        );
        let file = write_seed(&seed);

        seed_catalog_if_empty(&db, file.path()).await?;
        assert_eq!(brand::list_brands(&db).await?, vec![existing.clone()]);
        let listings = product::list_products(&db, &CatalogQuery::default()).await?;
        assert_eq!(listings[0].product.brand_id, Some(existing.id));

        Ok(())
    }
}
