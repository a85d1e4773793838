//! Brand business logic - listing, lookup, and creation of brands.

use crate::{
    entities::{Brand, brand},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};

/// Fields for creating a brand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    /// Brand name
    pub name: String,
    /// Logo URL
    #[serde(default)]
    pub logo: String,
    /// Description
    #[serde(default)]
    pub description: String,
}

/// Retrieves all brands ordered alphabetically by name.
pub async fn list_brands(db: &DatabaseConnection) -> Result<Vec<brand::Model>> {
    Brand::find()
        .order_by_asc(brand::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a brand by its unique ID.
pub async fn get_brand_by_id(
    db: &DatabaseConnection,
    brand_id: i64,
) -> Result<Option<brand::Model>> {
    Brand::find_by_id(brand_id).one(db).await.map_err(Into::into)
}

/// Finds a brand by exact name.
pub async fn get_brand_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<brand::Model>> {
    Brand::find()
        .filter(brand::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new brand; the name must not be blank.
pub async fn create_brand(db: &DatabaseConnection, input: BrandInput) -> Result<brand::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::validation("Brand name cannot be empty"));
    }

    let brand = brand::ActiveModel {
        name: Set(input.name.trim().to_string()),
        logo: Set(input.logo),
        description: Set(input.description),
        ..Default::default()
    };
    brand.insert(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_brand_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_brand(&db, brand_input("  ")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(list_brands(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_brand_lookups() -> Result<()> {
        let db = setup_test_db().await?;
        let prada = create_brand(&db, brand_input("Prada")).await?;
        let gucci = create_brand(&db, brand_input(" Gucci ")).await?;

        assert_eq!(gucci.name, "Gucci");
        assert_eq!(list_brands(&db).await?, vec![gucci.clone(), prada.clone()]);
        assert_eq!(get_brand_by_id(&db, prada.id).await?, Some(prada));
        assert_eq!(get_brand_by_name(&db, "Gucci").await?, Some(gucci));
        assert!(get_brand_by_name(&db, "gucci").await?.is_none());
        assert!(get_brand_by_id(&db, 999).await?.is_none());

        Ok(())
    }
}
