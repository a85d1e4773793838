//! Product entity - Items listed in the catalog.
//!
//! Prices are fixed-point decimals with two fractional digits. Each product optionally
//! belongs to a brand; orders point at products without a foreign-key constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier; higher ids are newer products
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product name, the target of catalog text search
    pub name: String,
    /// Long description
    pub description: String,
    /// Unit price
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    /// Product image URL
    pub image_url: String,
    /// Catalog category (e.g. "men", "sunglasses")
    pub category: String,
    /// Owning brand, if any
    pub brand_id: Option<i64>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to at most one brand
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::has_many(super::order::Entity).into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
