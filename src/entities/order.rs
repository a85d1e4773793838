//! Order entity - A purchase of one product in some quantity by a user.
//!
//! `user_id` and `product_id` are plain columns: the relations are declared through
//! `Related` only, so table creation emits no foreign keys and deleting a product or user
//! leaves its orders pointing at the removed id.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status given to new orders
pub const DEFAULT_STATUS: &str = "pending";

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Number of units ordered
    pub quantity: i32,
    /// Total charged for the order
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_price: Decimal,
    /// Open status string (`"pending"`, `"shipped"`, ...)
    pub status: String,
    /// When the order was placed
    pub order_date: DateTimeUtc,
    /// Customer who placed the order
    pub user_id: Option<i64>,
    /// Product that was ordered
    pub product_id: Option<i64>,
}

/// No constrained relations; see the module docs
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::user::Entity)
            .from(Column::UserId)
            .to(super::user::Column::Id)
            .into()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::belongs_to(super::product::Entity)
            .from(Column::ProductId)
            .to(super::product::Column::Id)
            .into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
