//! User entity - Customers and staff who can log in and place orders.
//!
//! The password column holds a bcrypt hash and is never serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role assigned at registration when none is supplied
pub const DEFAULT_ROLE: &str = "customer";

/// Role allowed to manage other users' accounts
pub const ADMIN_ROLE: &str = "admin";

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email, unique across users
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Free-form role, `"customer"` unless set otherwise
    pub role: String,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Entity::has_many(super::order::Entity).into()
    }
}

impl ActiveModelBehavior for ActiveModel {}
