//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the storefront tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod brand;
pub mod order;
pub mod product;
pub mod user;

// Re-export specific types to avoid conflicts
pub use brand::{Column as BrandColumn, Entity as Brand, Model as BrandModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
