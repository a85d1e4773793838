//! Core business logic - framework-agnostic catalog, account, and order operations.
//!
//! Everything here takes a SeaORM connection and returns [`crate::errors::Result`]; the HTTP
//! layer and the seeding code call into these functions.

/// Registration, login, and bearer tokens
pub mod auth;
/// Brand records
pub mod brand;
/// Catalog filter/sort contract
pub mod catalog;
/// Bounds for prices and totals
pub mod money;
/// Order records
pub mod order;
/// Product records
pub mod product;
/// Seeding an empty catalog
pub mod seed;
/// User records
pub mod user;
