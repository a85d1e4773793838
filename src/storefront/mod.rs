//! Storefront client - the customer-facing side of the API.
//!
//! [`client::StorefrontClient`] wraps the REST endpoints, [`cart::Cart`] keeps the basket
//! between sessions, and both persist through a [`storage::Storage`].

pub mod cart;
pub mod client;
pub mod storage;

pub use cart::{Cart, CartItem};
pub use client::StorefrontClient;
pub use storage::{FileStorage, MemoryStorage, Storage};
