/// Catalog seed file loading from catalog.toml
pub mod catalog;

/// Database configuration and connection management
pub mod database;

/// Application settings from environment variables
pub mod settings;
