//! Unified error type for the storefront.
//!
//! Every layer (configuration, business logic, HTTP handlers, storefront client) returns
//! this error so failures propagate with `?`. The HTTP mapping lives in `api::error`.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Input that failed a business rule (maps to 400)
    #[error("{message}")]
    Validation {
        /// Human-readable reason, sent back to the caller
        message: String,
    },

    /// Registration or update with an email that belongs to another user
    #[error("User with this email already exists")]
    DuplicateEmail {
        /// The conflicting email
        email: String,
    },

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, or expired bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated caller lacks permission for the target record
    #[error("Forbidden")]
    Forbidden,

    /// Record lookup by id came back empty
    #[error("{entity} not found")]
    NotFound {
        /// Entity name as shown to callers ("Product", "Order", ...)
        entity: &'static str,
        /// The id that was looked up
        id: i64,
    },

    /// Non-success response from the storefront API
    #[error("API request failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The server's `message` field, or a generic fallback
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
