//! Authentication business logic - registration, login, and bearer tokens.
//!
//! Passwords are stored as bcrypt hashes; hashing and verification run on tokio's blocking
//! pool so request handlers never stall the runtime. Tokens are HS256 JWTs carrying the user
//! id, email, and role, valid for a configurable number of hours (24 by default).
//!
//! Login failures never reveal whether the email or the password was wrong: both surface as
//! [`Error::InvalidCredentials`].

use crate::{
    config::settings::Settings,
    entities::{User, user},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use regex::Regex;
use sea_orm::{Set, SqlErr, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::LazyLock};
use tracing::{debug, info, warn};

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Basic shape check: something@something.tld with no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Rejects passwords shorter than [`MIN_PASSWORD_LENGTH`].
pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

/// Claims carried by every bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i64,
    /// User email at issue time
    pub email: String,
    /// User role at issue time
    pub role: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

/// Registration payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
    /// Role; defaults to `"customer"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Login payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Successful login: a token plus the user (password never included).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// The authenticated user
    pub user: user::Model,
}

/// Signs and verifies tokens and hashes passwords.
#[derive(Clone)]
pub struct Authenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    hash_cost: u32,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Creates an authenticator signing with `secret`.
    ///
    /// A lifetime too large for [`Duration`] saturates; issuing tokens then fails instead of
    /// panicking.
    #[must_use]
    pub fn new(secret: &str, token_ttl_hours: i64, hash_cost: u32) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::try_hours(token_ttl_hours).unwrap_or(Duration::MAX),
            hash_cost,
        }
    }

    /// Creates an authenticator from application settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.jwt_secret,
            settings.token_ttl_hours,
            settings.bcrypt_cost,
        )
    }

    /// Issues a signed token for `user`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the configured lifetime overflows the expiry timestamp.
    pub fn issue_token(&self, user: &user::Model) -> Result<String> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.token_ttl)
            .ok_or_else(|| Error::Config {
                message: "Token lifetime is out of range".to_string(),
            })?;
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(Into::into)
    }

    /// Validates signature and expiry, returning the claims.
    ///
    /// # Errors
    /// Any decoding failure becomes [`Error::Unauthorized`].
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected bearer token: {e}");
                Error::Unauthorized
            })
    }

    /// Hashes a password on the blocking pool.
    pub async fn hash_password(&self, password: String) -> Result<String> {
        let cost = self.hash_cost;
        Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }

    /// Checks a password against a stored hash on the blocking pool.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
        Ok(verified.unwrap_or_else(|e| {
            warn!("Stored password hash could not be checked: {e}");
            false
        }))
    }
}

/// Maps a unique-index rejection on `users.email` to [`Error::DuplicateEmail`].
///
/// The lookup before a write can race with another writer; the index has the last word.
pub(crate) fn email_conflict(err: DbErr, email: &str) -> Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateEmail {
            email: email.to_string(),
        },
        _ => err.into(),
    }
}

/// Registers a new user.
///
/// Checks run in order: duplicate email, email format, password length, blank name.
///
/// # Errors
/// Returns [`Error::DuplicateEmail`] if the email is taken, [`Error::Validation`] for
/// malformed input, or a database/hashing error.
pub async fn register(
    db: &DatabaseConnection,
    auth: &Authenticator,
    input: RegisterInput,
) -> Result<user::Model> {
    let email = input.email.trim().to_string();

    if User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateEmail { email });
    }
    if !is_valid_email(&email) {
        return Err(Error::validation("Invalid email format"));
    }
    validate_password(&input.password)?;
    if input.name.trim().is_empty() {
        return Err(Error::validation("Name cannot be empty"));
    }

    let password = auth.hash_password(input.password).await?;
    let role = input
        .role
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .unwrap_or_else(|| user::DEFAULT_ROLE.to_string());

    let user = user::ActiveModel {
        name: Set(input.name.trim().to_string()),
        email: Set(email.clone()),
        password: Set(password),
        role: Set(role),
        ..Default::default()
    };
    let user = user
        .insert(db)
        .await
        .map_err(|e| email_conflict(e, &email))?;
    info!(user_id = user.id, "Registered new user");
    Ok(user)
}

/// Checks credentials and issues a token.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] for an unknown email or a wrong password.
pub async fn login(
    db: &DatabaseConnection,
    auth: &Authenticator,
    email: &str,
    password: &str,
) -> Result<LoginResponse> {
    let Some(user) = User::find()
        .filter(user::Column::Email.eq(email.trim()))
        .one(db)
        .await?
    else {
        debug!("Login attempt for unknown email");
        return Err(Error::InvalidCredentials);
    };

    if !auth
        .verify_password(password.to_string(), user.password.clone())
        .await?
    {
        debug!(user_id = user.id, "Login attempt with wrong password");
        return Err(Error::InvalidCredentials);
    }

    let token = auth.issue_token(&user)?;
    info!(user_id = user.id, "User logged in");
    Ok(LoginResponse { token, user })
}

/// Issues a fresh token for an existing user.
///
/// # Errors
/// Returns [`Error::NotFound`] if the user no longer exists.
pub async fn refresh_token(
    db: &DatabaseConnection,
    auth: &Authenticator,
    user_id: i64,
) -> Result<String> {
    let user = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "User",
            id: user_id,
        })?;
    auth.issue_token(&user)
}
