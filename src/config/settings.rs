//! Application settings loaded from environment variables.
//!
//! Values are read through a lookup function so the same parsing runs against the real
//! process environment at startup and against plain maps in tests.

use super::database::DatabaseSettings;
use crate::errors::{Error, Result};
use std::{fmt::Display, ops::RangeInclusive, path::PathBuf, str::FromStr, time::Duration};
use tracing::{debug, info};

/// Accepted token lifetimes, in hours (up to a year)
pub const TOKEN_TTL_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;

/// Accepted bcrypt cost factors
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port
    pub port: u16,
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in hours
    pub token_ttl_hours: i64,
    /// bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
    /// How often the background task pings the database
    pub keep_alive_interval: Duration,
    /// TOML file used to seed an empty catalog
    pub catalog_seed_path: PathBuf,
    /// Database connection settings
    pub database: DatabaseSettings,
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings using `lookup` to resolve each variable.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `JWT_SECRET` is missing, any value fails to parse, or a
    /// numeric value falls outside its accepted range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| Error::Config {
                message: "JWT_SECRET must be set".to_string(),
            })?;

        let settings = Self {
            port: parse_or(&lookup, "PORT", 5000)?,
            jwt_secret,
            token_ttl_hours: parse_in_range(&lookup, "TOKEN_TTL_HOURS", 24, TOKEN_TTL_HOURS_RANGE)?,
            bcrypt_cost: parse_in_range(
                &lookup,
                "BCRYPT_COST",
                bcrypt::DEFAULT_COST,
                BCRYPT_COST_RANGE,
            )?,
            keep_alive_interval: Duration::from_secs(parse_in_range(
                &lookup,
                "KEEP_ALIVE_INTERVAL_SECS",
                300,
                1..=u64::MAX,
            )?),
            catalog_seed_path: lookup("CATALOG_SEED_PATH")
                .map_or_else(|| PathBuf::from("catalog.toml"), PathBuf::from),
            database: DatabaseSettings::from_lookup(&lookup)?,
        };

        info!(
            port = settings.port,
            token_ttl_hours = settings.token_ttl_hours,
            "Loaded application settings"
        );
        Ok(settings)
    }
}

/// Parses `key` if present, otherwise falls back to `default`.
pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| Error::Config {
            message: format!("Invalid {key} value '{raw}': {e}"),
        }),
        None => {
            debug!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

/// Like [`parse_or`], but rejects values outside `range`.
fn parse_in_range<F, T>(lookup: &F, key: &str, default: T, range: RangeInclusive<T>) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display + PartialOrd,
    T::Err: Display,
{
    let value = parse_or(lookup, key, default)?;
    if !range.contains(&value) {
        return Err(Error::Config {
            message: format!(
                "{key} must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_secret_is_set() {
        let settings = Settings::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(settings.port, 5000);
        assert_eq!(settings.token_ttl_hours, 24);
        assert_eq!(settings.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(settings.keep_alive_interval, Duration::from_secs(300));
        assert_eq!(settings.catalog_seed_path, PathBuf::from("catalog.toml"));
        assert_eq!(settings.database.host, "localhost");
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let result = Settings::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = Settings::from_lookup(lookup_from(&[("JWT_SECRET", "  ")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("TOKEN_TTL_HOURS", "2"),
            ("BCRYPT_COST", "4"),
            ("KEEP_ALIVE_INTERVAL_SECS", "60"),
            ("CATALOG_SEED_PATH", "/etc/shop/catalog.toml"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.token_ttl_hours, 2);
        assert_eq!(settings.bcrypt_cost, 4);
        assert_eq!(settings.keep_alive_interval, Duration::from_secs(60));
        assert_eq!(
            settings.catalog_seed_path,
            PathBuf::from("/etc/shop/catalog.toml")
        );
    }

    #[test]
    fn test_unparseable_port_is_config_error() {
        let result = Settings::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "not-a-port"),
        ]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_out_of_range_values_are_config_errors() {
        for (key, value) in [
            ("KEEP_ALIVE_INTERVAL_SECS", "0"),
            ("TOKEN_TTL_HOURS", "0"),
            ("TOKEN_TTL_HOURS", "-5"),
            ("TOKEN_TTL_HOURS", "9223372036854775807"),
            ("BCRYPT_COST", "3"),
            ("BCRYPT_COST", "32"),
        ] {
            let result = Settings::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret"), (key, value)]));
            assert!(
                matches!(&result, Err(Error::Config { message }) if message.starts_with(key)),
                "{key}={value} gave {result:?}"
            );
        }

        // Range ends are accepted
        let settings = Settings::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("KEEP_ALIVE_INTERVAL_SECS", "1"),
            ("TOKEN_TTL_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(settings.keep_alive_interval, Duration::from_secs(1));
        assert_eq!(settings.token_ttl_hours, 8760);
    }
}
