//! Environment-derived application configuration.
//!
//! All knobs come from the process environment:
//!
//! - `BIND_ADDR` — HTTP listen address, default `0.0.0.0:8080`.
//! - `DATABASE_URL` — PostgreSQL connection string, required.
//! - `REDIRECT_TTL_MINUTES` — reservation time-to-live, default 10. Values
//!   below 5 are clamped to 5: a shorter window makes normal user
//!   think-time fail.
//! - `REDIRECT_DEFAULT_PLATFORM` — applied when callers omit the platform,
//!   default `whatsapp`.
//! - `REDIRECT_BACKUP_NUMBER` — global fallback contact number.
//! - `REDIRECT_BACKUP_NUMBER_<TAG>` — per-platform fallback, tag
//!   upper-cased (e.g. `REDIRECT_BACKUP_NUMBER_WHATSAPP`).

use std::collections::HashMap;
use std::net::SocketAddr;

use tracing::warn;

use backend::domain::{BackupNumbers, Platform};

/// Minimum accepted reservation time-to-live in minutes.
pub const TTL_MINUTES_FLOOR: i64 = 5;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TTL_MINUTES: i64 = 10;
const DEFAULT_PLATFORM: &str = "whatsapp";
const BACKUP_NUMBER_VAR: &str = "REDIRECT_BACKUP_NUMBER";
const BACKUP_NUMBER_PREFIX: &str = "REDIRECT_BACKUP_NUMBER_";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `DATABASE_URL` is unset or blank.
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    /// `BIND_ADDR` is not a valid socket address.
    #[error("BIND_ADDR is not a valid socket address: {value}")]
    InvalidBindAddr {
        /// The rejected value.
        value: String,
    },

    /// `REDIRECT_TTL_MINUTES` is not a positive integer.
    #[error("REDIRECT_TTL_MINUTES must be a positive integer: {value}")]
    InvalidTtl {
        /// The rejected value.
        value: String,
    },

    /// `REDIRECT_DEFAULT_PLATFORM` is not a valid platform tag.
    #[error("REDIRECT_DEFAULT_PLATFORM is invalid: {message}")]
    InvalidDefaultPlatform {
        /// Validation failure description.
        message: String,
    },

    /// A `REDIRECT_BACKUP_NUMBER_<TAG>` suffix is not a valid platform tag.
    #[error("backup number variable {variable} has an invalid platform suffix: {message}")]
    InvalidBackupPlatform {
        /// The offending environment variable name.
        variable: String,
        /// Validation failure description.
        message: String,
    },
}

/// Application configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Reservation time-to-live in minutes, already clamped to the floor.
    pub ttl_minutes: i64,
    /// Platform applied when callers omit the query parameter.
    pub default_platform: Platform,
    /// Fallback contact numbers for rosterless platforms.
    pub backups: BackupNumbers,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Read configuration from an explicit variable set.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let get = |key: &str| {
            vars.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        let database_url = get("DATABASE_URL")
            .ok_or(ConfigError::MissingDatabaseUrl)?
            .to_owned();

        let bind_raw = get("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr =
            bind_raw
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr {
                    value: bind_raw.to_owned(),
                })?;

        let ttl_minutes = match get("REDIRECT_TTL_MINUTES") {
            None => DEFAULT_TTL_MINUTES,
            Some(raw) => {
                let parsed: i64 = raw.parse().map_err(|_| ConfigError::InvalidTtl {
                    value: raw.to_owned(),
                })?;
                if parsed <= 0 {
                    return Err(ConfigError::InvalidTtl {
                        value: raw.to_owned(),
                    });
                }
                if parsed < TTL_MINUTES_FLOOR {
                    warn!(
                        requested = parsed,
                        floor = TTL_MINUTES_FLOOR,
                        "REDIRECT_TTL_MINUTES below floor; clamping"
                    );
                    TTL_MINUTES_FLOOR
                } else {
                    parsed
                }
            }
        };

        let default_platform = Platform::new(get("REDIRECT_DEFAULT_PLATFORM").unwrap_or(DEFAULT_PLATFORM))
            .map_err(|err| ConfigError::InvalidDefaultPlatform {
                message: err.to_string(),
            })?;

        let default_backup = get(BACKUP_NUMBER_VAR).map(str::to_owned);
        let mut per_platform = HashMap::new();
        for (key, value) in &vars {
            let Some(suffix) = key.strip_prefix(BACKUP_NUMBER_PREFIX) else {
                continue;
            };
            let number = value.trim();
            if number.is_empty() {
                continue;
            }
            let platform =
                Platform::new(suffix).map_err(|err| ConfigError::InvalidBackupPlatform {
                    variable: key.clone(),
                    message: err.to_string(),
                })?;
            per_platform.insert(platform, number.to_owned());
        }

        Ok(Self {
            bind_addr,
            database_url,
            ttl_minutes,
            default_platform,
            backups: BackupNumbers::new(default_backup, per_platform),
        })
    }
}
