//! Process configuration.
//!
//! Everything is read once at startup from the environment, after `.env` (if
//! present) has been loaded with `dotenvy`.
//!
//! Environment variables:
//! - `MONGO_URI`: MongoDB connection string (required for the mongo backend)
//! - `USERNAME` / `PASSWORD`: the only credentials `/token` accepts (required)
//! - `TODO_ACCESS_TOKEN`: token handed out by `/token` (default: `secret_token`)
//! - `TODO_TOKEN_CHECK`: `exact` or `presence` (default: `exact`)
//! - `TODO_REPLACE_SUCCESS`: `matched` or `modified` (default: `matched`)
//! - `TODO_STORE`: `mongo` or `memory` (default: `mongo`)
//! - `TODO_DATABASE` / `TODO_COLLECTION`: default `todo` / `todos`
//! - `HOST` / `PORT`: listen address (default: `127.0.0.1:8000`)

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// How bearer tokens on `/todos` requests are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenCheck {
    /// The token must equal the configured access token.
    #[default]
    Exact,
    /// Any well-formed bearer token is accepted.
    Presence,
}

impl FromStr for TokenCheck {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "presence" => Ok(Self::Presence),
            _ => Err(()),
        }
    }
}

/// Which count from a replacement decides whether `PUT /todos/{id}` succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceSuccess {
    /// One document matched the id. Replacing with identical content succeeds.
    #[default]
    Matched,
    /// One document actually changed. Identical content yields 404.
    Modified,
}

impl FromStr for ReplaceSuccess {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "matched" => Ok(Self::Matched),
            "modified" => Ok(Self::Modified),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo {
        uri: String,
        database: String,
        collection: String,
    },
    Memory,
}

/// Settings consulted by `/token` and the bearer extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub username: String,
    pub password: String,
    pub access_token: String,
    pub token_check: TokenCheck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub auth: AuthSettings,
    pub replace_success: ReplaceSuccess,
    pub store: StoreBackend,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let store = match or_default("TODO_STORE", "mongo").to_ascii_lowercase().as_str() {
            "mongo" => StoreBackend::Mongo {
                uri: required("MONGO_URI")?,
                database: or_default("TODO_DATABASE", "todo"),
                collection: or_default("TODO_COLLECTION", "todos"),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "TODO_STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            auth: AuthSettings {
                username: required("USERNAME")?,
                password: required("PASSWORD")?,
                access_token: or_default("TODO_ACCESS_TOKEN", "secret_token"),
                token_check: parse_or_default(&lookup, "TODO_TOKEN_CHECK")?,
            },
            replace_success: parse_or_default(&lookup, "TODO_REPLACE_SUCCESS")?,
            store,
            host: or_default("HOST", "127.0.0.1"),
            port: match lookup("PORT") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
                None => 8000,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T, F>(lookup: &F, name: &'static str) -> Result<T, ConfigError>
where
    T: FromStr + Default,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(T::default()),
    }
}
