use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BuilderError;

pub const DEFAULT_POOL_MAX: u32 = 10;
pub const DEFAULT_POOL_MIN: u32 = 0;
pub const DEFAULT_POOL_IDLE_MS: u64 = 10_000;

/// Caller-supplied options, including the non-standard alias spellings
/// (`connection.db`, `connection.username`, `dialect`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawOptions {
    #[serde(default)]
    pub connection: Option<RawConnection>,
    #[serde(default)]
    pub pool: Option<RawPool>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub dialect: Option<String>,
    /// Minimum server version, semver formatted
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawConnection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// SQLite database file
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RawPool {
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub idle: Option<u64>,
}

impl RawOptions {
    pub fn from_json_str(json: &str) -> Result<Self, BuilderError> {
        serde_json::from_str(json)
            .map_err(|e| BuilderError::options(format!("invalid options document: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            BuilderError::options(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }
}

/// Alias-free options handed to client construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub connection: ConnectionOptions,
    pub pool: PoolOptions,
    pub debug: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolOptions {
    pub max: u32,
    pub min: u32,
    /// Idle timeout in milliseconds
    pub idle: u64,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max: DEFAULT_POOL_MAX,
            min: DEFAULT_POOL_MIN,
            idle: DEFAULT_POOL_IDLE_MS,
        }
    }
}

impl PoolOptions {
    fn merged(raw: Option<RawPool>) -> Self {
        let defaults = Self::default();
        let raw = raw.unwrap_or_default();
        Self {
            max: raw.max.unwrap_or(defaults.max),
            min: raw.min.unwrap_or(defaults.min),
            idle: raw.idle.unwrap_or(defaults.idle),
        }
    }
}

/// Merge caller options over the defaults and collapse alias pairs.
///
/// `debug_default` is used only when the caller did not set `debug`.
pub fn reconcile(raw: RawOptions, debug_default: bool) -> Result<CanonicalOptions, BuilderError> {
    let conn = raw.connection.unwrap_or_default();

    let database = resolve_alias(
        conn.database,
        conn.db,
        "connection.database",
        "connection.db",
    )?;
    let user = resolve_alias(
        conn.user,
        conn.username,
        "connection.user",
        "connection.username",
    )?;
    let client = resolve_alias(raw.client, raw.dialect, "client", "dialect")?;

    Ok(CanonicalOptions {
        client,
        connection: ConnectionOptions {
            host: conn.host,
            port: conn.port,
            password: conn.password,
            database,
            user,
            filename: conn.filename,
        },
        pool: PoolOptions::merged(raw.pool),
        debug: raw.debug.unwrap_or(debug_default),
        version: raw.version.filter(|v| !v.is_empty()),
    })
}

/// Empty strings count as unset; both spellings set is a conflict.
fn resolve_alias(
    canonical: Option<String>,
    alias: Option<String>,
    option: &'static str,
    alias_name: &'static str,
) -> Result<Option<String>, BuilderError> {
    let canonical = canonical.filter(|v| !v.is_empty());
    let alias = alias.filter(|v| !v.is_empty());

    match (canonical, alias) {
        (Some(_), Some(_)) => Err(BuilderError::Conflict {
            option,
            alias: alias_name,
        }),
        (canonical, alias) => Ok(canonical.or(alias)),
    }
}
