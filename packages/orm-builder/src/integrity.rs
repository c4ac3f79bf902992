//! Server version integrity check.

use lazy_regex::regex_captures;
use sea_orm::{FromQueryResult, Statement};
use semver::Version;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::error::BuilderError;
use crate::handle::ClientHandle;

/// Column carrying the version in every dialect's introspection query
pub const SERVER_VERSION_FIELD: &str = "server_version";

impl ClientHandle {
    /// Check the live server against the configured minimum version.
    ///
    /// Resolves `true` when no minimum is configured or the configured value is
    /// not valid semver.
    pub async fn inspect_integrity(&self) -> Result<bool, BuilderError> {
        let dialect = self.dialect();
        let query = dialect
            .version_query()
            .ok_or_else(|| BuilderError::UnsupportedDialect {
                dialect: dialect.name().to_string(),
            })?;

        let rows = JsonValue::find_by_statement(Statement::from_string(dialect.backend(), query))
            .all(self.connection())
            .await?;
        let result = JsonValue::Array(rows);
        let current = find_key(&result, SERVER_VERSION_FIELD).and_then(version_text);

        info!(
            "integrity=checked dialect={} server_version={} required={}",
            dialect,
            current.as_deref().unwrap_or("unknown"),
            self.min_server_version().unwrap_or("none")
        );

        let Some(required) = self.min_server_version() else {
            return Ok(true);
        };
        let Some(required_version) = parse_semver(required) else {
            debug!(required, "integrity=skip reason=invalid_min_version");
            return Ok(true);
        };

        let current = current.ok_or_else(|| BuilderError::ServerVersion {
            message: format!("no '{SERVER_VERSION_FIELD}' field in {dialect} version query result"),
        })?;
        let current_version = coerce_version(&current).ok_or_else(|| BuilderError::ServerVersion {
            message: format!("unrecognized {dialect} server version '{current}'"),
        })?;

        if current_version < required_version {
            return Err(BuilderError::VersionTooLow {
                dialect: dialect.name().to_string(),
                required: required.to_string(),
                current,
            });
        }

        Ok(true)
    }
}

/// Depth-first search for the first non-null value stored under `key`.
///
/// Object keys are visited in column order (`serde_json/preserve_order`).
pub fn find_key<'a>(value: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    match value {
        JsonValue::Object(map) => map.iter().find_map(|(k, v)| {
            if k == key && !v.is_null() {
                Some(v)
            } else {
                find_key(v, key)
            }
        }),
        JsonValue::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

fn version_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Strict semver, tolerating one leading `=` followed by one leading `v`.
pub fn parse_semver(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed);
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Leading `major[.minor[.patch]]` of a server-reported version string.
///
/// `16.2 (Debian 16.2-1.pgdg120+2)` becomes `16.2.0`, `10.11.2-MariaDB` becomes `10.11.2`.
pub fn coerce_version(raw: &str) -> Option<Version> {
    let (_, major, minor, patch) = regex_captures!(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?", raw)?;
    let part = |s: &str| if s.is_empty() { Some(0) } else { s.parse::<u64>().ok() };
    Some(Version::new(part(major)?, part(minor)?, part(patch)?))
}
