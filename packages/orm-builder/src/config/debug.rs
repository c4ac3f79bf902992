use std::env;

use tracing::warn;

/// Name of the environment variable that toggles SQL query logging
pub const SQL_DEBUG_VAR: &str = "SQL_DEBUG";

/// Process environment values consumed by the builder.
///
/// The builder never reads the process environment on its own; callers
/// capture it here (usually via [`BuilderEnv::from_process`]) and pass it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuilderEnv {
    pub sql_debug: Option<String>,
}

impl BuilderEnv {
    /// Snapshot `SQL_DEBUG` from the current process environment.
    pub fn from_process() -> Self {
        Self {
            sql_debug: env::var(SQL_DEBUG_VAR).ok(),
        }
    }

    pub fn with_sql_debug(value: impl Into<String>) -> Self {
        Self {
            sql_debug: Some(value.into()),
        }
    }

    /// Debug default derived from `SQL_DEBUG`; unusable values fall back to `false`.
    pub fn debug_default(&self) -> bool {
        debug_from_env_value(self.sql_debug.as_deref()).unwrap_or(false)
    }
}

/// Interpret a raw `SQL_DEBUG` value.
///
/// Accepts the JSON scalars `0`, `1`, `true` and `false`. Returns `None` (after
/// logging a warning) for anything else, leaving the caller to pick a default.
pub fn debug_from_env_value(raw: Option<&str>) -> Option<bool> {
    let raw = match raw {
        None | Some("") => return Some(false),
        Some(raw) => raw,
    };

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Bool(flag)) => Some(flag),
        Ok(serde_json::Value::Number(n)) if n.as_f64() == Some(1.0) => Some(true),
        Ok(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Some(false),
        _ => {
            warn!(
                var = SQL_DEBUG_VAR,
                "Failed to parse SQL_DEBUG environment variable. Thus the option is disabled. Expects boolean value which can also be represented by 0/1 integer values."
            );
            None
        }
    }
}
