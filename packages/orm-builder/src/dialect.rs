use std::fmt;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use sea_orm::DatabaseBackend;

use crate::config::ConnectionOptions;
use crate::error::BuilderError;

const SQLITE_MEMORY: &str = ":memory:";

/// SQL dialect resolved from the `client` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    MariaDb,
    Sqlite,
}

impl Dialect {
    /// Resolve a client identifier (`pg`, `postgres`, `mysql2`, `maria`, ...).
    pub fn from_client(client: &str) -> Result<Self, BuilderError> {
        match client {
            "pg" | "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mysql2" => Ok(Self::MySql),
            "mariadb" | "mariasql" | "maria" => Ok(Self::MariaDb),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(BuilderError::client_construction(format!(
                "unsupported client '{other}' (expected one of: mysql, pg, postgres, postgresql, sqlite3, sqlite, mariadb, mariasql, maria)"
            ))),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            Self::MySql => "mysql",
            Self::MariaDb => "mariadb",
            Self::Sqlite => "sqlite3",
        }
    }

    pub fn backend(self) -> DatabaseBackend {
        match self {
            Self::Postgres => DatabaseBackend::Postgres,
            Self::MySql | Self::MariaDb => DatabaseBackend::MySql,
            Self::Sqlite => DatabaseBackend::Sqlite,
        }
    }

    /// Introspection query reporting the server version, if the dialect has one.
    pub fn version_query(self) -> Option<&'static str> {
        match self {
            Self::Postgres => Some("SHOW server_version;"),
            Self::MySql | Self::MariaDb => Some("SELECT VERSION() as server_version;"),
            Self::Sqlite => None,
        }
    }

    fn scheme(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql | Self::MariaDb => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    fn default_port(self) -> Option<u16> {
        match self {
            Self::Postgres => Some(5432),
            Self::MySql | Self::MariaDb => Some(3306),
            Self::Sqlite => None,
        }
    }

    /// Build a driver connection URL. Credentials are percent-encoded.
    pub fn connection_url(self, conn: &ConnectionOptions) -> String {
        if self == Self::Sqlite {
            return match conn.filename.as_deref().or(conn.database.as_deref()) {
                None | Some("") | Some(SQLITE_MEMORY) => "sqlite::memory:".to_string(),
                Some(file) => format!("sqlite://{file}?mode=rwc"),
            };
        }

        let mut url = format!("{}://", self.scheme());

        if let Some(user) = conn.user.as_deref() {
            url.push_str(&utf8_percent_encode(user, NON_ALPHANUMERIC).to_string());
            if let Some(password) = conn.password.as_deref() {
                url.push(':');
                url.push_str(&utf8_percent_encode(password, NON_ALPHANUMERIC).to_string());
            }
            url.push('@');
        }

        url.push_str(conn.host.as_deref().unwrap_or("localhost"));

        if let Some(port) = conn.port.or(self.default_port()) {
            url.push_str(&format!(":{port}"));
        }

        if let Some(database) = conn.database.as_deref() {
            url.push('/');
            url.push_str(&utf8_percent_encode(database, NON_ALPHANUMERIC).to_string());
        }

        url
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
