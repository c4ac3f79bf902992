//! Mock client connectors for handles that never touch a real server.

use std::collections::BTreeMap;

use async_trait::async_trait;
use orm_builder::config::{reconcile, RawOptions};
use orm_builder::{bootstrap_with, ClientConnector, ClientHandle};
use parking_lot::Mutex;
use sea_orm::{
    ConnectOptions, DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr, Value,
};

/// Hands out a prepared connection once and records the options it was given.
pub struct MockConnector {
    conn: Mutex<Option<DatabaseConnection>>,
    seen: Mutex<Vec<ConnectOptions>>,
}

impl MockConnector {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Connector backed by an empty mock database.
    pub fn empty(backend: DatabaseBackend) -> Self {
        Self::new(MockDatabase::new(backend).into_connection())
    }

    pub fn seen_options(&self) -> Vec<ConnectOptions> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl ClientConnector for MockConnector {
    async fn connect(&self, options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
        self.seen.lock().push(options);
        self.conn.lock().take().ok_or_else(|| {
            DbErr::Conn(RuntimeErr::Internal(
                "mock connection already handed out".to_string(),
            ))
        })
    }
}

/// A single `server_version` row as the driver would return it.
pub fn version_row(version: &str) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("server_version", Value::from(version.to_string()))])
}

/// Mock database answering the version query with `version`.
pub fn version_db(backend: DatabaseBackend, version: &str) -> DatabaseConnection {
    MockDatabase::new(backend)
        .append_query_results([vec![version_row(version)]])
        .into_connection()
}

/// Build a handle from a JSON options document over the given connection.
pub async fn handle_with(options_json: &str, conn: DatabaseConnection) -> ClientHandle {
    let raw = RawOptions::from_json_str(options_json).expect("options json");
    let canonical = reconcile(raw, false).expect("reconcile");
    bootstrap_with(canonical, &MockConnector::new(conn))
        .await
        .expect("bootstrap")
}
