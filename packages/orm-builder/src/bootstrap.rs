use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::{reconcile, BuilderEnv, CanonicalOptions, PoolOptions, RawOptions};
use crate::dialect::Dialect;
use crate::error::BuilderError;
use crate::handle::ClientHandle;
use crate::plugin::{Plugin, PluginSet};

/// Constructs the low-level database client from connect options.
#[async_trait]
pub trait ClientConnector: Send + Sync {
    async fn connect(&self, options: ConnectOptions) -> Result<DatabaseConnection, DbErr>;
}

/// Default connector backed by SeaORM's sqlx pools
#[derive(Debug, Clone, Copy, Default)]
pub struct SeaOrmConnector;

#[async_trait]
impl ClientConnector for SeaOrmConnector {
    async fn connect(&self, options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
        Database::connect(options).await
    }
}

/// Reconcile `raw` against `env` and bootstrap a handle.
pub async fn build(raw: RawOptions, env: &BuilderEnv) -> Result<ClientHandle, BuilderError> {
    let canonical = reconcile(raw, env.debug_default())?;
    bootstrap(canonical).await
}

pub async fn bootstrap(canonical: CanonicalOptions) -> Result<ClientHandle, BuilderError> {
    bootstrap_with(canonical, &SeaOrmConnector).await
}

/// Bootstrap a handle through a caller-supplied connector.
pub async fn bootstrap_with(
    canonical: CanonicalOptions,
    connector: &dyn ClientConnector,
) -> Result<ClientHandle, BuilderError> {
    let client = canonical.client.as_deref().ok_or_else(|| {
        BuilderError::client_construction("required configuration option 'client' is missing")
    })?;
    let dialect = Dialect::from_client(client)?;
    let options = connect_options(dialect, &canonical)?;

    info!(
        "pool=create engine={} min={} max={} idle_ms={} debug={}",
        dialect, canonical.pool.min, canonical.pool.max, canonical.pool.idle, canonical.debug
    );

    let conn = connector.connect(options).await.map_err(|e| {
        BuilderError::client_construction(format!("failed to construct {dialect} client: {e}"))
    })?;

    let mut plugins = PluginSet::new();
    for plugin in Plugin::DEFAULT_ORDER {
        plugins.register(plugin)?;
    }
    info!(plugins = ?plugins.names(), "orm=ready");

    Ok(ClientHandle::new(conn, dialect, canonical, plugins))
}

/// Connect options for a lazily-connecting pool sized from `canonical.pool`.
pub fn connect_options(
    dialect: Dialect,
    canonical: &CanonicalOptions,
) -> Result<ConnectOptions, BuilderError> {
    validate_pool(&canonical.pool)?;

    let mut options = ConnectOptions::new(dialect.connection_url(&canonical.connection));
    options
        .max_connections(canonical.pool.max)
        .min_connections(canonical.pool.min)
        .idle_timeout(Duration::from_millis(canonical.pool.idle))
        .sqlx_logging(canonical.debug)
        .connect_lazy(true);
    Ok(options)
}

fn validate_pool(pool: &PoolOptions) -> Result<(), BuilderError> {
    if pool.max == 0 {
        return Err(BuilderError::client_construction(
            "pool.max must be at least 1",
        ));
    }
    if pool.min > pool.max {
        return Err(BuilderError::client_construction(format!(
            "pool.min ({}) must not exceed pool.max ({})",
            pool.min, pool.max
        )));
    }
    Ok(())
}
