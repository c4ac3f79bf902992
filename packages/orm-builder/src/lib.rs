//! Database client builder for SeaORM.
//!
//! Reconciles loosely-spelled connection options, constructs a pooled client
//! with the standard ORM plugins attached, and offers a server-version
//! integrity check plus a directory-based model loader on the resulting handle.

pub mod bootstrap;
pub mod config;
pub mod dialect;
pub mod error;
pub mod handle;
pub mod integrity;
pub mod models;
pub mod plugin;

pub use bootstrap::{bootstrap, bootstrap_with, build, ClientConnector, SeaOrmConnector};
pub use config::{reconcile, BuilderEnv, CanonicalOptions, RawOptions};
pub use dialect::Dialect;
pub use error::BuilderError;
pub use handle::ClientHandle;
pub use models::{derive_model_name, LoadOptions, ModelDefinition, ModelRegistry};
pub use plugin::Plugin;

/// The underlying ORM, re-exported for callers that need its query API.
pub use sea_orm;
