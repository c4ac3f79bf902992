//! Builder configuration: raw/canonical option trees and the debug strategy.

pub mod debug;
pub mod options;

pub use debug::{debug_from_env_value, BuilderEnv, SQL_DEBUG_VAR};
pub use options::{
    reconcile, CanonicalOptions, ConnectionOptions, PoolOptions, RawConnection, RawOptions,
    RawPool,
};
