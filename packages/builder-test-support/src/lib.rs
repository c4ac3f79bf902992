//! Test support for the ORM builder
//!
//! Provides unified logging initialization, mock client connectors and
//! model-file fixtures shared by the integration suites.

pub mod fixtures;
pub mod mock_client;
pub mod test_logging;
