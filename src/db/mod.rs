//! Database access layer.
//!
//! - Connection provider (pooled handle + per-call raw connections)
//! - Statement execution on fresh connections
//! - Schema introspection over the catalog
//! - PostgreSQL value decoding

pub mod executor;
pub mod introspect;
pub mod provider;
pub mod types;

pub use executor::StatementExecutor;
pub use introspect::SchemaInspector;
pub use provider::{ConnectionProvider, DbSettings};
