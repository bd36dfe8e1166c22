//! Data models for the SQL Agent MCP Server.

pub mod query;
pub mod schema;

pub use query::{
    DEFAULT_SAMPLE_LIMIT, DISPLAY_ROW_LIMIT, MAX_SAMPLE_LIMIT, SelectOutcome, WriteOutcome,
};
pub use schema::{ColumnDefinition, ForeignKey, TableSchema};
