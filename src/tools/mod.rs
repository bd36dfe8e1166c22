//! Tool handlers and the protocol adapter.
//!
//! - `classifier`: statement classification driving execution-path routing
//! - `schema`: list_schemas / list_tables / describe_table handlers
//! - `query`: execute_select_query handler + get_sample_data helper
//! - `write`: execute_write_query handler (confirmation state machine)
//! - `format`: flattening of typed results to the text channel

pub mod classifier;
pub mod format;
pub mod query;
pub mod schema;
pub mod write;

pub use classifier::{KeywordClassifier, StatementClass, StatementClassifier};
pub use query::QueryToolHandler;
pub use schema::SchemaToolHandler;
pub use write::WriteToolHandler;
