//! Introspection tool handlers.
//!
//! Thin typed wrappers over the schema inspector: each handler method fetches
//! the pooled handle from the provider and returns descriptor models. Text
//! rendering happens in the protocol adapter (`tools::format`).

use crate::db::{ConnectionProvider, SchemaInspector};
use crate::error::DbResult;
use crate::models::TableSchema;
use std::sync::Arc;
use tracing::info;

pub struct SchemaToolHandler {
    provider: Arc<ConnectionProvider>,
}

impl SchemaToolHandler {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// List user schemas (system schemas excluded).
    pub async fn list_schemas(&self) -> DbResult<Vec<String>> {
        let pool = self.provider.pool().await?;
        let schemas = SchemaInspector::list_schemas(pool).await?;
        info!(count = schemas.len(), "Listed schemas");
        Ok(schemas)
    }

    /// List base tables in a schema.
    pub async fn list_tables(&self, schema: &str) -> DbResult<Vec<String>> {
        let pool = self.provider.pool().await?;
        let tables = SchemaInspector::list_tables(pool, schema).await?;
        info!(schema = %schema, count = tables.len(), "Listed tables");
        Ok(tables)
    }

    /// Describe a table's columns, primary key, and foreign keys.
    pub async fn describe_table(&self, table: &str, schema: &str) -> DbResult<TableSchema> {
        let pool = self.provider.pool().await?;
        SchemaInspector::describe_table(pool, table, schema).await
    }
}
