//! Read path and sample-data helper.
//!
//! `execute_select` classifies before executing: the invariant is that no
//! caller-supplied string reaches the driver unclassified. The sample-data
//! helper builds its SELECT from quoted identifiers, and only after checking
//! the table against the catalog's actual table list - a bare string
//! interpolation of caller input never happens.

use crate::db::{ConnectionProvider, SchemaInspector, StatementExecutor, types};
use crate::error::{DbResult, ServerError};
use crate::models::{MAX_SAMPLE_LIMIT, SelectOutcome};
use crate::tools::classifier::{KeywordClassifier, StatementClass, StatementClassifier};
use std::sync::Arc;
use tracing::info;

pub struct QueryToolHandler {
    provider: Arc<ConnectionProvider>,
    executor: StatementExecutor,
    classifier: KeywordClassifier,
}

impl QueryToolHandler {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        let executor = StatementExecutor::new(provider.clone());
        Self {
            provider,
            executor,
            classifier: KeywordClassifier::new(),
        }
    }

    /// Run a read-only statement and fetch all rows.
    pub async fn execute_select(&self, sql: &str) -> DbResult<SelectOutcome> {
        let class = self.classifier.classify(sql);
        if class != StatementClass::Dql {
            return Err(ServerError::NotReadOnly { detected: class });
        }

        let rows = self.executor.fetch_all(sql).await?;
        let columns = rows.first().map(types::column_names).unwrap_or_default();
        let rows = rows.iter().map(types::row_to_map).collect::<Vec<_>>();

        info!(rows = rows.len(), "Select executed");
        Ok(SelectOutcome { columns, rows })
    }

    /// Fetch up to `limit` rows from a table, via the read path.
    ///
    /// The limit is clamped to a fixed upper bound and the table name is
    /// checked against the catalog before any statement is built.
    pub async fn sample_data(
        &self,
        table: &str,
        schema: &str,
        limit: i64,
    ) -> DbResult<SelectOutcome> {
        let limit = limit.clamp(1, MAX_SAMPLE_LIMIT);

        let pool = self.provider.pool().await?;
        let tables = SchemaInspector::list_tables(pool, schema).await?;
        if !tables.iter().any(|t| t == table) {
            return Err(ServerError::table_not_found(schema, table));
        }

        let sql = format!(
            "SELECT * FROM {}.{} LIMIT {}",
            quote_ident(schema),
            quote_ident(table),
            limit
        );
        self.execute_select(&sql).await
    }
}

/// Quote an identifier for interpolation, doubling embedded quotes.
/// Tolerates mixed-case and reserved names.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
