//! Statement execution on per-call connections.
//!
//! Both execution paths open a fresh connection from the provider, run
//! exactly one caller-supplied statement, and close the connection before
//! returning. The connection is in autocommit mode: a successful write
//! commits as part of the statement, a failed one is rolled back by the
//! connection's failure path. Statements run unprepared (some DDL cannot be
//! prepared), which also keeps the paths free of parameter plumbing they do
//! not need.
//!
//! No retries, no cancellation: once a statement is submitted it runs to
//! completion or failure, and any failure is surfaced immediately.

use crate::db::provider::ConnectionProvider;
use crate::error::{DbResult, ServerError};
use sqlx::postgres::PgRow;
use sqlx::{Connection, Executor};
use std::sync::Arc;
use tracing::debug;

/// Executor for caller-supplied statements.
pub struct StatementExecutor {
    provider: Arc<ConnectionProvider>,
}

impl StatementExecutor {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    /// Run a read-only statement and fetch all rows.
    pub async fn fetch_all(&self, sql: &str) -> DbResult<Vec<PgRow>> {
        let mut conn = self.provider.raw_connection().await?;

        debug!(sql = %sql, "Executing read statement");
        let result = conn.fetch_all(sql).await;

        match result {
            Ok(rows) => {
                let _ = conn.close().await;
                Ok(rows)
            }
            Err(e) => Err(ServerError::from(e).with_statement(sql)),
        }
    }

    /// Run a mutating statement and return the number of affected rows.
    pub async fn execute(&self, sql: &str) -> DbResult<u64> {
        let mut conn = self.provider.raw_connection().await?;

        debug!(sql = %sql, "Executing write statement");
        let result = conn.execute(sql).await;

        match result {
            Ok(done) => {
                let _ = conn.close().await;
                Ok(done.rows_affected())
            }
            Err(e) => Err(ServerError::from(e).with_statement(sql)),
        }
    }
}
