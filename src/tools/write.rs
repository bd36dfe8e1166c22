//! Write path: the confirmation state machine.
//!
//! Every mutating statement goes through a two-phase handshake:
//!
//! 1. Unconfirmed call: the statement is classified and echoed back with a
//!    `CONFIRMATION_REQUIRED` marker. The database is never touched.
//! 2. Confirmed call (`confirmed = true`): the statement executes on a fresh
//!    autocommit connection and the affected-row count is returned.
//!
//! No pending-operation state is held server-side - the caller is expected
//! to re-submit the identical statement with the flag set. The server does
//! not verify that the confirmed statement matches the one it prompted for;
//! that verification would require server-side state this protocol
//! deliberately avoids.

use crate::db::StatementExecutor;
use crate::error::{DbResult, ServerError};
use crate::models::WriteOutcome;
use crate::tools::classifier::{KeywordClassifier, StatementClass, StatementClassifier};
use tracing::info;

pub struct WriteToolHandler {
    executor: StatementExecutor,
    classifier: KeywordClassifier,
}

impl WriteToolHandler {
    pub fn new(executor: StatementExecutor) -> Self {
        Self {
            executor,
            classifier: KeywordClassifier::new(),
        }
    }

    /// Run a mutating statement, or request confirmation for it.
    pub async fn execute_write(&self, sql: &str, confirmed: bool) -> DbResult<WriteOutcome> {
        let class = self.classifier.classify(sql);

        match class {
            StatementClass::Dql => Err(ServerError::NotMutating),
            StatementClass::Unknown => Err(ServerError::Unclassifiable),
            _ => {
                if !confirmed {
                    info!(class = %class, "Write statement awaiting confirmation");
                    return Ok(WriteOutcome::ConfirmationRequired {
                        class,
                        statement: sql.to_string(),
                    });
                }

                let rows_affected = self.executor.execute(sql).await?;
                info!(class = %class, rows_affected, "Write statement executed");
                Ok(WriteOutcome::Executed { rows_affected })
            }
        }
    }
}
