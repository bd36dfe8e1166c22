//! Execution-path result models.
//!
//! Typed outcomes for the read and write paths. The protocol adapter renders
//! these into the text channel; internal callers get a structurally
//! checkable result instead of a string to pattern-match.

use crate::tools::classifier::StatementClass;
use serde_json::Value as JsonValue;

/// Maximum number of data rows rendered for a SELECT result. Rows beyond the
/// limit are summarized as an omitted-remainder count.
pub const DISPLAY_ROW_LIMIT: usize = 100;

/// Default row count for the sample-data helper.
pub const DEFAULT_SAMPLE_LIMIT: i64 = 5;

/// Upper bound for the caller-supplied sample-data limit.
pub const MAX_SAMPLE_LIMIT: i64 = 100;

/// Result of a successful read-path execution.
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    /// Column names in result order. Empty when no rows were returned.
    pub columns: Vec<String>,
    /// All fetched rows, decoded to JSON values.
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
}

impl SelectOutcome {
    /// Total number of rows fetched.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of a write-path invocation.
///
/// `ConfirmationRequired` is a normal outcome, not an error: phase one of the
/// confirmation handshake echoes the classification and statement back to the
/// caller without touching the database.
#[derive(Debug, Clone)]
pub enum WriteOutcome {
    /// Phase 1: the caller must re-submit with `confirmed = true`.
    ConfirmationRequired {
        class: StatementClass,
        statement: String,
    },
    /// Phase 2: the statement ran and committed.
    Executed { rows_affected: u64 },
}
