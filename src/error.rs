//! Error types for the SQL Agent MCP Server.
//!
//! All internal APIs return `DbResult<T>` with a typed error; only the
//! outermost protocol adapter (see `tools::format`) flattens results to the
//! text channel the agent sees. `ConfirmationRequired` is deliberately not an
//! error variant - it is a normal write-path outcome (`models::WriteOutcome`).

use crate::tools::classifier::StatementClass;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Missing or empty connection settings. Fatal at handle creation;
    /// creation is retried on the next access rather than cached.
    #[error("{message}")]
    Configuration { message: String },

    /// A non-SELECT statement was sent to the read path.
    #[error(
        "This tool only executes SELECT queries. Query type detected: {detected}. Use execute_write_query for modifications."
    )]
    NotReadOnly { detected: StatementClass },

    /// A SELECT statement was sent to the write path.
    #[error("SELECT queries should use execute_select_query tool instead.")]
    NotMutating,

    /// The classifier could not categorize the statement.
    #[error("Unable to classify query type. Please check your SQL syntax.")]
    Unclassifiable,

    /// The catalog reports no columns for the table.
    #[error("Table '{schema}.{table}' not found.")]
    TableNotFound { schema: String, table: String },

    /// Any failure from the underlying database call, surfaced verbatim.
    /// Carries the offending statement when one was submitted.
    #[error("{message}")]
    Driver {
        message: String,
        /// e.g., "42P01" for undefined table
        sql_state: Option<String>,
        statement: Option<String>,
    },
}

impl ServerError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a driver error without an attached statement.
    pub fn driver(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Driver {
            message: message.into(),
            sql_state,
            statement: None,
        }
    }

    /// Create a table-not-found error.
    pub fn table_not_found(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self::TableNotFound {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Attach the offending statement to a driver error for caller diagnosis.
    /// Other variants pass through unchanged.
    pub fn with_statement(self, sql: &str) -> Self {
        match self {
            Self::Driver {
                message, sql_state, ..
            } => Self::Driver {
                message,
                sql_state,
                statement: Some(sql.to_string()),
            },
            other => other,
        }
    }

    /// The statement attached to this error, if any.
    pub fn statement(&self) -> Option<&str> {
        match self {
            Self::Driver { statement, .. } => statement.as_deref(),
            _ => None,
        }
    }
}

/// Convert sqlx errors to ServerError, preserving the SQLSTATE code.
impl From<sqlx::Error> for ServerError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ServerError::configuration(format!(
                "Invalid connection configuration: {}",
                msg
            )),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ServerError::driver(db_err.message().to_string(), code)
            }
            sqlx::Error::PoolTimedOut => {
                ServerError::driver("Timed out acquiring a connection from the pool", None)
            }
            sqlx::Error::PoolClosed => ServerError::driver("Connection pool is closed", None),
            sqlx::Error::Io(io_err) => ServerError::driver(format!("I/O error: {}", io_err), None),
            sqlx::Error::Tls(tls_err) => {
                ServerError::driver(format!("TLS error: {}", tls_err), None)
            }
            sqlx::Error::Protocol(msg) => {
                ServerError::driver(format!("Protocol error: {}", msg), None)
            }
            other => ServerError::driver(other.to_string(), None),
        }
    }
}

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, ServerError>;

/// Convert ServerError to MCP ErrorData.
///
/// Tool handlers never use this path - every tool failure is flattened to a
/// text result. It exists for transport-level failures only.
impl From<ServerError> for rmcp::ErrorData {
    fn from(err: ServerError) -> Self {
        match &err {
            ServerError::Configuration { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
            ServerError::NotReadOnly { .. }
            | ServerError::NotMutating
            | ServerError::Unclassifiable
            | ServerError::TableNotFound { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            ServerError::Driver { sql_state, .. } => {
                let data = sql_state
                    .as_ref()
                    .map(|code| serde_json::json!({ "sql_state": code }));
                rmcp::ErrorData::internal_error(err.to_string(), data)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = ServerError::configuration("Missing required database environment variables");
        assert!(err.to_string().contains("Missing required"));
    }

    #[test]
    fn test_not_read_only_names_detected_class() {
        let err = ServerError::NotReadOnly {
            detected: StatementClass::Dml,
        };
        let msg = err.to_string();
        assert!(msg.contains("Query type detected: DML"));
        assert!(msg.contains("execute_write_query"));
    }

    #[test]
    fn test_with_statement_attaches_sql() {
        let err = ServerError::driver("syntax error", Some("42601".to_string()))
            .with_statement("SELEC 1");
        assert_eq!(err.statement(), Some("SELEC 1"));
    }

    #[test]
    fn test_with_statement_ignores_non_driver() {
        let err = ServerError::NotMutating.with_statement("SELECT 1");
        assert!(err.statement().is_none());
        assert!(matches!(err, ServerError::NotMutating));
    }

    #[test]
    fn test_table_not_found_display() {
        let err = ServerError::table_not_found("public", "missing");
        assert_eq!(err.to_string(), "Table 'public.missing' not found.");
    }

    #[test]
    fn test_driver_maps_to_internal_error_with_sql_state() {
        let err = ServerError::driver("undefined table", Some("42P01".to_string()));
        let mcp_err: rmcp::ErrorData = err.into();
        assert_eq!(mcp_err.code.0, -32603);
        assert_eq!(mcp_err.data.unwrap()["sql_state"], "42P01");
    }

    #[test]
    fn test_classification_errors_map_to_invalid_params() {
        let mcp_err: rmcp::ErrorData = ServerError::Unclassifiable.into();
        assert_eq!(mcp_err.code.0, -32602);
    }
}
