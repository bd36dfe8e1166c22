//! Statement classification for execution-path routing.
//!
//! Every caller-supplied statement is classified before it reaches the
//! database driver; the resulting class decides whether the statement runs on
//! the read path, the write path (behind confirmation), or is rejected.
//!
//! Classification is a prefix heuristic, not a parser: the trimmed,
//! upper-cased statement is matched against fixed keyword prefixes. Leading
//! comments, multi-statement payloads, and keywords hidden inside string
//! literals are not detected. The heuristic sits behind the
//! [`StatementClassifier`] trait so it can later be replaced by an AST-based
//! classifier without touching the execution gateway.

use serde::Serialize;

/// Standard SQL statement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatementClass {
    /// Data Query Language: SELECT, WITH
    Dql,
    /// Data Manipulation Language: INSERT, UPDATE, DELETE, MERGE
    Dml,
    /// Data Definition Language: CREATE, ALTER, DROP, TRUNCATE, RENAME
    Ddl,
    /// Data Control Language: GRANT, REVOKE
    Dcl,
    /// Transaction Control Language: COMMIT, ROLLBACK, SAVEPOINT
    Tcl,
    /// Anything the heuristic cannot place
    Unknown,
}

impl StatementClass {
    /// True for every class that mutates database state when executed.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Dml | Self::Ddl | Self::Dcl | Self::Tcl)
    }
}

impl std::fmt::Display for StatementClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Dql => "DQL",
            Self::Dml => "DML",
            Self::Ddl => "DDL",
            Self::Dcl => "DCL",
            Self::Tcl => "TCL",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// Interface for statement classification.
///
/// Implementations must be pure: no side effects, no I/O, deterministic for a
/// given statement.
pub trait StatementClassifier: Send + Sync {
    fn classify(&self, sql: &str) -> StatementClass;
}

const DQL_PREFIXES: &[&str] = &["SELECT", "WITH"];
const DML_PREFIXES: &[&str] = &["INSERT", "UPDATE", "DELETE", "MERGE"];
const DDL_PREFIXES: &[&str] = &["CREATE", "ALTER", "DROP", "TRUNCATE", "RENAME"];
const DCL_PREFIXES: &[&str] = &["GRANT", "REVOKE"];
const TCL_PREFIXES: &[&str] = &["COMMIT", "ROLLBACK", "SAVEPOINT"];

/// Keyword-prefix classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl StatementClassifier for KeywordClassifier {
    fn classify(&self, sql: &str) -> StatementClass {
        let upper = sql.trim().to_uppercase();

        let starts_with_any = |prefixes: &[&str]| prefixes.iter().any(|p| upper.starts_with(p));

        if starts_with_any(DQL_PREFIXES) {
            StatementClass::Dql
        } else if starts_with_any(DML_PREFIXES) {
            StatementClass::Dml
        } else if starts_with_any(DDL_PREFIXES) {
            StatementClass::Ddl
        } else if starts_with_any(DCL_PREFIXES) {
            StatementClass::Dcl
        } else if starts_with_any(TCL_PREFIXES) {
            StatementClass::Tcl
        } else {
            StatementClass::Unknown
        }
    }
}
