//! Protocol adapter rendering.
//!
//! Every tool answers with a single self-describing text block: a direct
//! answer, a block starting with `Error`, or the `CONFIRMATION_REQUIRED`
//! marker. Nothing structured crosses the tool boundary, so an LLM caller can
//! branch on content alone. This module is the only place where the typed
//! results and errors of the inner layers are flattened to text.

use crate::error::{DbResult, ServerError};
use crate::models::{DISPLAY_ROW_LIMIT, SelectOutcome, TableSchema, WriteOutcome};
use serde_json::Value as JsonValue;
use unicode_width::UnicodeWidthStr;

/// Render the outcome of a list_schemas call.
pub fn schema_listing(result: DbResult<Vec<String>>) -> String {
    match result {
        Ok(schemas) if schemas.is_empty() => {
            "No user schemas found in the database.".to_string()
        }
        Ok(schemas) => {
            let mut out = String::from("Available schemas:\n");
            out.push_str(&bullet_list(&schemas));
            out
        }
        Err(e) => format!("Error listing schemas: {}", e),
    }
}

/// Render the outcome of a list_tables call.
pub fn table_listing(schema: &str, result: DbResult<Vec<String>>) -> String {
    match result {
        Ok(tables) if tables.is_empty() => {
            format!("No tables found in schema '{}'.", schema)
        }
        Ok(tables) => {
            let mut out = format!("Tables in schema '{}':\n", schema);
            out.push_str(&bullet_list(&tables));
            out
        }
        Err(e) => format!("Error listing tables: {}", e),
    }
}

/// Render the outcome of a describe_table call.
pub fn table_description(result: DbResult<TableSchema>) -> String {
    match result {
        Ok(desc) => render_table_schema(&desc),
        Err(e @ ServerError::TableNotFound { .. }) => e.to_string(),
        Err(e) => format!("Error describing table: {}", e),
    }
}

/// Render the outcome of the read path.
pub fn select_result(sql: &str, result: DbResult<SelectOutcome>) -> String {
    match result {
        Ok(outcome) => render_select(&outcome),
        Err(e @ ServerError::NotReadOnly { .. }) => format!("Error: {}", e),
        Err(e) => execution_error(&e, sql),
    }
}

/// Render the outcome of the write path.
pub fn write_result(sql: &str, result: DbResult<WriteOutcome>) -> String {
    match result {
        Ok(WriteOutcome::ConfirmationRequired { class, statement }) => format!(
            "CONFIRMATION_REQUIRED\n\
             Query Type: {class}\n\
             SQL Query:\n\
             {statement}\n\
             \n\
             This query will modify the database. It requires user confirmation before execution.\n\
             Please ask the user: \"Do you want to proceed with this {class} operation? (yes/no)\"\n"
        ),
        Ok(WriteOutcome::Executed { rows_affected }) => format!(
            "Query executed successfully. {} row(s) affected.",
            rows_affected
        ),
        Err(e @ (ServerError::NotMutating | ServerError::Unclassifiable)) => {
            format!("Error: {}", e)
        }
        Err(e) => execution_error(&e, sql),
    }
}

/// Render the outcome of the sample-data helper.
///
/// Delegated read-path results render like any other SELECT; failures that
/// happen before delegation (unknown table, catalog errors) get their own
/// prefix.
pub fn sample_data_result(result: DbResult<SelectOutcome>) -> String {
    match result {
        Ok(outcome) => render_select(&outcome),
        Err(e @ ServerError::Driver {
            statement: Some(_), ..
        }) => {
            let sql = e.statement().unwrap_or_default().to_string();
            execution_error(&e, &sql)
        }
        Err(e) => format!("Error getting sample data: {}", e),
    }
}

fn execution_error(err: &ServerError, sql: &str) -> String {
    let statement = err.statement().unwrap_or(sql);
    format!(
        "Error executing query: {}\n\nQuery attempted:\n{}",
        err, statement
    )
}

fn bullet_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("  - {}", name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a table description block: columns, primary key, foreign keys.
fn render_table_schema(desc: &TableSchema) -> String {
    let mut out = format!("Table: {}.{}\n\nColumns:\n", desc.schema, desc.table);

    for col in &desc.columns {
        let nullable = if col.nullable { "NULL" } else { "NOT NULL" };
        out.push_str(&format!("  - {}: {} {}", col.name, col.data_type, nullable));
        if let Some(default) = &col.default {
            out.push_str(&format!(" DEFAULT {}", default));
        }
        out.push('\n');
    }

    if !desc.primary_key.is_empty() {
        out.push_str(&format!("\nPrimary Key: {}\n", desc.primary_key.join(", ")));
    }

    if !desc.foreign_keys.is_empty() {
        out.push_str("\nForeign Keys:\n");
        for fk in &desc.foreign_keys {
            out.push_str(&format!(
                "  - {} -> {}.{}({})\n",
                fk.columns.join(", "),
                fk.referred_schema,
                fk.referred_table,
                fk.referred_columns.join(", ")
            ));
        }
    }

    out
}

/// Render a SELECT result as a pipe-delimited table, capped at
/// `DISPLAY_ROW_LIMIT` data rows with an omitted-remainder note.
fn render_select(outcome: &SelectOutcome) -> String {
    if outcome.is_empty() {
        return "Query executed successfully. No results returned (empty result set).".to_string();
    }

    let total = outcome.total_rows();
    let mut out = format!("Query returned {} row(s):\n\n", total);

    let header = outcome.columns.join(" | ");
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.width()));
    out.push('\n');

    for row in outcome.rows.iter().take(DISPLAY_ROW_LIMIT) {
        let line = outcome
            .columns
            .iter()
            .map(|col| format_value(row.get(col).unwrap_or(&JsonValue::Null)))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&line);
        out.push('\n');
    }

    if total > DISPLAY_ROW_LIMIT {
        out.push_str(&format!(
            "\n... and {} more row(s)",
            total - DISPLAY_ROW_LIMIT
        ));
    }

    out
}

/// Format a decoded value for display.
fn format_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => serde_json::to_string(arr).unwrap_or_default(),
        JsonValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDefinition, ForeignKey};
    use crate::tools::classifier::StatementClass;

    fn row(pairs: &[(&str, JsonValue)]) -> serde_json::Map<String, JsonValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn outcome_with_rows(n: usize) -> SelectOutcome {
        SelectOutcome {
            columns: vec!["id".to_string()],
            rows: (0..n)
                .map(|i| row(&[("id", JsonValue::Number(i.into()))]))
                .collect(),
        }
    }

    #[test]
    fn test_schema_listing_bullets() {
        let text = schema_listing(Ok(vec!["public".to_string(), "sales".to_string()]));
        assert_eq!(text, "Available schemas:\n  - public\n  - sales");
    }

    #[test]
    fn test_schema_listing_empty() {
        let text = schema_listing(Ok(Vec::new()));
        assert_eq!(text, "No user schemas found in the database.");
    }

    #[test]
    fn test_schema_listing_error_prefix() {
        let text = schema_listing(Err(ServerError::driver("connection refused", None)));
        assert!(text.starts_with("Error listing schemas:"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_table_listing_empty_is_explicit() {
        let text = table_listing("empty_schema", Ok(Vec::new()));
        assert_eq!(text, "No tables found in schema 'empty_schema'.");
    }

    #[test]
    fn test_table_description_single_foreign_key_line() {
        let desc = TableSchema {
            schema: "public".to_string(),
            table: "orders".to_string(),
            columns: vec![ColumnDefinition {
                name: "customer_id".to_string(),
                data_type: "integer".to_string(),
                nullable: false,
                default: None,
            }],
            primary_key: vec![],
            foreign_keys: vec![ForeignKey {
                columns: vec!["customer_id".to_string()],
                referred_schema: "crm".to_string(),
                referred_table: "customers".to_string(),
                referred_columns: vec!["id".to_string()],
            }],
        };
        let text = table_description(Ok(desc));
        let fk_lines: Vec<&str> = text
            .lines()
            .filter(|l| l.contains("->"))
            .collect();
        assert_eq!(fk_lines, vec!["  - customer_id -> crm.customers(id)"]);
    }

    #[test]
    fn test_table_description_column_line() {
        let desc = TableSchema {
            schema: "public".to_string(),
            table: "t".to_string(),
            columns: vec![ColumnDefinition {
                name: "created_at".to_string(),
                data_type: "timestamp with time zone".to_string(),
                nullable: true,
                default: Some("now()".to_string()),
            }],
            primary_key: vec![],
            foreign_keys: vec![],
        };
        let text = table_description(Ok(desc));
        assert!(text.contains("Table: public.t"));
        assert!(
            text.contains("  - created_at: timestamp with time zone NULL DEFAULT now()")
        );
        assert!(!text.contains("Primary Key"));
        assert!(!text.contains("Foreign Keys"));
    }

    #[test]
    fn test_table_description_not_found_plain() {
        let text = table_description(Err(ServerError::table_not_found("public", "ghost")));
        assert_eq!(text, "Table 'public.ghost' not found.");
    }

    #[test]
    fn test_select_empty_result_message() {
        let text = select_result(
            "SELECT 1 WHERE false",
            Ok(SelectOutcome {
                columns: Vec::new(),
                rows: Vec::new(),
            }),
        );
        assert_eq!(
            text,
            "Query executed successfully. No results returned (empty result set)."
        );
    }

    #[test]
    fn test_select_single_row_has_header_and_separator() {
        let text = select_result(
            "SELECT 1 as test",
            Ok(SelectOutcome {
                columns: vec!["test".to_string()],
                rows: vec![row(&[("test", JsonValue::Number(1.into()))])],
            }),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Query returned 1 row(s):");
        assert_eq!(lines[2], "test");
        assert_eq!(lines[3], "----");
        assert_eq!(lines[4], "1");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_select_truncates_at_display_limit() {
        let text = select_result("SELECT id FROM t", Ok(outcome_with_rows(150)));
        let data_rows = text
            .lines()
            .skip(4)
            .filter(|l| !l.is_empty() && !l.starts_with("..."))
            .count();
        assert_eq!(data_rows, 100);
        assert!(text.ends_with("... and 50 more row(s)"));
        assert!(text.starts_with("Query returned 150 row(s):"));
    }

    #[test]
    fn test_select_at_limit_has_no_note() {
        let text = select_result("SELECT id FROM t", Ok(outcome_with_rows(100)));
        assert!(!text.contains("more row(s)"));
    }

    #[test]
    fn test_select_wrong_tool_error() {
        let text = select_result(
            "DELETE FROM t",
            Err(ServerError::NotReadOnly {
                detected: StatementClass::Dml,
            }),
        );
        assert!(text.starts_with("Error: This tool only executes SELECT queries."));
        assert!(text.contains("DML"));
    }

    #[test]
    fn test_select_driver_error_includes_statement() {
        let text = select_result(
            "SELECT * FROM nope",
            Err(ServerError::driver("relation \"nope\" does not exist", None)
                .with_statement("SELECT * FROM nope")),
        );
        assert!(text.starts_with("Error executing query:"));
        assert!(text.contains("Query attempted:\nSELECT * FROM nope"));
    }

    #[test]
    fn test_write_confirmation_block() {
        let text = write_result(
            "DELETE FROM t",
            Ok(WriteOutcome::ConfirmationRequired {
                class: StatementClass::Dml,
                statement: "DELETE FROM t".to_string(),
            }),
        );
        assert!(text.starts_with("CONFIRMATION_REQUIRED\n"));
        assert!(text.contains("Query Type: DML"));
        assert!(text.contains("SQL Query:\nDELETE FROM t"));
        assert!(text.contains("proceed with this DML operation? (yes/no)"));
    }

    #[test]
    fn test_write_executed_reports_count() {
        let text = write_result(
            "DELETE FROM t WHERE id = 1",
            Ok(WriteOutcome::Executed { rows_affected: 3 }),
        );
        assert_eq!(text, "Query executed successfully. 3 row(s) affected.");
    }

    #[test]
    fn test_write_rejects_select() {
        let text = write_result("SELECT 1", Err(ServerError::NotMutating));
        assert_eq!(
            text,
            "Error: SELECT queries should use execute_select_query tool instead."
        );
    }

    #[test]
    fn test_write_rejects_unclassifiable() {
        let text = write_result("FOO BAR", Err(ServerError::Unclassifiable));
        assert_eq!(
            text,
            "Error: Unable to classify query type. Please check your SQL syntax."
        );
    }

    #[test]
    fn test_sample_data_table_not_found() {
        let text = sample_data_result(Err(ServerError::table_not_found("public", "ghost")));
        assert_eq!(
            text,
            "Error getting sample data: Table 'public.ghost' not found."
        );
    }

    #[test]
    fn test_format_value_null() {
        assert_eq!(format_value(&JsonValue::Null), "NULL");
    }
}
