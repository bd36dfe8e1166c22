//! Result-rendering contract tests.
//!
//! The text channel is the protocol: callers branch on the rendered content,
//! so the exact shapes of listings, row tables, and truncation notes are
//! pinned here against the public format API.

use serde_json::Value as JsonValue;
use sql_agent_mcp::error::ServerError;
use sql_agent_mcp::models::{ColumnDefinition, ForeignKey, SelectOutcome, TableSchema};
use sql_agent_mcp::tools::format;

fn numbered_rows(n: usize) -> SelectOutcome {
    SelectOutcome {
        columns: vec!["id".to_string(), "name".to_string()],
        rows: (0..n)
            .map(|i| {
                let mut row = serde_json::Map::new();
                row.insert("id".to_string(), JsonValue::Number(i.into()));
                row.insert("name".to_string(), JsonValue::String(format!("row{i}")));
                row
            })
            .collect(),
    }
}

#[test]
fn test_select_renders_header_separator_and_rows() {
    let text = format::select_result("SELECT id, name FROM t", Ok(numbered_rows(2)));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Query returned 2 row(s):");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "id | name");
    assert_eq!(lines[3], "---------");
    assert_eq!(lines[4], "0 | row0");
    assert_eq!(lines[5], "1 | row1");
}

#[test]
fn test_select_150_rows_renders_100_plus_remainder_note() {
    let text = format::select_result("SELECT id, name FROM t", Ok(numbered_rows(150)));

    let data_rows = text
        .lines()
        .filter(|l| l.contains(" | ") && !l.contains("id | name"))
        .count();
    assert_eq!(data_rows, 100);
    assert!(text.ends_with("... and 50 more row(s)"));
}

#[test]
fn test_select_exactly_100_rows_has_no_remainder_note() {
    let text = format::select_result("SELECT id, name FROM t", Ok(numbered_rows(100)));
    assert!(!text.contains("more row(s)"));
}

#[test]
fn test_select_empty_result_is_explicit() {
    let text = format::select_result(
        "SELECT id FROM t WHERE false",
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
fn test_driver_error_text_carries_statement() {
    let sql = "SELECT * FROM missing_table";
    let err = ServerError::driver("relation \"missing_table\" does not exist", None)
        .with_statement(sql);
    let text = format::select_result(sql, Err(err));

    assert!(text.starts_with("Error executing query:"));
    assert!(text.contains("relation \"missing_table\" does not exist"));
    assert!(text.contains("Query attempted:\nSELECT * FROM missing_table"));
}

#[test]
fn test_schema_listing_is_deterministic() {
    let schemas = vec!["analytics".to_string(), "public".to_string()];
    let first = format::schema_listing(Ok(schemas.clone()));
    let second = format::schema_listing(Ok(schemas));
    assert_eq!(first, second);
}

#[test]
fn test_empty_table_listing_message() {
    let text = format::table_listing("warehouse", Ok(Vec::new()));
    assert_eq!(text, "No tables found in schema 'warehouse'.");
}

#[test]
fn test_describe_table_foreign_key_format() {
    let desc = TableSchema {
        schema: "public".to_string(),
        table: "orders".to_string(),
        columns: vec![
            ColumnDefinition {
                name: "id".to_string(),
                data_type: "integer".to_string(),
                nullable: false,
                default: Some("nextval('orders_id_seq'::regclass)".to_string()),
            },
            ColumnDefinition {
                name: "customer_id".to_string(),
                data_type: "integer".to_string(),
                nullable: false,
                default: None,
            },
        ],
        primary_key: vec!["id".to_string()],
        foreign_keys: vec![ForeignKey {
            columns: vec!["customer_id".to_string()],
            referred_schema: "public".to_string(),
            referred_table: "customers".to_string(),
            referred_columns: vec!["id".to_string()],
        }],
    };

    let text = format::table_description(Ok(desc));
    assert!(text.contains("Table: public.orders"));
    assert!(text.contains("  - id: integer NOT NULL DEFAULT nextval('orders_id_seq'::regclass)"));
    assert!(text.contains("Primary Key: id"));

    let fk_lines: Vec<&str> = text.lines().filter(|l| l.contains("->")).collect();
    assert_eq!(fk_lines, vec!["  - customer_id -> public.customers(id)"]);
}

#[test]
fn test_describe_composite_foreign_key_groups_columns() {
    let desc = TableSchema {
        schema: "sales".to_string(),
        table: "order_lines".to_string(),
        columns: vec![ColumnDefinition {
            name: "order_id".to_string(),
            data_type: "integer".to_string(),
            nullable: false,
            default: None,
        }],
        primary_key: vec![],
        foreign_keys: vec![ForeignKey {
            columns: vec!["order_id".to_string(), "order_version".to_string()],
            referred_schema: "sales".to_string(),
            referred_table: "orders".to_string(),
            referred_columns: vec!["id".to_string(), "version".to_string()],
        }],
    };

    let text = format::table_description(Ok(desc));
    assert!(text.contains("  - order_id, order_version -> sales.orders(id, version)"));
}
