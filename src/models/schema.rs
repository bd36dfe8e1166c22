//! Schema introspection descriptors.
//!
//! Read-only projections of catalog metadata. Nothing here is cached - every
//! introspection call re-fetches from the engine.

use serde::Serialize;

/// A single column as reported by the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnDefinition {
    pub name: String,
    /// Catalog type string (e.g., "integer", "character varying")
    pub data_type: String,
    pub nullable: bool,
    /// Default expression, verbatim from the catalog
    pub default: Option<String>,
}

/// A foreign-key edge to another schema-qualified table.
///
/// Multi-column keys keep their column order; `columns` and
/// `referred_columns` are positionally aligned.
#[derive(Debug, Clone, Serialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub referred_schema: String,
    pub referred_table: String,
    pub referred_columns: Vec<String>,
}

/// Full description of one table: columns, primary key, foreign keys.
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnDefinition>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}
