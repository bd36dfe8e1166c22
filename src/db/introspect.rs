//! Schema introspection.
//!
//! Catalog queries run on the pooled handle. SQL templates live in the
//! `queries` submodule; results are mapped into the descriptor models.

use crate::error::{DbResult, ServerError};
use crate::models::{ColumnDefinition, ForeignKey, TableSchema};
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::debug;

/// Schemas never reported to callers.
const SYSTEM_SCHEMAS: &[&str] = &["pg_catalog", "information_schema", "pg_toast"];

mod queries {
    pub const LIST_SCHEMAS: &str = r#"
        SELECT schema_name
        FROM information_schema.schemata
        ORDER BY schema_name
        "#;

    pub const SCHEMA_EXISTS: &str = r#"
        SELECT 1
        FROM information_schema.schemata
        WHERE schema_name = $1
        "#;

    pub const LIST_TABLES: &str = r#"
        SELECT table_name
        FROM information_schema.tables
        WHERE table_schema = $1
        AND table_type = 'BASE TABLE'
        ORDER BY table_name
        "#;

    pub const DESCRIBE_COLUMNS: &str = r#"
        SELECT
            column_name,
            data_type,
            is_nullable,
            column_default
        FROM information_schema.columns
        WHERE table_name = $1 AND table_schema = $2
        ORDER BY ordinal_position
        "#;

    pub const DESCRIBE_PRIMARY_KEY: &str = r#"
        SELECT kcu.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_name = kcu.constraint_name
            AND tc.table_schema = kcu.table_schema
        WHERE tc.table_name = $1
        AND tc.table_schema = $2
        AND tc.constraint_type = 'PRIMARY KEY'
        ORDER BY kcu.ordinal_position
        "#;

    pub const DESCRIBE_FOREIGN_KEYS: &str = r#"
        SELECT
            tc.constraint_name,
            kcu.column_name,
            ccu.table_schema AS foreign_table_schema,
            ccu.table_name AS foreign_table_name,
            ccu.column_name AS foreign_column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_name = kcu.constraint_name
            AND tc.table_schema = kcu.table_schema
        JOIN information_schema.constraint_column_usage ccu
            ON ccu.constraint_name = tc.constraint_name
            AND ccu.table_schema = tc.table_schema
        WHERE tc.table_name = $1
        AND tc.table_schema = $2
        AND tc.constraint_type = 'FOREIGN KEY'
        ORDER BY tc.constraint_name, kcu.ordinal_position
        "#;
}

/// Schema inspector for catalog introspection.
pub struct SchemaInspector;

impl SchemaInspector {
    /// List user schemas, excluding the fixed system set.
    pub async fn list_schemas(pool: &PgPool) -> DbResult<Vec<String>> {
        let rows = sqlx::query(queries::LIST_SCHEMAS).fetch_all(pool).await?;

        let schemas: Vec<String> = rows
            .iter()
            .map(|row| row.try_get::<String, _>("schema_name"))
            .collect::<Result<_, _>>()?;

        Ok(schemas
            .into_iter()
            .filter(|s| !SYSTEM_SCHEMAS.contains(&s.as_str()))
            .collect())
    }

    /// List base tables within a schema.
    ///
    /// An existing-but-empty schema yields an empty list; a schema absent
    /// from the catalog is an error, so the two cases stay distinguishable
    /// at the tool boundary.
    pub async fn list_tables(pool: &PgPool, schema: &str) -> DbResult<Vec<String>> {
        let exists = sqlx::query(queries::SCHEMA_EXISTS)
            .bind(schema)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(ServerError::driver(
                format!("schema \"{}\" does not exist", schema),
                Some("3F000".to_string()),
            ));
        }

        let rows = sqlx::query(queries::LIST_TABLES)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("table_name")
                    .map_err(ServerError::from)
            })
            .collect()
    }

    /// Describe a table: columns, primary key, foreign keys.
    ///
    /// A table for which the catalog reports zero columns is treated as not
    /// found.
    pub async fn describe_table(
        pool: &PgPool,
        table: &str,
        schema: &str,
    ) -> DbResult<TableSchema> {
        let columns = Self::fetch_columns(pool, table, schema).await?;
        if columns.is_empty() {
            return Err(ServerError::table_not_found(schema, table));
        }

        let primary_key = Self::fetch_primary_key(pool, table, schema).await?;
        let foreign_keys = Self::fetch_foreign_keys(pool, table, schema).await?;

        debug!(
            schema = %schema,
            table = %table,
            columns = columns.len(),
            foreign_keys = foreign_keys.len(),
            "Described table"
        );

        Ok(TableSchema {
            schema: schema.to_string(),
            table: table.to_string(),
            columns,
            primary_key,
            foreign_keys,
        })
    }

    async fn fetch_columns(
        pool: &PgPool,
        table: &str,
        schema: &str,
    ) -> DbResult<Vec<ColumnDefinition>> {
        let rows = sqlx::query(queries::DESCRIBE_COLUMNS)
            .bind(table)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(ColumnDefinition {
                    name: row.try_get("column_name")?,
                    data_type: row.try_get("data_type")?,
                    nullable: row.try_get::<String, _>("is_nullable")? == "YES",
                    default: row.try_get("column_default")?,
                })
            })
            .collect()
    }

    async fn fetch_primary_key(pool: &PgPool, table: &str, schema: &str) -> DbResult<Vec<String>> {
        let rows = sqlx::query(queries::DESCRIBE_PRIMARY_KEY)
            .bind(table)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("column_name")
                    .map_err(ServerError::from)
            })
            .collect()
    }

    async fn fetch_foreign_keys(
        pool: &PgPool,
        table: &str,
        schema: &str,
    ) -> DbResult<Vec<ForeignKey>> {
        let rows = sqlx::query(queries::DESCRIBE_FOREIGN_KEYS)
            .bind(table)
            .bind(schema)
            .fetch_all(pool)
            .await?;

        // One row per (constraint, column); fold multi-column keys together,
        // preserving both constraint order and column order within a key.
        let mut keys: Vec<(String, ForeignKey)> = Vec::new();
        for row in &rows {
            let constraint: String = row.try_get("constraint_name")?;
            let column: String = row.try_get("column_name")?;
            let referred_schema: String = row.try_get("foreign_table_schema")?;
            let referred_table: String = row.try_get("foreign_table_name")?;
            let referred_column: String = row.try_get("foreign_column_name")?;

            match keys.iter_mut().find(|(name, _)| *name == constraint) {
                Some((_, fk)) => {
                    fk.columns.push(column);
                    fk.referred_columns.push(referred_column);
                }
                None => keys.push((
                    constraint,
                    ForeignKey {
                        columns: vec![column],
                        referred_schema,
                        referred_table,
                        referred_columns: vec![referred_column],
                    },
                )),
            }
        }

        Ok(keys.into_iter().map(|(_, fk)| fk).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_schema_set_is_fixed() {
        assert!(SYSTEM_SCHEMAS.contains(&"pg_catalog"));
        assert!(SYSTEM_SCHEMAS.contains(&"information_schema"));
        assert!(SYSTEM_SCHEMAS.contains(&"pg_toast"));
        assert_eq!(SYSTEM_SCHEMAS.len(), 3);
    }
}
