//! SQL text for PostgreSQL chunk inserts
//!
//! A chunk is sent as a single JSON array parameter and expanded server-side
//! with `json_populate_recordset`, so the number of bind parameters stays at
//! one no matter how many rows or columns a chunk carries. Keys that are not
//! columns of the target table are ignored by PostgreSQL.

use crate::domain::TableSchema;

/// Quote an identifier, doubling embedded quotes
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified table name part by part
pub fn quote_table(name: &str) -> String {
    name.split('.').map(quote_ident).collect::<Vec<_>>().join(".")
}

fn column_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the insert statement for one table
///
/// With primary-key columns the statement skips conflicting rows
/// (`ON CONFLICT (...) DO NOTHING`); without them it is a plain insert.
pub fn render_insert(table: &TableSchema) -> String {
    let target = quote_table(&table.name);

    let mut sql = if table.columns.is_empty() {
        format!(
            "INSERT INTO {target} SELECT * FROM json_populate_recordset(NULL::{target}, $1::json)"
        )
    } else {
        let columns = column_list(&table.columns);
        format!(
            "INSERT INTO {target} ({columns}) SELECT {columns} FROM json_populate_recordset(NULL::{target}, $1::json)"
        )
    };

    if table.has_primary_key() {
        sql.push_str(&format!(
            " ON CONFLICT ({}) DO NOTHING",
            column_list(&table.primary_key)
        ));
    }

    sql
}
