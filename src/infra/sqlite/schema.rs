use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::infra::sqlite::sql::quote_ident;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

/// Fails unless `table` names a table or view that can be selected from.
pub fn ensure_queryable(conn: &Connection, table: &str) -> Result<()> {
    if table.trim().is_empty() {
        anyhow::bail!("model has no table name")
    }

    let found: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            params![table],
            |row| row.get(0),
        )
        .with_context(|| format!("failed to look up table: {table}"))?;

    if found == 0 {
        anyhow::bail!("not a queryable table: {table}")
    }

    Ok(())
}

/// Creates `table` with one TEXT column per header.
pub fn create_text_table(conn: &Connection, table: &str, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        anyhow::bail!("at least one column is required")
    }

    let column_defs = columns
        .iter()
        .map(|name| format!("{} TEXT", quote_ident(name)))
        .collect::<Vec<_>>()
        .join(", ");

    conn.execute(
        &format!("CREATE TABLE {} ({column_defs})", quote_ident(table)),
        [],
    )
    .with_context(|| format!("failed to create table: {table}"))?;

    Ok(())
}
