use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params_from_iter, types::Value, Row, Transaction};
use tracing::debug;

use crate::domain::entities::criteria::Criteria;
use crate::infra::sqlite::schema::{create_text_table, open_connection};
use crate::infra::sqlite::sql::{count_sql, quote_ident, select_sql};

pub fn count_rows(db_path: &Path, table: &str, criteria: &Criteria) -> Result<i64> {
    let conn = open_connection(db_path)?;
    let (sql, params) = count_sql(table, criteria);
    debug!(%sql, params = params.len(), "count");

    conn.query_row(&sql, params_from_iter(params), |row| row.get(0))
        .with_context(|| format!("failed to count rows in {table}"))
}

pub fn find_rows<T, F>(db_path: &Path, table: &str, criteria: &Criteria, map_row: F) -> Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let conn = open_connection(db_path)?;
    let (sql, params) = select_sql(table, criteria);
    debug!(%sql, params = params.len(), "find");

    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare query on {table}"))?;
    let rows = stmt
        .query_map(params_from_iter(params), map_row)
        .with_context(|| format!("failed to query {table}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read rows from {table}"))?;

    Ok(rows)
}

pub fn insert_rows(
    tx: &Transaction<'_>,
    table: &str,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<i64> {
    let column_list = columns
        .iter()
        .map(|name| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = std::iter::repeat("?")
        .take(columns.len())
        .collect::<Vec<_>>()
        .join(", ");

    let mut insert = tx
        .prepare(&format!(
            "INSERT INTO {} ({column_list}) VALUES ({placeholders})",
            quote_ident(table)
        ))
        .context("failed to prepare row insert")?;

    let mut row_count = 0_i64;
    for row in rows {
        let values = (0..columns.len())
            .map(|col_idx| Value::Text(row.get(col_idx).cloned().unwrap_or_default()));
        insert
            .execute(params_from_iter(values))
            .context("failed to insert row")?;
        row_count += 1;
    }

    Ok(row_count)
}

/// Creates a TEXT-column table and fills it in one transaction.
pub fn create_table_from_rows(
    db_path: &Path,
    table: &str,
    columns: &[String],
    rows: &[Vec<String>],
) -> Result<i64> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start table create transaction")?;

    create_text_table(&tx, table, columns)?;
    let row_count = insert_rows(&tx, table, columns, rows)?;

    tx.commit().context("failed to commit table create")?;
    Ok(row_count)
}
