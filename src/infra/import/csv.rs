use std::path::Path;

use anyhow::{Context, Result};

use crate::infra::sqlite::queries::create_table_from_rows;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub table: String,
    pub row_count: i64,
}

/// Loads a CSV file into a new TEXT-column table. The table is named after
/// the file stem unless `table` is given.
pub fn import_csv_to_table(
    db_path: &Path,
    csv_path: &Path,
    table: Option<&str>,
) -> Result<ImportResult> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        anyhow::bail!("csv header is required")
    }

    let table = table
        .map(str::to_string)
        .or_else(|| {
            csv_path
                .file_stem()
                .and_then(|name| name.to_str())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "dataset".to_string());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let row_count = create_table_from_rows(db_path, &table, &headers, &rows)?;

    Ok(ImportResult { table, row_count })
}
