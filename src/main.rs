use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use grid_adapter::infra::import::csv::import_csv_to_table;
use grid_adapter::{
    GridConfig, GridQuery, GridRepository, GridRequest, Record, SearchField, SqliteGridRepo,
};

/// Answer a grid (DataTables) query string against a SQLite table.
#[derive(Debug, Parser)]
#[command(name = "grid-adapter", version)]
struct Cli {
    /// SQLite database file. Defaults to the per-user data directory.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Table to query.
    #[arg(long)]
    table: String,

    /// Columns the global search looks into, comma separated.
    #[arg(long, value_delimiter = ',')]
    search: Vec<String>,

    /// JSON file with grid options (row_policy, sortable_columns, view).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load this CSV into `--table` before querying.
    #[arg(long)]
    import: Option<PathBuf>,

    /// Print the full HTTP response instead of the JSON body.
    #[arg(long)]
    http: bool,

    /// Raw query string, e.g. `draw=1&start=0&length=10`.
    query: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = match cli.db.clone() {
        Some(path) => path,
        None => default_db_path()?,
    };

    if let Some(csv_path) = &cli.import {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
        }
        let imported = import_csv_to_table(&db_path, csv_path, Some(&cli.table))?;
        tracing::info!(table = %imported.table, rows = imported.row_count, "csv imported");
    }

    let config = load_config(cli.config.as_deref())?;
    let repo: Arc<dyn GridRepository<Record>> =
        Arc::new(SqliteGridRepo::<Record>::with_table(&db_path, &cli.table));
    let request = GridRequest::from_query(&cli.query);

    let mut grid = GridQuery::with_config(repo, request, None, config)?;
    let fields: Vec<SearchField> = cli.search.iter().map(SearchField::column).collect();
    grid.set_search_fields(&fields);

    if cli.http {
        let response = grid.into_http()?;
        println!("{:?} {}", response.version(), response.status());
        for (name, value) in response.headers() {
            println!("{}: {}", name, value.to_str().unwrap_or_default());
        }
        println!();
        println!("{}", String::from_utf8_lossy(response.body()));
    } else {
        let response = grid.into_response()?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<GridConfig> {
    let Some(path) = path else {
        return Ok(GridConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config: {}", path.display()))
}

fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "hellhbbd", "grid-adapter")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("grid.sqlite"))
}
