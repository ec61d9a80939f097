use std::marker::PhantomData;
use std::path::PathBuf;

use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};
use serde_json::{Map, Number, Value};

use crate::domain::entities::criteria::Criteria;
use crate::domain::entities::row::GridRow;
use crate::infra::sqlite::queries::{count_rows, find_rows};
use crate::infra::sqlite::schema::{ensure_queryable, open_connection};
use crate::usecase::ports::repo::{GridRepository, RepoError};

/// A record type stored in one SQLite table.
pub trait Model: GridRow + Sized {
    /// Default table; `SqliteGridRepo::with_table` overrides it.
    const TABLE: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub struct SqliteGridRepo<M> {
    pub db_path: PathBuf,
    pub table: String,
    model: PhantomData<fn() -> M>,
}

impl<M: Model> SqliteGridRepo<M> {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_table(db_path, M::TABLE)
    }

    pub fn with_table(db_path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            table: table.into(),
            model: PhantomData,
        }
    }
}

impl<M: Model> GridRepository<M> for SqliteGridRepo<M> {
    fn validate(&self) -> Result<(), RepoError> {
        open_connection(&self.db_path)
            .and_then(|conn| ensure_queryable(&conn, &self.table))
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn count(&self, criteria: &Criteria) -> Result<i64, RepoError> {
        count_rows(&self.db_path, &self.table, criteria)
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn find_all(&self, criteria: &Criteria) -> Result<Vec<M>, RepoError> {
        find_rows(&self.db_path, &self.table, criteria, M::from_row)
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }
}

/// Any table row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub values: Map<String, Value>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }
}

impl GridRow for Record {
    fn display_columns(&self, _view: Option<&str>) -> Option<Map<String, Value>> {
        Some(self.values.clone())
    }

    fn resolve_field(&self, field: &str) -> Option<String> {
        match self.values.get(field)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl Model for Record {
    /// No default; use [`SqliteGridRepo::with_table`].
    const TABLE: &'static str = "";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let stmt: &Statement<'_> = row.as_ref();
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut values = Map::new();
        for (idx, name) in names.into_iter().enumerate() {
            values.insert(name, to_json(row.get_ref(idx)?));
        }
        Ok(Record { values })
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Number(v.into()),
        ValueRef::Real(v) => Number::from_f64(v).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
