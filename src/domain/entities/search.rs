use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::entities::criteria::Condition;

pub type CandidateSupplier = Arc<dyn Fn() -> BTreeMap<String, String> + Send + Sync>;

/// A column the global search box looks into.
#[derive(Clone)]
pub enum SearchField {
    Column(String),
    /// The stored value is a key; the user searches the labels behind it.
    Derived {
        column: String,
        candidates: CandidateSupplier,
    },
}

impl SearchField {
    pub fn column(name: impl Into<String>) -> Self {
        SearchField::Column(name.into())
    }

    pub fn derived<F>(column: impl Into<String>, candidates: F) -> Self
    where
        F: Fn() -> BTreeMap<String, String> + Send + Sync + 'static,
    {
        SearchField::Derived {
            column: column.into(),
            candidates: Arc::new(candidates),
        }
    }

    fn conditions(&self, term: &str) -> Vec<Condition> {
        match self {
            SearchField::Column(column) => vec![Condition::contains(column.clone(), term)],
            SearchField::Derived { column, candidates } => matching_keys(&candidates(), term)
                .into_iter()
                .map(|key| Condition::contains(column.clone(), key))
                .collect(),
        }
    }
}

impl fmt::Debug for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Column(column) => f.debug_tuple("Column").field(column).finish(),
            SearchField::Derived { column, .. } => f
                .debug_struct("Derived")
                .field("column", column)
                .finish_non_exhaustive(),
        }
    }
}

/// Keys whose label contains `term`. Case-sensitive.
pub fn matching_keys(candidates: &BTreeMap<String, String>, term: &str) -> Vec<String> {
    candidates
        .iter()
        .filter(|(_, label)| label.contains(term))
        .map(|(key, _)| key.clone())
        .collect()
}

/// OR group over every field. `None` when the term is blank or no field
/// yields a predicate. The term is matched as given, untrimmed.
pub fn build_search_condition(fields: &[SearchField], term: &str) -> Option<Condition> {
    if term.trim().is_empty() {
        return None;
    }

    let parts: Vec<Condition> = fields
        .iter()
        .flat_map(|field| field.conditions(term))
        .collect();
    (!parts.is_empty()).then_some(Condition::Any(parts))
}
