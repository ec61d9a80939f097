use crate::domain::entities::grid::SortDirection;

/// Scalar bound into a predicate. Kept separate from any driver type so the
/// criteria can be built without touching the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<&str> for CriteriaValue {
    fn from(value: &str) -> Self {
        CriteriaValue::Text(value.to_string())
    }
}

impl From<String> for CriteriaValue {
    fn from(value: String) -> Self {
        CriteriaValue::Text(value)
    }
}

impl From<i64> for CriteriaValue {
    fn from(value: i64) -> Self {
        CriteriaValue::Integer(value)
    }
}

impl From<f64> for CriteriaValue {
    fn from(value: f64) -> Self {
        CriteriaValue::Real(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Trusted fragment supplied by the caller, with `?` placeholders.
    Raw {
        sql: String,
        params: Vec<CriteriaValue>,
    },
    Eq {
        column: String,
        value: CriteriaValue,
    },
    /// Substring match; the term is bound as a parameter, never inlined.
    Contains {
        column: String,
        term: String,
    },
    /// OR group. Empty groups match nothing.
    Any(Vec<Condition>),
    /// AND group. Empty groups match everything.
    All(Vec<Condition>),
}

impl Condition {
    pub fn raw(sql: impl Into<String>, params: Vec<CriteriaValue>) -> Self {
        Condition::Raw {
            sql: sql.into(),
            params,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<CriteriaValue>) -> Self {
        Condition::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn contains(column: impl Into<String>, term: impl Into<String>) -> Self {
        Condition::Contains {
            column: column.into(),
            term: term.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

/// Related table joined into both the counts and the fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: String,
    /// Column on the joined table.
    pub foreign: String,
    /// Column on the primary table (`t`).
    pub local: String,
}

impl Join {
    pub fn left(
        table: impl Into<String>,
        alias: impl Into<String>,
        foreign: impl Into<String>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            kind: JoinKind::Left,
            table: table.into(),
            alias: alias.into(),
            foreign: foreign.into(),
            local: local.into(),
        }
    }

    pub fn inner(
        table: impl Into<String>,
        alias: impl Into<String>,
        foreign: impl Into<String>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            kind: JoinKind::Inner,
            ..Self::left(table, alias, foreign, local)
        }
    }
}

/// Accumulated query shape: filter, joins, order and window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub condition: Option<Condition>,
    pub joins: Vec<Join>,
    pub order: Option<OrderBy>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.add_condition(condition);
        self
    }

    /// AND-merges `condition` into whatever filter is already present.
    pub fn add_condition(&mut self, condition: Condition) {
        self.condition = Some(match self.condition.take() {
            None => condition,
            Some(Condition::All(mut parts)) => {
                parts.push(condition);
                Condition::All(parts)
            }
            Some(existing) => Condition::All(vec![existing, condition]),
        });
    }

    pub fn set_order(&mut self, column: impl Into<String>, direction: SortDirection) {
        self.order = Some(OrderBy {
            column: column.into(),
            direction,
        });
    }

    /// Converts a page size and index into LIMIT/OFFSET.
    pub fn apply_page(&mut self, page_size: i64, page: i64) {
        let page_size = page_size.max(0);
        self.limit = Some(page_size);
        self.offset = Some(page.max(0).saturating_mul(page_size));
    }

    /// Same filter and joins, without order or window. Used for counting.
    pub fn for_count(&self) -> Criteria {
        Criteria {
            condition: self.condition.clone(),
            joins: self.joins.clone(),
            order: None,
            limit: None,
            offset: None,
        }
    }
}
