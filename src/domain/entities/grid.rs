use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses the wire direction, case-insensitively. Anything other than
    /// `asc` or `desc` is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    pub value: String,
}

impl Search {
    /// The raw search term, or `None` when it is blank.
    pub fn term(&self) -> Option<&str> {
        (!self.value.trim().is_empty()).then_some(self.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub searchable: bool,
    pub orderable: bool,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            searchable: true,
            orderable: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: i64,
    pub dir: String,
}

/// One grid draw request as sent by the browser widget.
///
/// `order` is a sequence on the wire but only its first entry is honoured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridRequest {
    pub start: i64,
    pub length: i64,
    pub draw: i64,
    pub search: Search,
    pub columns: Vec<ColumnSpec>,
    pub order: Vec<OrderSpec>,
}

impl GridRequest {
    /// Rows per page. A negative `length` asks for every row on one page.
    pub fn page_size(&self, total: i64) -> i64 {
        if self.length < 0 {
            total.max(0)
        } else {
            self.length
        }
    }

    /// Zero-based page index, floored.
    pub fn current_page(&self) -> i64 {
        if self.length <= 0 || self.start <= 0 {
            0
        } else {
            self.start / self.length
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub draw: i64,
    pub records_total: i64,
    pub records_filtered: i64,
    pub data: Vec<Map<String, Value>>,
}
