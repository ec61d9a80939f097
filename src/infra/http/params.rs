use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::domain::entities::grid::{ColumnSpec, GridRequest, OrderSpec, Search};

/// Bracket indices at or above this are ignored.
const MAX_INDEX: usize = 1024;

impl GridRequest {
    /// Parses a raw (URL-encoded) query string.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Builds a request from already-decoded key/value pairs. Unknown keys
    /// are ignored; later duplicates win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = GridRequest::default();
        let mut columns: BTreeMap<usize, ColumnSpec> = BTreeMap::new();
        let mut order: BTreeMap<usize, OrderSpec> = BTreeMap::new();

        for (key, value) in pairs {
            let value = value.as_ref();
            let (base, path) = split_key(key.as_ref());

            match (base, path.as_slice()) {
                ("start", []) => request.start = coerce_int(value),
                ("length", []) => request.length = coerce_int(value),
                ("draw", []) => request.draw = coerce_int(value),
                ("search", ["value"]) => request.search = Search { value: value.to_string() },
                ("columns", [idx, field]) => {
                    let Some(idx) = parse_index(idx) else {
                        continue;
                    };
                    let column = columns.entry(idx).or_default();
                    match *field {
                        "name" => column.name = value.to_string(),
                        "searchable" => column.searchable = coerce_bool(value),
                        "orderable" => column.orderable = coerce_bool(value),
                        _ => {}
                    }
                }
                ("order", [idx, field]) => {
                    let Some(idx) = parse_index(idx) else {
                        continue;
                    };
                    let spec = order.entry(idx).or_default();
                    match *field {
                        "column" => spec.column = coerce_int(value),
                        "dir" => spec.dir = value.to_string(),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        request.columns = dense(columns);
        request.order = order.into_values().collect();
        request
    }
}

fn parse_index(idx: &str) -> Option<usize> {
    idx.parse::<usize>().ok().filter(|idx| *idx < MAX_INDEX)
}

/// Column positions matter to `order[i][column]`, so gaps are kept as
/// default columns.
fn dense(columns: BTreeMap<usize, ColumnSpec>) -> Vec<ColumnSpec> {
    let len = columns.keys().next_back().map_or(0, |last| last + 1);
    let mut dense = vec![ColumnSpec::default(); len];
    for (idx, column) in columns {
        dense[idx] = column;
    }
    dense
}

/// `columns[0][name]` → (`columns`, [`0`, `name`]).
fn split_key(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };

    let base = &key[..open];
    let path = key[open..]
        .split('[')
        .skip(1)
        .filter_map(|segment| segment.strip_suffix(']'))
        .collect();
    (base, path)
}

/// Lenient integer coercion: optional sign and leading digits, else 0.
pub fn coerce_int(value: &str) -> i64 {
    let value = value.trim();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude = digits[..end].parse::<i64>().unwrap_or(0);

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn coerce_bool(value: &str) -> bool {
    !matches!(value.trim(), "" | "0" | "false")
}
