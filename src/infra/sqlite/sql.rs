use std::fmt::Write as _;

use rusqlite::types::Value;

use crate::domain::entities::criteria::{Condition, Criteria, CriteriaValue, Join, JoinKind};

/// Alias of the primary table in every generated statement.
pub const PRIMARY_ALIAS: &str = "t";

/// Double-quotes each dot-separated part, so `c.name` stays qualified.
pub fn quote_ident(ident: &str) -> String {
    ident
        .split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Quotes a column reference. Bare names are bound to the primary table, so
/// an unknown column fails the statement instead of reading as a string.
pub fn qualify_column(column: &str) -> String {
    if column.contains('.') {
        quote_ident(column)
    } else {
        format!("{PRIMARY_ALIAS}.{}", quote_ident(column))
    }
}

/// Escapes LIKE wildcards; pair with `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_value(value: &CriteriaValue) -> Value {
    match value {
        CriteriaValue::Null => Value::Null,
        CriteriaValue::Integer(v) => Value::Integer(*v),
        CriteriaValue::Real(v) => Value::Real(*v),
        CriteriaValue::Text(v) => Value::Text(v.clone()),
    }
}

fn push_condition(condition: &Condition, sql: &mut String, params: &mut Vec<Value>) {
    match condition {
        Condition::Raw { sql: fragment, params: raw } => {
            let _ = write!(sql, "({fragment})");
            params.extend(raw.iter().map(to_value));
        }
        Condition::Eq { column, value } => {
            let _ = write!(sql, "{} = ?", qualify_column(column));
            params.push(to_value(value));
        }
        Condition::Contains { column, term } => {
            let _ = write!(sql, "{} LIKE ? ESCAPE '\\'", qualify_column(column));
            params.push(Value::Text(format!("%{}%", escape_like(term))));
        }
        Condition::Any(parts) => push_group(parts, " OR ", "0", sql, params),
        Condition::All(parts) => push_group(parts, " AND ", "1", sql, params),
    }
}

fn push_group(
    parts: &[Condition],
    separator: &str,
    empty: &str,
    sql: &mut String,
    params: &mut Vec<Value>,
) {
    if parts.is_empty() {
        sql.push_str(empty);
        return;
    }

    sql.push('(');
    for (idx, part) in parts.iter().enumerate() {
        if idx > 0 {
            sql.push_str(separator);
        }
        push_condition(part, sql, params);
    }
    sql.push(')');
}

fn push_joins(joins: &[Join], sql: &mut String) {
    for join in joins {
        let kind = match join.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        };
        let alias = quote_ident(&join.alias);
        let _ = write!(
            sql,
            " {kind} {} AS {alias} ON {alias}.{} = {PRIMARY_ALIAS}.{}",
            quote_ident(&join.table),
            quote_ident(&join.foreign),
            quote_ident(&join.local),
        );
    }
}

fn push_from_where(table: &str, criteria: &Criteria, sql: &mut String, params: &mut Vec<Value>) {
    let _ = write!(sql, " FROM {} AS {PRIMARY_ALIAS}", quote_ident(table));
    push_joins(&criteria.joins, sql);

    if let Some(condition) = &criteria.condition {
        sql.push_str(" WHERE ");
        push_condition(condition, sql, params);
    }
}

/// `SELECT COUNT(...)` over the filter and joins; order and window are ignored.
pub fn count_sql(table: &str, criteria: &Criteria) -> (String, Vec<Value>) {
    let mut sql = if criteria.joins.is_empty() {
        String::from("SELECT COUNT(*)")
    } else {
        format!("SELECT COUNT(DISTINCT {PRIMARY_ALIAS}.rowid)")
    };
    let mut params = Vec::new();
    push_from_where(table, criteria, &mut sql, &mut params);
    (sql, params)
}

/// Joined rows collapse back to one per primary rowid, matching [`count_sql`].
pub fn select_sql(table: &str, criteria: &Criteria) -> (String, Vec<Value>) {
    let mut sql = format!("SELECT {PRIMARY_ALIAS}.*");
    let mut params = Vec::new();
    push_from_where(table, criteria, &mut sql, &mut params);
    if !criteria.joins.is_empty() {
        let _ = write!(sql, " GROUP BY {PRIMARY_ALIAS}.rowid");
    }

    if let Some(order) = &criteria.order {
        let _ = write!(
            sql,
            " ORDER BY {} {}",
            qualify_column(&order.column),
            order.direction.as_sql()
        );
    }

    match (criteria.limit, criteria.offset) {
        (None, None) => {}
        (limit, offset) => {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(limit.unwrap_or(-1)));
            params.push(Value::Integer(offset.unwrap_or(0)));
        }
    }

    (sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::grid::SortDirection;

    #[test]
    fn quote_ident_escapes_and_keeps_qualifier() {
        assert_eq!(quote_ident("name"), "\"name\"");
        assert_eq!(quote_ident("c.name"), "\"c\".\"name\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn contains_binds_escaped_term() {
        let criteria = Criteria::new().with_condition(Condition::contains("title", "50%_off"));
        let (sql, params) = count_sql("posts", &criteria);

        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM \"posts\" AS t WHERE t.\"title\" LIKE ? ESCAPE '\\'"
        );
        assert_eq!(params, vec![Value::Text("%50\\%\\_off%".to_string())]);
    }

    #[test]
    fn search_term_is_never_inlined() {
        let criteria =
            Criteria::new().with_condition(Condition::contains("title", "x' OR '1'='1"));
        let (sql, _params) = select_sql("posts", &criteria);
        assert!(!sql.contains("'1'='1"));
    }

    #[test]
    fn select_renders_order_and_window() {
        let mut criteria = Criteria::new()
            .with_condition(Condition::eq("status", "open"))
            .with_condition(Condition::Any(vec![
                Condition::contains("title", "a"),
                Condition::contains("body", "a"),
            ]));
        criteria.set_order("created_at", SortDirection::Desc);
        criteria.apply_page(10, 1);

        let (sql, params) = select_sql("posts", &criteria);

        assert_eq!(
            sql,
            "SELECT t.* FROM \"posts\" AS t WHERE (t.\"status\" = ? AND (t.\"title\" LIKE ? ESCAPE '\\' OR t.\"body\" LIKE ? ESCAPE '\\')) ORDER BY t.\"created_at\" DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params[3], Value::Integer(10));
        assert_eq!(params[4], Value::Integer(10));
    }

    #[test]
    fn empty_or_group_matches_nothing() {
        let criteria = Criteria::new().with_condition(Condition::Any(Vec::new()));
        let (sql, params) = count_sql("posts", &criteria);
        assert_eq!(sql, "SELECT COUNT(*) FROM \"posts\" AS t WHERE 0");
        assert!(params.is_empty());
    }

    #[test]
    fn bare_columns_bind_to_primary_alias() {
        assert_eq!(qualify_column("title"), "t.\"title\"");
        assert_eq!(qualify_column("c.name"), "\"c\".\"name\"");
    }

    #[test]
    fn joined_select_groups_by_primary_rowid() {
        let mut criteria = Criteria::new().with_condition(Condition::contains("a.name", "x"));
        criteria.joins.push(Join::left("authors", "a", "id", "author_id"));
        criteria.set_order("title", SortDirection::Asc);

        let (sql, _params) = select_sql("posts", &criteria);

        assert_eq!(
            sql,
            "SELECT t.* FROM \"posts\" AS t LEFT JOIN \"authors\" AS \"a\" ON \"a\".\"id\" = t.\"author_id\" WHERE \"a\".\"name\" LIKE ? ESCAPE '\\' GROUP BY t.rowid ORDER BY t.\"title\" ASC"
        );
    }

    #[test]
    fn joins_count_distinct_primary_rows() {
        let mut criteria = Criteria::new();
        criteria.joins.push(Join::left("authors", "a", "id", "author_id"));

        let (sql, _params) = count_sql("posts", &criteria);

        assert_eq!(
            sql,
            "SELECT COUNT(DISTINCT t.rowid) FROM \"posts\" AS t LEFT JOIN \"authors\" AS \"a\" ON \"a\".\"id\" = t.\"author_id\""
        );
    }
}
