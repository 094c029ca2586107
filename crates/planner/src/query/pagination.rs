//! Limit/offset policy and the `rownum` rewrite used where the engine has no
//! LIMIT keyword.

pub const USER_SQL: &str = "USER_SQL";
pub const PAGINATION: &str = "PAGINATION";

/// A limit is present when it is non-negative; `-1` means none.
pub fn has_limit(limit: Option<i64>) -> bool {
    matches!(limit, Some(l) if l >= 0)
}

/// An offset is present only when it is positive.
pub fn has_offset(offset: Option<i64>) -> bool {
    matches!(offset, Some(o) if o > 0)
}

/// First stage: names the user statement and numbers its rows.
pub fn wrap_as_named_subquery(sql: &str) -> String {
    format!(
        "WITH {USER_SQL} AS ({sql}),\n    {PAGINATION} AS (SELECT {USER_SQL}.*, rownum as rowNumId FROM {USER_SQL})"
    )
}

/// The `rownum` predicate for the requested window, if any.
pub fn row_filter(limit: Option<i64>, offset: Option<i64>) -> Option<String> {
    let mut parts = Vec::new();
    if has_offset(offset)
        && let Some(offset) = offset
    {
        parts.push(format!("rowNumId > {offset}"));
    }
    if has_limit(limit)
        && let Some(limit) = limit
    {
        parts.push(format!("rownum <= {limit}"));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" AND "))
    }
}

/// Second stage: selects the requested window from the numbered rows.
pub fn apply_row_filter(wrapped: &str, filter: &str) -> String {
    format!("{wrapped}\nSELECT *\nFROM {PAGINATION}\nWHERE {filter}")
}
