//! Rendering filter predicates and sort keys into SQL.
//!
//! Dotted field paths map onto the aliases of the webcam record join
//! (`w` webcams, `p` points, `c` cities, `tn` trade networks, `r` profiles).
//! Every literal is bound; only fixed column expressions are spliced in.

use pointcam_core::filter::{Comparison, FilterQuery, Predicate, SortKey, Value};
use sqlx::{Postgres, QueryBuilder};

/// Select list and joins for [`crate::models::webcam::WebcamRecord`].
pub const RECORD_SELECT: &str = "SELECT w.id, w.point_id, p.name AS point_name, \
    p.spid AS point_spid, p.address AS point_address, tn.name AS trade_network, \
    c.name AS city_name, w.name, w.slug, w.responsible_id, \
    r.first_name AS responsible_first_name, r.last_name AS responsible_last_name, \
    w.ip, w.port, w.host, w.installed, w.online, w.created_at \
    FROM webcams w \
    JOIN points p ON p.id = w.point_id \
    LEFT JOIN cities c ON c.id = p.city_id \
    LEFT JOIN trade_networks tn ON tn.id = p.trade_network_id \
    LEFT JOIN profiles r ON r.id = w.responsible_id";

/// Joins only, for counts and autocomplete.
pub const RECORD_FROM: &str = "FROM webcams w \
    JOIN points p ON p.id = w.point_id \
    LEFT JOIN cities c ON c.id = p.city_id \
    LEFT JOIN trade_networks tn ON tn.id = p.trade_network_id \
    LEFT JOIN profiles r ON r.id = w.responsible_id";

/// Ordering used when the request gives none.
pub const DEFAULT_ORDER: &str = "w.name, w.id";

/// SQL expressions for one field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Expression compared in predicates.
    pub filter: &'static str,
    /// Expression sorted on.
    pub sort: &'static str,
}

const fn same(expr: &'static str) -> Column {
    Column {
        filter: expr,
        sort: expr,
    }
}

/// Look up the column for a dotted field path.
pub fn column(path: &str) -> Option<Column> {
    let column = match path {
        // Ids are filtered as text, like every other string field.
        "id" => Column {
            filter: "w.id::text",
            sort: "w.id",
        },
        "name" => same("w.name"),
        "slug" => same("w.slug"),
        "ip" => same("w.ip"),
        "online" => same("w.online"),
        "installed" => same("w.installed"),
        "point.name" => same("p.name"),
        "point.spid" => same("p.spid"),
        "point.address" => same("p.address"),
        "point.trade_network" => same("tn.name"),
        "point.city.name" => same("c.name"),
        "responsible.last_name" => same("r.last_name"),
        "responsible.first_name" => same("r.first_name"),
        _ => return None,
    };
    Some(column)
}

/// Append ` WHERE ...` for `query`. Exclusions over null columns never
/// remove a row.
pub fn push_where(qb: &mut QueryBuilder<'_, Postgres>, query: &FilterQuery) {
    qb.push(" WHERE ");
    push_predicate(qb, &query.include);
    for exclusion in &query.exclude {
        qb.push(" AND NOT COALESCE(");
        push_predicate(qb, exclusion);
        qb.push(", FALSE)");
    }
}

/// Append a predicate as a parenthesized boolean expression.
pub fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::Always => {
            qb.push("TRUE");
        }
        Predicate::All(parts) if parts.is_empty() => {
            qb.push("TRUE");
        }
        Predicate::Any(parts) if parts.is_empty() => {
            qb.push("FALSE");
        }
        Predicate::All(parts) => push_joined(qb, parts, " AND "),
        Predicate::Any(parts) => push_joined(qb, parts, " OR "),
        Predicate::Condition(cond) => {
            let Some(column) = column(&cond.path) else {
                tracing::warn!(path = %cond.path, "Unmapped filter path, matching nothing");
                qb.push("FALSE");
                return;
            };

            qb.push("(").push(column.filter);
            match (&cond.value, cond.comparison) {
                (Value::TextSet(set), _) => {
                    qb.push(" = ANY(").push_bind(set.clone()).push(")");
                }
                (value, comparison) => {
                    qb.push(operator(comparison));
                    push_value(qb, value);
                }
            }
            qb.push(")");
        }
    }
}

fn push_joined(qb: &mut QueryBuilder<'_, Postgres>, parts: &[Predicate], separator: &str) {
    qb.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_predicate(qb, part);
    }
    qb.push(")");
}

fn operator(comparison: Comparison) -> &'static str {
    match comparison {
        Comparison::Eq | Comparison::In => " = ",
        Comparison::Gt => " > ",
        Comparison::Gte => " >= ",
        Comparison::Lt => " < ",
        Comparison::Lte => " <= ",
    }
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &Value) {
    match value {
        Value::Text(s) => {
            qb.push_bind(s.clone());
        }
        Value::Int(i) => {
            qb.push_bind(*i);
        }
        Value::Date(d) => {
            qb.push_bind(*d);
        }
        Value::TextSet(set) => {
            qb.push_bind(set.clone());
        }
    }
}

/// Append ` ORDER BY ...`. Unknown paths are skipped; the webcam id is
/// always the final tie-breaker.
pub fn push_order_by(qb: &mut QueryBuilder<'_, Postgres>, keys: &[SortKey]) {
    let clauses = order_clauses(keys);
    qb.push(" ORDER BY ");
    if clauses.is_empty() {
        qb.push(DEFAULT_ORDER);
    } else {
        qb.push(clauses.join(", ")).push(", w.id");
    }
}

/// `ORDER BY` terms for the known keys.
pub fn order_clauses(keys: &[SortKey]) -> Vec<String> {
    keys.iter()
        .filter_map(|key| match column(&key.path) {
            Some(column) => Some(format!(
                "{} {}",
                column.sort,
                if key.descending { "DESC" } else { "ASC" }
            )),
            None => {
                tracing::debug!(path = %key.path, "Dropping unknown sort key");
                None
            }
        })
        .collect()
}
