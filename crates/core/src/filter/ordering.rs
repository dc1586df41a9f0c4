//! Sort specification for the webcam list.

use serde_json::Value as Json;

use super::predicate::relation_path;

/// One sort key: a dotted path, optionally descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub path: String,
    pub descending: bool,
}

impl SortKey {
    /// Relation-traversal form with the direction prefix, e.g.
    /// `-point__city__name`.
    pub fn store_path(&self) -> String {
        let path = relation_path(&self.path);
        if self.descending {
            format!("-{path}")
        } else {
            path
        }
    }
}

/// Parse the `sort_by` parameter: a JSON array of paths, each optionally
/// prefixed with `-`. Anything malformed yields no ordering.
pub fn parse_ordering(raw: Option<&str>) -> Vec<SortKey> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let Ok(Json::Array(items)) = serde_json::from_str::<Json>(raw) else {
        return Vec::new();
    };

    let mut keys = Vec::with_capacity(items.len());
    for item in items {
        let Json::String(item) = item else {
            return Vec::new();
        };
        let item = item.trim();
        let (path, descending) = match item.strip_prefix('-') {
            Some(rest) => (rest.trim(), true),
            None => (item, false),
        };
        if path.is_empty() {
            continue;
        }
        keys.push(SortKey {
            path: path.to_string(),
            descending,
        });
    }
    keys
}
