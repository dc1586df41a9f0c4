//! Parsing filter specifications and translating them into a [`FilterQuery`].
//!
//! A specification is a JSON object mapping a dotted field path to a list of
//! `[operator, value]` pairs:
//!
//! ```json
//! {"point.city.name": [["=", "Москва"], ["=", "Казань"]], "online": [["!=", "работает"]]}
//! ```
//!
//! Translation happens in two phases. [`FilterSpec::parse`] validates the
//! shape; the caller then resolves [`FilterSpec::archive_dates`] through the
//! media-server inventory and hands the result to [`build_query`].

use std::collections::HashMap;

use serde_json::Value as Json;

use super::catalog::{self, Operator};
use super::predicate::{Comparison, Condition, FilterQuery, Predicate, Value};
use super::ARCHIVE_DATE_FIELD;
use crate::error::CoreError;
use crate::status::WebcamStatus;
use crate::types::parse_display_date;

/// Responsible-person field whose value is a full "Last First" name.
const RESPONSIBLE_FIELD: &str = "responsible.last_name";
const RESPONSIBLE_FIRST_NAME: &str = "responsible.first_name";
const ONLINE_FIELD: &str = "online";
const SPID_FIELD: &str = "point.spid";

/// Archive date value (as written in the specification) to the point
/// identifiers recorded on that date.
pub type ArchiveIndex = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The whole specification is ignored and the list is unfiltered.
    #[error("filter ignored: {0}")]
    Degrade(String),

    /// The request is rejected.
    #[error("{0}")]
    Structural(String),
}

impl FilterError {
    pub fn is_structural(&self) -> bool {
        matches!(self, FilterError::Structural(_))
    }
}

impl From<FilterError> for CoreError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::Structural(msg) => CoreError::MalformedQuery(msg),
            FilterError::Degrade(msg) => CoreError::Validation(msg),
        }
    }
}

/// One `[operator, value]` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Trimmed dotted path.
    pub field: String,
    pub entries: Vec<FilterEntry>,
}

/// A shape-checked filter specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub fields: Vec<FieldFilter>,
}

impl FilterSpec {
    /// Parse the raw `filters` query parameter.
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        let raw = raw.ok_or_else(|| FilterError::Degrade("no filter given".into()))?;
        let json: Json = serde_json::from_str(raw)
            .map_err(|e| FilterError::Degrade(format!("invalid JSON: {e}")))?;
        let Json::Object(map) = json else {
            return Err(FilterError::Degrade("filter is not an object".into()));
        };

        let mut fields = Vec::with_capacity(map.len());
        for (field, pairs) in map {
            let field = field.trim().to_string();
            let Json::Array(pairs) = pairs else {
                return Err(FilterError::Degrade(format!(
                    "value for '{field}' is not a list"
                )));
            };

            let mut entries = Vec::with_capacity(pairs.len());
            for pair in pairs {
                entries.push(parse_entry(&field, pair)?);
            }
            fields.push(FieldFilter { field, entries });
        }

        Ok(Self { fields })
    }

    /// Parse leniently: degradations yield an empty specification, structural
    /// problems are returned as [`CoreError::MalformedQuery`].
    pub fn from_param(raw: Option<&str>) -> Result<Self, CoreError> {
        match Self::parse(raw) {
            Ok(spec) => Ok(spec),
            Err(e) if e.is_structural() => Err(e.into()),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Distinct values of the `archive_date` pseudo-field, in order.
    pub fn archive_dates(&self) -> Vec<&str> {
        let mut dates: Vec<&str> = Vec::new();
        for filter in self.fields.iter().filter(|f| f.field == ARCHIVE_DATE_FIELD) {
            for entry in &filter.entries {
                if !dates.contains(&entry.value.as_str()) {
                    dates.push(&entry.value);
                }
            }
        }
        dates
    }

    /// Translate leniently, like [`FilterSpec::from_param`].
    pub fn to_query(&self, archive: &ArchiveIndex) -> Result<FilterQuery, CoreError> {
        match build_query(self, archive) {
            Ok(query) => Ok(query),
            Err(e) if e.is_structural() => Err(e.into()),
            Err(_) => Ok(FilterQuery::unfiltered()),
        }
    }
}

fn parse_entry(field: &str, pair: Json) -> Result<FilterEntry, FilterError> {
    let Json::Array(items) = pair else {
        return Err(FilterError::Degrade(format!(
            "entry for '{field}' is not a list"
        )));
    };
    let [operator, value]: [Json; 2] = items.try_into().map_err(|items: Vec<Json>| {
        FilterError::Structural(format!(
            "entry for '{field}' has {} elements, expected 2",
            items.len()
        ))
    })?;

    let Json::String(operator) = operator else {
        return Err(FilterError::Degrade(format!(
            "operator for '{field}' is not a string"
        )));
    };
    let value = match value {
        Json::String(s) => s,
        Json::Number(n) => n.to_string(),
        _ => {
            return Err(FilterError::Degrade(format!(
                "value for '{field}' is not a string"
            )))
        }
    };

    Ok(FilterEntry { operator, value })
}

/// Translate a parsed specification into a predicate tree.
///
/// Pairs for one field are OR-combined and fields are AND-combined. Every
/// `!=` pair becomes its own exclusion. `archive_date` values are looked up
/// in `archive`; a date missing from the index matches no point.
pub fn build_query(spec: &FilterSpec, archive: &ArchiveIndex) -> Result<FilterQuery, FilterError> {
    let mut includes = Vec::new();
    let mut excludes = Vec::new();

    for filter in &spec.fields {
        let mut group = Vec::new();

        for entry in &filter.entries {
            if filter.field == ARCHIVE_DATE_FIELD {
                let points = archive.get(&entry.value).cloned().unwrap_or_default();
                group.push(Predicate::Condition(Condition::new(
                    SPID_FIELD,
                    Comparison::In,
                    Value::TextSet(points),
                )));
                continue;
            }

            let descriptor = catalog::lookup(&filter.field).ok_or_else(|| {
                FilterError::Structural(format!("unknown filter field '{}'", filter.field))
            })?;
            let operator = Operator::from_query_name(&entry.operator)
                .filter(|op| descriptor.allows(*op))
                .ok_or_else(|| {
                    FilterError::Structural(format!(
                        "operator '{}' is not allowed for '{}'",
                        entry.operator, filter.field
                    ))
                })?;

            let value = if descriptor.is_date() {
                let date = parse_display_date(&entry.value).ok_or_else(|| {
                    FilterError::Degrade(format!("invalid date '{}'", entry.value))
                })?;
                Value::Date(date)
            } else if filter.field == ONLINE_FIELD {
                let status = WebcamStatus::from_label(&entry.value).ok_or_else(|| {
                    FilterError::Degrade(format!("unknown status '{}'", entry.value))
                })?;
                Value::Int(i64::from(status.code()))
            } else {
                Value::Text(entry.value.clone())
            };

            let predicate = if filter.field == RESPONSIBLE_FIELD {
                responsible_predicate(&entry.value)?
            } else {
                let comparison = match operator {
                    Operator::Eq | Operator::Ne => Comparison::Eq,
                    Operator::Gt => Comparison::Gt,
                    Operator::Gte => Comparison::Gte,
                    Operator::Lt => Comparison::Lt,
                    Operator::Lte => Comparison::Lte,
                };
                Predicate::Condition(Condition::new(filter.field.clone(), comparison, value))
            };

            if operator == Operator::Ne {
                excludes.push(predicate);
            } else {
                group.push(predicate);
            }
        }

        match group.len() {
            0 => {}
            1 => includes.extend(group),
            _ => includes.push(Predicate::Any(group)),
        }
    }

    let include = match includes.len() {
        0 => Predicate::Always,
        1 => includes.remove(0),
        _ => Predicate::All(includes),
    };

    Ok(FilterQuery {
        include,
        exclude: excludes,
    })
}

/// `"Last First"` becomes `last_name = Last AND first_name = First`.
fn responsible_predicate(full_name: &str) -> Result<Predicate, FilterError> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    let [last, first] = tokens.as_slice() else {
        return Err(FilterError::Structural(format!(
            "responsible name '{full_name}' must be 'Last First'"
        )));
    };
    Ok(Predicate::All(vec![
        Predicate::Condition(Condition::new(
            RESPONSIBLE_FIELD,
            Comparison::Eq,
            Value::Text((*last).to_string()),
        )),
        Predicate::Condition(Condition::new(
            RESPONSIBLE_FIRST_NAME,
            Comparison::Eq,
            Value::Text((*first).to_string()),
        )),
    ]))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use super::*;
    use crate::filter::predicate::{FieldSource, FieldValue};

    // -- Helpers ----------------------------------------------------------

    struct Cam {
        name: &'static str,
        city: &'static str,
        spid: &'static str,
        online: i64,
        installed: Option<NaiveDate>,
        last_name: &'static str,
        first_name: &'static str,
    }

    impl FieldSource for Cam {
        fn field(&self, path: &str) -> FieldValue {
            match path {
                "name" => FieldValue::Text(self.name.into()),
                "point.city.name" => FieldValue::Text(self.city.into()),
                "point.spid" => FieldValue::Text(self.spid.into()),
                "online" => FieldValue::Int(self.online),
                "installed" => self.installed.map_or(FieldValue::Null, FieldValue::Date),
                "responsible.last_name" => FieldValue::Text(self.last_name.into()),
                "responsible.first_name" => FieldValue::Text(self.first_name.into()),
                _ => FieldValue::Null,
            }
        }
    }

    fn cams() -> Vec<Cam> {
        vec![
            Cam {
                name: "Касса",
                city: "Москва",
                spid: "100",
                online: 10,
                installed: NaiveDate::from_ymd_opt(2015, 1, 10),
                last_name: "Иванов",
                first_name: "Иван",
            },
            Cam {
                name: "Вход",
                city: "Казань",
                spid: "200",
                online: 20,
                installed: NaiveDate::from_ymd_opt(2015, 2, 10),
                last_name: "Петров",
                first_name: "Пётр",
            },
            Cam {
                name: "Склад",
                city: "Пермь",
                spid: "300",
                online: 0,
                installed: None,
                last_name: "Иванов",
                first_name: "Пётр",
            },
        ]
    }

    fn names(query: &FilterQuery) -> Vec<&'static str> {
        cams().iter().filter(|c| query.matches(*c)).map(|c| c.name).collect()
    }

    fn query(raw: &str) -> Result<FilterQuery, FilterError> {
        let spec = FilterSpec::parse(Some(raw))?;
        build_query(&spec, &ArchiveIndex::new())
    }

    // -- Shape -----------------------------------------------------------

    #[test]
    fn missing_parameter_degrades() {
        assert_matches!(FilterSpec::parse(None), Err(FilterError::Degrade(_)));
    }

    #[test]
    fn invalid_json_degrades() {
        assert_matches!(FilterSpec::parse(Some("{nope")), Err(FilterError::Degrade(_)));
    }

    #[test]
    fn non_object_degrades() {
        assert_matches!(FilterSpec::parse(Some("[1,2]")), Err(FilterError::Degrade(_)));
    }

    #[test]
    fn field_value_must_be_a_list() {
        assert_matches!(
            FilterSpec::parse(Some(r#"{"name": "x"}"#)),
            Err(FilterError::Degrade(_))
        );
    }

    #[test]
    fn pair_arity_is_structural() {
        assert_matches!(
            FilterSpec::parse(Some(r#"{"name": [["=", "a", "b"]]}"#)),
            Err(FilterError::Structural(_))
        );
        assert_matches!(
            FilterSpec::parse(Some(r#"{"name": [["="]]}"#)),
            Err(FilterError::Structural(_))
        );
    }

    #[test]
    fn non_string_member_degrades() {
        assert_matches!(
            FilterSpec::parse(Some(r#"{"name": [["=", null]]}"#)),
            Err(FilterError::Degrade(_))
        );
    }

    #[test]
    fn field_paths_are_trimmed() {
        let spec = FilterSpec::parse(Some(r#"{" name ": [["=", "Касса"]]}"#)).unwrap();
        assert_eq!(spec.fields[0].field, "name");
    }

    #[test]
    fn lenient_parse_returns_empty_spec_on_degrade() {
        let spec = FilterSpec::from_param(Some("not json")).unwrap();
        assert!(spec.is_empty());
        assert_matches!(
            FilterSpec::from_param(Some(r#"{"name": [["="]]}"#)),
            Err(CoreError::MalformedQuery(_))
        );
    }

    // -- Semantics -------------------------------------------------------

    #[test]
    fn values_for_one_field_are_or_combined() {
        let q = query(r#"{"point.city.name": [["=", "Москва"], ["=", "Казань"]]}"#).unwrap();
        assert_eq!(names(&q), vec!["Касса", "Вход"]);
    }

    #[test]
    fn fields_are_and_combined() {
        let q = query(r#"{"point.city.name": [["=", "Москва"], ["=", "Казань"]], "name": [["=", "Вход"]]}"#)
            .unwrap();
        assert_eq!(names(&q), vec!["Вход"]);
    }

    #[test]
    fn field_order_does_not_matter() {
        let forward = query(r#"{"point.city.name": [["=", "Москва"]], "name": [["=", "Касса"]]}"#)
            .unwrap();
        let reverse = query(r#"{"name": [["=", "Касса"]], "point.city.name": [["=", "Москва"]]}"#)
            .unwrap();
        assert_eq!(names(&forward), vec!["Касса"]);
        assert_eq!(names(&forward), names(&reverse));
    }

    #[test]
    fn exclusion_wins_over_inclusion() {
        let q = query(r#"{"name": [["=", "Касса"], ["!=", "Касса"]]}"#).unwrap();
        assert!(names(&q).is_empty());
    }

    #[test]
    fn exclusion_only_field_does_not_restrict() {
        let q = query(r#"{"name": [["!=", "Склад"]]}"#).unwrap();
        assert_eq!(q.include, Predicate::Always);
        assert_eq!(q.exclude.len(), 1);
        assert_eq!(names(&q), vec!["Касса", "Вход"]);
    }

    #[test]
    fn status_label_resolves_to_code() {
        let q = query(r#"{"online": [["=", "работает"]]}"#).unwrap();
        assert_eq!(names(&q), vec!["Касса"]);
    }

    #[test]
    fn unknown_status_degrades() {
        assert_matches!(query(r#"{"online": [["=", "сломана"]]}"#), Err(FilterError::Degrade(_)));
    }

    #[test]
    fn date_ranges_parse_display_dates() {
        let q = query(r#"{"installed": [["gt", "01.02.2015"]]}"#).unwrap();
        assert_eq!(names(&q), vec!["Вход"]);
    }

    #[test]
    fn bad_date_degrades() {
        assert_matches!(
            query(r#"{"installed": [["gt", "2015-02-01"]]}"#),
            Err(FilterError::Degrade(_))
        );
    }

    #[test]
    fn responsible_name_splits_into_last_and_first() {
        let q = query(r#"{"responsible.last_name": [["=", "Иванов Пётр"]]}"#).unwrap();
        assert_eq!(names(&q), vec!["Склад"]);
    }

    #[test]
    fn responsible_name_exclusion() {
        let q = query(r#"{"responsible.last_name": [["!=", "Иванов Иван"]]}"#).unwrap();
        assert_eq!(names(&q), vec!["Вход", "Склад"]);
    }

    #[test]
    fn responsible_name_needs_exactly_two_tokens() {
        assert_matches!(
            query(r#"{"responsible.last_name": [["=", "Иванов"]]}"#),
            Err(FilterError::Structural(_))
        );
        assert_matches!(
            query(r#"{"responsible.last_name": [["=", "Иванов Иван Иванович"]]}"#),
            Err(FilterError::Structural(_))
        );
    }

    #[test]
    fn unknown_field_is_structural() {
        assert_matches!(query(r#"{"password": [["=", "x"]]}"#), Err(FilterError::Structural(_)));
    }

    #[test]
    fn disallowed_operator_is_structural() {
        assert_matches!(query(r#"{"name": [["gt", "a"]]}"#), Err(FilterError::Structural(_)));
        assert_matches!(query(r#"{"name": [["like", "a"]]}"#), Err(FilterError::Structural(_)));
        assert_matches!(
            query(r#"{"livestream_url": [["=", "a"]]}"#),
            Err(FilterError::Structural(_))
        );
    }

    #[test]
    fn structural_error_maps_to_malformed_query() {
        let err: CoreError = query(r#"{"password": [["=", "x"]]}"#).unwrap_err().into();
        assert_matches!(err, CoreError::MalformedQuery(_));
    }

    // -- Archive dates ---------------------------------------------------

    #[test]
    fn archive_dates_are_collected_once() {
        let spec = FilterSpec::parse(Some(
            r#"{"archive_date": [["=", "16.01.2015"], ["=", "17.01.2015"], ["=", "16.01.2015"]]}"#,
        ))
        .unwrap();
        assert_eq!(spec.archive_dates(), vec!["16.01.2015", "17.01.2015"]);
    }

    #[test]
    fn archive_date_restricts_to_indexed_points() {
        let spec = FilterSpec::parse(Some(
            r#"{"archive_date": [["=", "16.01.2015"], ["=", "17.01.2015"]]}"#,
        ))
        .unwrap();
        let mut index = ArchiveIndex::new();
        index.insert("16.01.2015".into(), vec!["100".into()]);
        index.insert("17.01.2015".into(), vec!["300".into()]);

        let q = build_query(&spec, &index).unwrap();
        assert_eq!(names(&q), vec!["Касса", "Склад"]);
    }

    #[test]
    fn archive_date_without_points_matches_nothing() {
        let spec = FilterSpec::parse(Some(r#"{"archive_date": [["=", "16.01.2015"]]}"#)).unwrap();
        let q = build_query(&spec, &ArchiveIndex::new()).unwrap();
        assert!(names(&q).is_empty());
    }

    #[test]
    fn lenient_translation_drops_degraded_filters() {
        let spec = FilterSpec::parse(Some(r#"{"installed": [["=", "bad"]]}"#)).unwrap();
        let q = spec.to_query(&ArchiveIndex::new()).unwrap();
        assert!(q.is_unfiltered());
    }
}
