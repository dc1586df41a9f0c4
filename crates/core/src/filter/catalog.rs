//! Field metadata catalog for the webcam list.
//!
//! A fixed, ordered table describing every column the list exposes: its
//! dotted path, whether it is shown by default, its value type, and which
//! filter operators it accepts. The table drives default visible columns,
//! the `filter-params` endpoint and date parsing in the filter translator.

use serde::Serialize;

/// A filter operator as it appears in the filter specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    /// Name used in filter specifications (`"="`, `"!="`, `"gt"`, ...).
    pub fn query_name(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
        }
    }

    /// Symbol shown to users.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
        }
    }

    pub fn from_query_name(name: &str) -> Option<Self> {
        match name {
            "=" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            _ => None,
        }
    }
}

/// Operators offered for string fields.
pub const STRING_OPERATORS: &[Operator] = &[Operator::Eq, Operator::Ne];

/// Operators offered for date and numeric fields.
pub const COMPARISON_OPERATORS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
];

/// Value type of a catalog field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Str,
    Date,
}

/// One row of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Dotted field path, e.g. `point.city.name`.
    pub field: &'static str,
    /// Shown in the list and exported when no columns are requested.
    pub visible: bool,
    pub field_type: FieldType,
    /// Reserved for grouped columns; always `false`.
    pub is_group: bool,
    /// Accepted filter operators. `None` means the field cannot be filtered.
    pub operators: Option<&'static [Operator]>,
    /// Column header.
    pub label: &'static str,
}

impl FieldDescriptor {
    pub fn allows(&self, operator: Operator) -> bool {
        self.operators.is_some_and(|ops| ops.contains(&operator))
    }

    pub fn is_date(&self) -> bool {
        self.field_type == FieldType::Date
    }

    /// Serializable description for the `filter-params` endpoint.
    pub fn params(&self) -> FieldParams {
        FieldParams {
            field: self.field,
            is_visible_in_list: self.visible,
            field_type: self.field_type,
            is_group: self.is_group,
            aggregation_params: None,
            filter_params: self.operators.map(|ops| {
                ops.iter()
                    .map(|op| OperatorParam {
                        query_name: op.query_name(),
                        name: op.symbol(),
                    })
                    .collect()
            }),
            field_name: self.label,
        }
    }
}

/// Wire form of a [`FieldDescriptor`].
#[derive(Debug, Serialize)]
pub struct FieldParams {
    pub field: &'static str,
    pub is_visible_in_list: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_group: bool,
    pub aggregation_params: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_params: Option<Vec<OperatorParam>>,
    pub field_name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OperatorParam {
    pub query_name: &'static str,
    pub name: &'static str,
}

const fn string_field(field: &'static str, visible: bool, label: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        field,
        visible,
        field_type: FieldType::Str,
        is_group: false,
        operators: Some(STRING_OPERATORS),
        label,
    }
}

/// The catalog, in display order.
pub static FIELD_CATALOG: &[FieldDescriptor] = &[
    string_field("point.name", true, "Точка продаж"),
    string_field("point.spid", true, "ID точки продаж"),
    string_field("point.trade_network", true, "Торговая сеть"),
    string_field("point.city.name", true, "Город"),
    string_field("point.address", true, "Адрес"),
    string_field("id", false, "ID камеры"),
    string_field("name", true, "Название камеры"),
    string_field("slug", false, "Slug"),
    string_field("responsible.last_name", true, "Ответственный"),
    string_field("online", true, "Статус"),
    string_field("ip", true, "IP-адрес камеры"),
    FieldDescriptor {
        field: "installed",
        visible: true,
        field_type: FieldType::Date,
        is_group: false,
        operators: Some(COMPARISON_OPERATORS),
        label: "Дата подключения",
    },
    FieldDescriptor {
        field: "livestream_url",
        visible: false,
        field_type: FieldType::Str,
        is_group: false,
        operators: None,
        label: "URL трансляции",
    },
];

/// Find the descriptor for a dotted field path.
pub fn lookup(field: &str) -> Option<&'static FieldDescriptor> {
    FIELD_CATALOG.iter().find(|d| d.field == field)
}

/// Whether `field` is a date-typed catalog field.
pub fn is_date_field(field: &str) -> bool {
    lookup(field).is_some_and(FieldDescriptor::is_date)
}

/// Descriptors shown by default, in catalog order.
pub fn visible_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELD_CATALOG.iter().filter(|d| d.visible)
}

/// The whole catalog in wire form.
pub fn describe_all() -> Vec<FieldParams> {
    FIELD_CATALOG.iter().map(FieldDescriptor::params).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_is_fixed() {
        let fields: Vec<&str> = FIELD_CATALOG.iter().map(|d| d.field).collect();
        assert_eq!(
            fields,
            vec![
                "point.name",
                "point.spid",
                "point.trade_network",
                "point.city.name",
                "point.address",
                "id",
                "name",
                "slug",
                "responsible.last_name",
                "online",
                "ip",
                "installed",
                "livestream_url",
            ]
        );
    }

    #[test]
    fn hidden_columns_are_id_slug_and_stream() {
        let hidden: Vec<&str> = FIELD_CATALOG
            .iter()
            .filter(|d| !d.visible)
            .map(|d| d.field)
            .collect();
        assert_eq!(hidden, vec!["id", "slug", "livestream_url"]);
        assert_eq!(visible_fields().count(), 10);
    }

    #[test]
    fn only_installed_is_a_date() {
        assert!(is_date_field("installed"));
        assert!(!is_date_field("name"));
        assert!(!is_date_field("no.such.field"));
    }

    #[test]
    fn string_fields_reject_range_operators() {
        let name = lookup("point.name").unwrap();
        assert!(name.allows(Operator::Eq));
        assert!(name.allows(Operator::Ne));
        assert!(!name.allows(Operator::Gt));

        let installed = lookup("installed").unwrap();
        assert!(installed.allows(Operator::Lte));
    }

    #[test]
    fn stream_url_is_not_filterable() {
        let stream = lookup("livestream_url").unwrap();
        assert!(!stream.allows(Operator::Eq));

        let json = serde_json::to_value(stream.params()).unwrap();
        assert!(json.get("filter_params").is_none());
    }

    #[test]
    fn params_wire_shape() {
        let json = serde_json::to_value(lookup("installed").unwrap().params()).unwrap();
        assert_eq!(json["field"], "installed");
        assert_eq!(json["type"], "date");
        assert_eq!(json["is_visible_in_list"], true);
        assert_eq!(json["is_group"], false);
        assert!(json["aggregation_params"].is_null());
        assert_eq!(json["field_name"], "Дата подключения");
        assert_eq!(json["filter_params"][2]["query_name"], "gt");
        assert_eq!(json["filter_params"][2]["name"], ">");
        assert_eq!(json["filter_params"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn operator_names_round_trip() {
        for op in COMPARISON_OPERATORS {
            assert_eq!(Operator::from_query_name(op.query_name()), Some(*op));
        }
        assert_eq!(Operator::from_query_name("like"), None);
    }
}
