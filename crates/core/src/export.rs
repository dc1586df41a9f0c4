//! Spreadsheet export of the webcam list.
//!
//! Records are exported from their JSON projection so the file always shows
//! what the list endpoint returns. Columns are looked up by dotted path.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use serde_json::Value as Json;

use crate::filter::catalog;

pub const SHEET_NAME: &str = "Камеры видеоконтроля";
pub const FILE_NAME: &str = "Камеры_видеоконтроля.xlsx";
pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// ASCII name for clients that ignore `filename*`.
pub const FALLBACK_FILE_NAME: &str = "webcams.xlsx";

/// `Content-Disposition` value for the attachment, with the UTF-8 name
/// percent-encoded per RFC 5987.
pub fn content_disposition() -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(FILE_NAME.as_bytes()).collect();
    format!("attachment; filename=\"{FALLBACK_FILE_NAME}\"; filename*=UTF-8''{encoded}")
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("spreadsheet error: {0}")]
    Workbook(#[from] XlsxError),
}

/// One exported column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportColumn {
    pub field: &'static str,
    pub label: &'static str,
}

/// Resolve the `visible_cols` parameter.
///
/// A JSON list of catalog paths gives those columns in that order. A
/// missing, malformed or empty list, or one naming any unknown column,
/// falls back to the catalog's visible set.
pub fn resolve_columns(raw: Option<&str>) -> Vec<ExportColumn> {
    requested_columns(raw).unwrap_or_else(default_columns)
}

fn requested_columns(raw: Option<&str>) -> Option<Vec<ExportColumn>> {
    let Json::Array(items) = serde_json::from_str::<Json>(raw?).ok()? else {
        return None;
    };
    if items.is_empty() {
        return None;
    }
    items
        .iter()
        .map(|item| {
            let descriptor = catalog::lookup(item.as_str()?)?;
            Some(ExportColumn {
                field: descriptor.field,
                label: descriptor.label,
            })
        })
        .collect()
}

/// The catalog's visible columns in catalog order.
pub fn default_columns() -> Vec<ExportColumn> {
    catalog::visible_fields()
        .map(|d| ExportColumn {
            field: d.field,
            label: d.label,
        })
        .collect()
}

/// Follow a dotted path through nested objects.
pub fn lookup<'a>(record: &'a Json, path: &str) -> Option<&'a Json> {
    path.split('.').try_fold(record, |value, key| value.get(key))
}

/// Plain-text rendering of a projected value.
///
/// Status objects render as their display label.
pub fn cell_text(value: &Json) -> String {
    match value {
        Json::Null => String::new(),
        Json::String(s) => s.clone(),
        Json::Object(map) => match map.get("status_name") {
            Some(Json::String(label)) => label.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// Build an `.xlsx` file: a header row, then one top-aligned row per record.
pub fn build_workbook(columns: &[ExportColumn], records: &[Json]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, column) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, column.label)?;
    }

    let top = Format::new().set_align(FormatAlign::Top);
    for (row, record) in records.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, column) in columns.iter().enumerate() {
            let value = lookup(record, column.field).unwrap_or(&Json::Null);
            write_cell(sheet, row, col as u16, value, &top)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Json,
    format: &Format,
) -> Result<(), XlsxError> {
    match value {
        Json::Null => {
            sheet.write_blank(row, col, format)?;
        }
        Json::Number(n) => match n.as_f64() {
            Some(n) => {
                sheet.write_number_with_format(row, col, n, format)?;
            }
            None => {
                sheet.write_string_with_format(row, col, n.to_string(), format)?;
            }
        },
        other => {
            sheet.write_string_with_format(row, col, cell_text(other), format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn disposition_is_ascii_with_encoded_name() {
        let value = content_disposition();
        assert!(value.is_ascii());
        assert!(value.starts_with("attachment; filename=\"webcams.xlsx\""));
        assert!(value.contains("filename*=UTF-8''%D0%9A%D0%B0%D0%BC"));
        assert!(value.ends_with("_%D0%B2%D0%B8%D0%B4%D0%B5%D0%BE%D0%BA%D0%BE%D0%BD%D1%82%D1%80%D0%BE%D0%BB%D1%8F.xlsx"));
    }

    fn record() -> Json {
        json!({
            "id": 7,
            "name": "Касса",
            "point": {"spid": "100", "city": {"name": "Москва"}},
            "responsible": null,
            "online": {"status": "on", "status_name": "работает"},
        })
    }

    #[test]
    fn requested_columns_keep_their_order() {
        let cols = resolve_columns(Some(r#"["name", "point.spid"]"#));
        assert_eq!(
            cols,
            vec![
                ExportColumn {
                    field: "name",
                    label: "Название камеры"
                },
                ExportColumn {
                    field: "point.spid",
                    label: "ID точки продаж"
                },
            ]
        );
    }

    #[test]
    fn any_unknown_column_falls_back_to_defaults() {
        let cols = resolve_columns(Some(r#"["name", "password"]"#));
        assert_eq!(cols, default_columns());
        assert_eq!(cols.len(), 10);
    }

    #[test]
    fn malformed_or_empty_request_falls_back() {
        assert_eq!(resolve_columns(None), default_columns());
        assert_eq!(resolve_columns(Some("name")), default_columns());
        assert_eq!(resolve_columns(Some("[]")), default_columns());
        assert_eq!(resolve_columns(Some("[1]")), default_columns());
    }

    #[test]
    fn dotted_lookup() {
        let r = record();
        assert_eq!(lookup(&r, "point.city.name"), Some(&json!("Москва")));
        assert_eq!(lookup(&r, "point.address"), None);
        assert_eq!(lookup(&r, "responsible.last_name"), None);
    }

    #[test]
    fn cell_rendering() {
        let r = record();
        assert_eq!(cell_text(lookup(&r, "online").unwrap()), "работает");
        assert_eq!(cell_text(lookup(&r, "id").unwrap()), "7");
        assert_eq!(cell_text(&Json::Null), "");
    }

    #[test]
    fn workbook_is_an_xlsx_archive() {
        let cols = default_columns();
        let bytes = build_workbook(&cols, &[record(), record()]).unwrap();
        // xlsx files are zip archives.
        assert_eq!(&bytes[..2], b"PK");
    }
}
