//! Conversion between the Sheets `values` grid and keyed rows.

use aplus_core::{Column, Row, column_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `GET .../values/{range}`. `values` is omitted for an empty sheet.
#[derive(Debug, Deserialize)]
pub(crate) struct ValueRange {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// Body of `POST .../values/{range}:append`.
#[derive(Debug, Serialize)]
pub(crate) struct AppendBody {
    pub values: Vec<Vec<String>>,
}

/// Render a cell as the text shown in the sheet.
pub(crate) fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turn a header-first grid into keyed rows.
///
/// Short rows are padded with empty strings and unnamed columns are ignored.
/// Blank rows are kept so that row positions match the sheet.
pub(crate) fn rows_from_grid(grid: &[Vec<Value>]) -> Vec<Row> {
    let Some((header, data)) = grid.split_first() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(|c| cell_text(c).trim().to_owned()).collect();

    data.iter()
        .map(|cells| {
            let mut row = Row::with_capacity(header.len());
            for (index, name) in header.iter().enumerate() {
                if name.is_empty() {
                    continue;
                }
                let value = cells.get(index).map(cell_text).unwrap_or_default();
                row.entry(name.clone()).or_insert(value);
            }
            row
        })
        .collect()
}

/// Order a keyed row by the sheet's header, matching known columns by alias.
pub(crate) fn cells_for_header(header: &[String], row: &Row) -> Vec<String> {
    let by_key: std::collections::HashMap<String, &String> =
        row.iter().map(|(k, v)| (column_key(k), v)).collect();

    header
        .iter()
        .map(|name| {
            let key = match Column::from_header(name) {
                Some(column) => column_key(column.header()),
                None => column_key(name),
            };
            by_key.get(&key).map(|v| (*v).clone()).unwrap_or_default()
        })
        .collect()
}
