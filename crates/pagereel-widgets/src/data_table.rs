#![forbid(unsafe_code)]

//! Static data table loaded from a JSON fixture.
//!
//! The fixture has two fields: `columns`, the header labels, and `data`, the
//! rows as positional cell arrays. Rows whose length differs from the header
//! are kept as-is and rendered positionally; they are reported through
//! [`DataTable::row_mismatches`] and a `warn!` at load time.
//!
//! ```
//! use pagereel_widgets::DataTable;
//!
//! let table = DataTable::from_json_str(r#"{"columns":["a","b"],"data":[["1","2"],["3","4"]]}"#).unwrap();
//! let view = table.view();
//! assert_eq!(view.header, ["a", "b"]);
//! assert_eq!(view.rows[1], ["3", "4"]);
//! ```

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Raw fixture shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// Errors that can occur when loading a table fixture.
#[derive(Debug)]
pub enum TableError {
    /// Failed to read the source.
    Io(std::io::Error),
    /// The source is not a valid table document.
    Json(serde_json::Error),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "table I/O error: {e}"),
            Self::Json(e) => write!(f, "table JSON error: {e}"),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// A row whose length differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMismatch {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Header and body as display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    data: TableData,
    mismatches: Vec<RowMismatch>,
}

impl DataTable {
    pub fn new(data: TableData) -> Self {
        let expected = data.columns.len();
        let mismatches: Vec<RowMismatch> = data
            .data
            .iter()
            .enumerate()
            .filter(|(_, row)| row.len() != expected)
            .map(|(row, cells)| RowMismatch {
                row,
                expected,
                actual: cells.len(),
            })
            .collect();
        for m in &mismatches {
            tracing::warn!(row = m.row, expected = m.expected, actual = m.actual, "table row length differs from header");
        }
        Self { data, mismatches }
    }

    pub fn from_json_str(s: &str) -> Result<Self, TableError> {
        Ok(Self::new(serde_json::from_str(s)?))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, TableError> {
        Ok(Self::new(serde_json::from_reader(reader)?))
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn columns(&self) -> &[String] {
        &self.data.columns
    }

    pub fn row_count(&self) -> usize {
        self.data.data.len()
    }

    pub fn row_mismatches(&self) -> &[RowMismatch] {
        &self.mismatches
    }

    pub fn view(&self) -> TableView {
        TableView {
            header: self.data.columns.clone(),
            rows: self
                .data
                .data
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect(),
        }
    }

    /// Fixed-width text rendering. Columns are padded to the widest cell by
    /// display width; short rows leave trailing columns blank.
    pub fn render_text(&self) -> String {
        let view = self.view();
        let columns = view
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(view.header.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&view.header).chain(&view.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        let mut out = String::new();
        push_row(&mut out, &view.header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(&mut out, &rule, &widths);
        for row in &view.rows {
            push_row(&mut out, row, &widths);
        }
        out
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_render_as_strings() {
        let table = DataTable::from_json_str(
            r#"{"columns":["name","rooms","open","note"],"data":[["A",12,true,null]]}"#,
        )
        .unwrap();
        assert_eq!(table.view().rows[0], ["A", "12", "true", ""]);
    }

    #[test]
    fn missing_data_is_empty_body() {
        let table = DataTable::from_json_str(r#"{"columns":["a"]}"#).unwrap();
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn short_and_long_rows_are_kept() {
        let table =
            DataTable::from_json_str(r#"{"columns":["a","b"],"data":[["1"],["2","3","4"]]}"#).unwrap();
        assert_eq!(
            table.row_mismatches(),
            [
                RowMismatch { row: 0, expected: 2, actual: 1 },
                RowMismatch { row: 1, expected: 2, actual: 3 },
            ]
        );
        assert_eq!(table.view().rows[1], ["2", "3", "4"]);
    }

    #[test]
    fn malformed_json_is_error() {
        let err = DataTable::from_json_str(r#"{"columns":"a"}"#).unwrap_err();
        assert!(matches!(err, TableError::Json(_)));
        assert!(err.to_string().starts_with("table JSON error"));
    }

    #[test]
    fn render_pads_by_display_width() {
        let table =
            DataTable::from_json_str(r#"{"columns":["酒店","n"],"data":[["ab","1"],["c","22"]]}"#).unwrap();
        assert_eq!(table.render_text(), "酒店 | n\n---- | --\nab   | 1\nc    | 22\n");
    }

    #[test]
    fn render_handles_extra_cells() {
        let table = DataTable::from_json_str(r#"{"columns":["a"],"data":[["1","2"]]}"#).unwrap();
        assert_eq!(table.render_text(), "a |\n- | -\n1 | 2\n");
    }
}
