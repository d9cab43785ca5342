use std::collections::HashMap;

pub const FILENAME_COLUMN: &str = "filename";
pub const GENERATED_TEXT_COLUMN: &str = "generated_text";

const MISSING_MARKERS: [&str; 7] = ["", "nan", "na", "n/a", "null", "none", "<na>"];

/// Whether a raw cell value stands for "no value" (empty, NaN, null, ...).
pub fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// One manifest row: arbitrary metadata columns plus the transcript slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetRow {
    fields: HashMap<String, String>,
    generated_text: Option<String>,
}

impl DatasetRow {
    /// Builds a row from raw cells. A `generated_text` cell, if present, is
    /// lifted into the transcript slot (missing values become `None`).
    pub fn new(mut fields: HashMap<String, String>) -> Self {
        let generated_text = fields
            .remove(GENERATED_TEXT_COLUMN)
            .filter(|value| !is_missing(value));
        Self {
            fields,
            generated_text,
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Cell value, or `None` when the column is absent or holds a missing marker.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|value| !is_missing(value))
    }

    /// Cell value exactly as read, empty when the column is absent.
    pub fn raw(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn filename(&self) -> Option<&str> {
        self.get(FILENAME_COLUMN).map(str::trim)
    }

    pub fn generated_text(&self) -> Option<&str> {
        self.generated_text.as_deref()
    }

    pub fn with_generated_text(mut self, generated_text: Option<String>) -> Self {
        self.generated_text = generated_text;
        self
    }
}

/// A tabular manifest with a stable column order.
///
/// `generated_text` is never part of `columns`; it is always emitted last on
/// output so that a re-run over an augmented file stays well-formed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<DatasetRow>) -> Self {
        let columns = columns
            .into_iter()
            .filter(|column| column != GENERATED_TEXT_COLUMN)
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Same columns, different rows.
    pub fn with_rows(&self, rows: Vec<DatasetRow>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn output_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(GENERATED_TEXT_COLUMN))
            .collect()
    }

    /// Cells of one row in [`Dataset::output_columns`] order.
    pub fn output_record<'a>(&'a self, row: &'a DatasetRow) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|column| row.raw(column))
            .chain(std::iter::once(row.generated_text().unwrap_or("")))
            .collect()
    }
}
