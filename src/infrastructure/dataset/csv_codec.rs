use std::collections::{HashMap, HashSet};

use crate::application::ports::DatasetError;
use crate::domain::{Dataset, DatasetRow};

/// Parses a headed CSV manifest. Every record must have as many cells as the
/// header row.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = dedupe_headers(
        reader
            .headers()
            .map_err(|e| DatasetError::Malformed(format!("header: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect(),
    );

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DatasetError::Malformed("missing header row".to_string()));
    }

    let mut rows = Vec::new();
    for (position, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| DatasetError::Malformed(format!("record {}: {}", position + 1, e)))?;
        let fields: HashMap<String, String> = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(DatasetRow::new(fields));
    }

    Ok(Dataset::new(headers, rows))
}

/// Repeated column names get a numeric suffix (`note`, `note.1`, ...) so
/// that no cell is shadowed by a later column of the same name.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let originals: HashSet<String> = headers.iter().cloned().collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut unique = Vec::with_capacity(headers.len());

    for header in headers {
        let name = if taken.contains(&header) {
            (1..)
                .map(|n| format!("{}.{}", header, n))
                .find(|candidate| !taken.contains(candidate) && !originals.contains(candidate))
                .unwrap_or_default()
        } else {
            header
        };
        taken.insert(name.clone());
        unique.push(name);
    }

    unique
}

/// Serializes the dataset with `generated_text` as the last column.
pub fn write_csv(dataset: &Dataset) -> Result<Vec<u8>, DatasetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(dataset.output_columns())
        .map_err(|e| DatasetError::Malformed(e.to_string()))?;

    for row in dataset.rows() {
        writer
            .write_record(dataset.output_record(row))
            .map_err(|e| DatasetError::Malformed(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DatasetError::Storage(e.to_string()))
}
