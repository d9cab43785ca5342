use serde::Serialize;
use serde_json::{Number, Value};

use super::DatasetRow;

/// Search document derived from one dataset row.
///
/// Every field is always serialized; absent values are an explicit `null`
/// because the index mapping expects a fixed document shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDocument {
    pub generated_text: String,
    pub duration: Option<f64>,
    pub age: Option<Value>,
    pub gender: Option<String>,
    pub accent: Option<String>,
}

impl IndexDocument {
    pub fn from_row(row: &DatasetRow) -> Self {
        Self {
            generated_text: row.generated_text().unwrap_or_default().to_string(),
            duration: row.get("duration").and_then(parse_finite),
            age: row.get("age").map(numeric_or_text),
            gender: row.get("gender").map(|v| v.trim().to_string()),
            accent: row.get("accent").map(|v| v.trim().to_string()),
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// Integers stay integers so `30` is indexed as 30, not 30.0. Age labels such
// as "twenties" are kept verbatim.
fn numeric_or_text(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    match parse_finite(trimmed).and_then(Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(trimmed.to_string()),
    }
}
