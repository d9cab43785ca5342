use std::fmt;

use uuid::Uuid;

/// Key of a per-request staging slot. Unique per upload, so two requests
/// carrying the same filename never share a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagingKey(String);

impl StagingKey {
    pub fn for_upload(filename: &str) -> Self {
        Self(format!("uploads/{}/{}", Uuid::new_v4(), sanitize(filename)))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StagingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keeps only the last path segment and strips anything object stores dislike.
fn sanitize(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
