use std::fmt;

use serde::Serialize;

/// Failure attached to one item (dataset row or bulk document) of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemError {
    position: usize,
    kind: String,
    detail: String,
}

impl ItemError {
    pub fn new(position: usize, kind: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            position,
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    /// Zero-based position of the item in the input dataset.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {} [{}]: {}", self.position, self.kind, self.detail)
    }
}

/// Outcome counts of a batch or indexing run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatchReport {
    attempted: usize,
    succeeded: usize,
    failed: usize,
    errors: Vec<ItemError>,
}

impl BatchReport {
    pub fn new(attempted: usize, succeeded: usize, failed: usize, errors: Vec<ItemError>) -> Self {
        Self {
            attempted,
            succeeded,
            failed,
            errors,
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn errors(&self) -> &[ItemError] {
        &self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
