use std::path::Path;

use bytes::Bytes;

/// Raw uploaded audio together with the filename it was declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub filename: String,
    pub data: Bytes,
}

impl AudioClip {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Lower-cased file extension, used as a container hint when probing.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
