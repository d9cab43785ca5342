use std::fmt;
use std::path::PathBuf;

/// Where a dataset file lives: on local disk or in an object-storage bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    Local(PathBuf),
    ObjectStore { bucket: String, key: String },
}

impl DatasetLocation {
    /// Picks a source from optional settings. A local path wins over a
    /// bucket/key pair; blank values count as unset.
    pub fn resolve(path: Option<&str>, bucket: Option<&str>, key: Option<&str>) -> Option<Self> {
        fn present(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }

        if let Some(path) = present(path) {
            return Some(Self::Local(PathBuf::from(path)));
        }

        match (present(bucket), present(key)) {
            (Some(bucket), Some(key)) => Some(Self::ObjectStore {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::ObjectStore { bucket, key } => write!(f, "s3://{}/{}", bucket, key),
        }
    }
}
