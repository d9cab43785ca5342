mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BatchSettings, DatasetSourceSettings, IndexingSettings, InferenceProvider, InferenceSettings,
    LoggingSettings, ObjectStoreSettings, ServerSettings, Settings, TranscriptionSettings,
};
