mod csv_codec;
mod object_store_dataset_store;

pub use csv_codec::{parse_csv, write_csv};
pub use object_store_dataset_store::ObjectStoreDatasetStore;
