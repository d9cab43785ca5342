pub mod audio;
pub mod dataset;
pub mod http;
pub mod observability;
pub mod search;
pub mod storage;
