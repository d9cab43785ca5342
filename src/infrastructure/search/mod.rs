mod elasticsearch_index;

pub use elasticsearch_index::ElasticsearchIndex;
