pub mod catalogue;
pub mod collection;
pub mod config;
pub mod enrich;
pub mod metadata;
pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod testing;
pub mod transport;

pub use catalogue::{dedup_by_spine, rows_from_feed, CatalogueRow, FeedCache};
pub use collection::{CollectionError, CollectionPager, PageBounds, PageRequest};
pub use config::{
    load_config, load_config_from_str, validate_config, CollectionConfig, Config, ConfigError,
    FeedConfig, HttpConfig, SanitizedConfig, ServerConfig,
};
pub use enrich::{enrich_rows, EnrichedRow};
pub use metadata::{
    check_credential, MetadataError, MetadataMatch, MetadataService, ServiceConfig,
    ServiceConfigCache, TmdbClient, TmdbConfig,
};
pub use normalize::{
    normalize, DescriptionLabels, NormalizeOptions, OutputRecord, RecordKind, UnmatchedPolicy,
};
pub use parser::{parse, parse_records, parse_rows, ParseOptions, Parsed, Record};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
