//! Criterion catalogue feed: row model, deduplication and the in-memory cache.

mod cache;
mod dedup;
mod types;

pub use cache::{rows_from_feed, FeedCache};
pub use dedup::dedup_by_spine;
pub use types::*;
