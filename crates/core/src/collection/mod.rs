//! Paginated access to the enriched catalogue.

mod error;
mod pager;

pub use error::CollectionError;
pub use pager::{CollectionPager, PageBounds, PageRequest};
