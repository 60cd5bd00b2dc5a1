//! Catalog browsing: featured brands and listing search/filter/sort.

pub mod brands;
pub mod filter;

pub use brands::{Brand, FEATURED_BRANDS, brand_by_slug};
pub use filter::{CatalogQuery, FilterId, SortOption, apply};
