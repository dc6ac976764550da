//! Catalog data model: genres, listing items, details and pages.

pub mod format;
mod types;

pub use format::{format_runtime, format_usd, poster_url, DEFAULT_POSTER_SIZE, MISSING_VALUE};
pub use types::*;
