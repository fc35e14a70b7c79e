//! Film Catalog Library
//!
//! Normalizes a personal film database into a searchable catalog with
//! rating badges, title grouping and TTL-cached refreshes.

pub mod cache;
pub mod catalog;
pub mod catalog_service;
pub mod config;
pub mod lookup;
pub mod search;
pub mod source;

// Re-export commonly used types for convenience
pub use catalog::{CatalogIndex, FilmRecord, GroupKey, RatingTier};
pub use catalog_service::{CatalogService, RefreshError, RefreshSettings};
pub use search::{query, FilterSpec, QueryOutcome, SortField, SortSpec};
