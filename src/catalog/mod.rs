mod error;
mod index;
mod normalize;
pub mod parse;
mod record;

pub use error::CatalogError;
pub use index::CatalogIndex;
pub(crate) use index::group_in_order;
pub use normalize::{normalize_table, ColumnMap, RawTable};
pub use record::{FilmRecord, GroupKey, RatingTier, TechMeta, UNKNOWN_FIELD};
