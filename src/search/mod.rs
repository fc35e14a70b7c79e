mod engine;
mod query_state;

pub use engine::{query, FilterSpec, QueryOutcome, ResultGroup, SortField, SortSpec};
pub use query_state::{QueryAction, QueryState};
