//! Interactive query state and its transitions.
//!
//! The state is a plain value; every user interaction maps to a
//! `QueryAction` and produces the next state.

use super::engine::{FilterSpec, SortField, SortSpec};
use crate::catalog::RatingTier;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub search: String,
    pub active_tier: Option<RatingTier>,
    pub unseen_only: bool,
    pub sort: SortSpec,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    SetSearch(String),
    ClearSearch,
    SelectTier(RatingTier),
    ClearTier,
    SetUnseenOnly(bool),
    /// Same field again flips the direction, a new field sorts ascending.
    SelectSort(SortField),
}

impl QueryState {
    pub fn apply(self, action: QueryAction) -> Self {
        match action {
            QueryAction::SetSearch(search) => Self { search, ..self },
            QueryAction::ClearSearch => Self {
                search: String::new(),
                ..self
            },
            QueryAction::SelectTier(tier) => Self {
                active_tier: Some(tier),
                ..self
            },
            QueryAction::ClearTier => Self {
                active_tier: None,
                ..self
            },
            QueryAction::SetUnseenOnly(unseen_only) => Self {
                unseen_only,
                ..self
            },
            QueryAction::SelectSort(field) => {
                let ascending = if field == self.sort.field {
                    !self.sort.ascending
                } else {
                    true
                };
                Self {
                    sort: SortSpec { field, ascending },
                    ..self
                }
            }
        }
    }

    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            search: Some(self.search.clone()).filter(|s| !s.trim().is_empty()),
            tier: self.active_tier,
            unseen_only: self.unseen_only,
        }
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }
}
