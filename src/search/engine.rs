//! Query engine: filter, sort and group the catalog for one interaction.

use crate::catalog::{group_in_order, CatalogIndex, FilmRecord, GroupKey, RatingTier};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Filters applied to physical records, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub search: Option<String>,
    pub tier: Option<RatingTier>,
    pub unseen_only: bool,
}

impl FilterSpec {
    /// Lower-cased search term, `None` when absent or blank.
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// A filter with neither a search term nor a tier must not list the
    /// whole catalog. The unseen switch alone does not make a query.
    pub fn is_idle(&self) -> bool {
        self.search_term().is_none() && self.tier.is_none()
    }

    fn matches(&self, term: Option<&str>, record: &FilmRecord) -> bool {
        if let Some(term) = term {
            if !record.title_key.contains(term) {
                return false;
            }
        }
        if let Some(tier) = self.tier {
            if record.rating_tier != tier {
                return false;
            }
        }
        !(self.unseen_only && record.is_seen())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SortField {
    #[default]
    Title,
    Year,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "year" => Ok(SortField::Year),
            other => Err(format!("Unknown sort field: {}", other)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::Title => f.write_str("title"),
            SortField::Year => f.write_str("year"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Title,
            ascending: true,
        }
    }
}

impl SortSpec {
    /// Ordering of two records under this spec.
    ///
    /// Unknown years sort last in both directions, and ties are always broken
    /// by ascending title.
    fn compare(&self, a: &FilmRecord, b: &FilmRecord) -> Ordering {
        let primary = match self.field {
            SortField::Title => directed(a.title_key.cmp(&b.title_key), self.ascending),
            SortField::Year => match (a.year, b.year) {
                (Some(x), Some(y)) => directed(x.cmp(&y), self.ascending),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        primary.then_with(|| a.title_key.cmp(&b.title_key))
    }
}

fn directed(ordering: Ordering, ascending: bool) -> Ordering {
    if ascending {
        ordering
    } else {
        ordering.reverse()
    }
}

/// One logical title in a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultGroup<'a> {
    pub key: GroupKey,
    pub records: Vec<&'a FilmRecord>,
}

impl<'a> ResultGroup<'a> {
    /// The record whose position placed this group.
    pub fn lead(&self) -> &'a FilmRecord {
        self.records[0]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<'a> {
    /// Nothing to search for: show nothing rather than the whole catalog.
    Idle,
    Groups(Vec<ResultGroup<'a>>),
}

impl<'a> QueryOutcome<'a> {
    pub fn is_idle(&self) -> bool {
        matches!(self, QueryOutcome::Idle)
    }

    pub fn groups(&self) -> &[ResultGroup<'a>] {
        match self {
            QueryOutcome::Idle => &[],
            QueryOutcome::Groups(groups) => groups,
        }
    }
}

/// Run a query against one catalog snapshot.
pub fn query<'a>(index: &'a CatalogIndex, filter: &FilterSpec, sort: &SortSpec) -> QueryOutcome<'a> {
    if filter.is_idle() {
        return QueryOutcome::Idle;
    }

    let term = filter.search_term();
    let mut matching: Vec<&FilmRecord> = index
        .records()
        .iter()
        .filter(|record| filter.matches(term.as_deref(), record))
        .collect();

    // Stable, so equal records keep their catalog order.
    matching.sort_by(|a, b| sort.compare(a, b));

    let groups = group_in_order(matching)
        .into_iter()
        .map(|(key, records)| ResultGroup { key, records })
        .collect();

    QueryOutcome::Groups(groups)
}
