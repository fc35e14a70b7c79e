//! Immutable catalog snapshot built once per data refresh.

use super::error::CatalogError;
use super::normalize::{normalize_table, RawTable};
use super::record::{FilmRecord, GroupKey, RatingTier};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

/// Normalized records in the order they were read from the source.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    records: Vec<FilmRecord>,
}

impl CatalogIndex {
    /// Normalize a raw table and build the index from it.
    pub fn build(table: &RawTable) -> Result<Self, CatalogError> {
        let records = normalize_table(table)?;
        let index = Self::from_records(records);
        info!(
            "Catalog index built: {} files, {} titles",
            index.len(),
            index.groups().len()
        );
        Ok(index)
    }

    pub fn from_records(records: Vec<FilmRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FilmRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Group records by identity, keeping arrival order both between groups
    /// and inside each group.
    pub fn groups(&self) -> Vec<(GroupKey, Vec<&FilmRecord>)> {
        group_in_order(self.records.iter())
    }

    /// Number of distinct titles per tier.
    ///
    /// A title stored as several files counts once. Every tier is present in
    /// the result, with zero when nothing matches.
    pub fn badge_counts(&self) -> BTreeMap<RatingTier, usize> {
        let mut seen: HashSet<(RatingTier, GroupKey)> = HashSet::new();
        let mut counts: BTreeMap<RatingTier, usize> =
            RatingTier::ALL.iter().map(|tier| (*tier, 0)).collect();

        for record in &self.records {
            if seen.insert((record.rating_tier, record.group_key())) {
                *counts.entry(record.rating_tier).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Stable partition of a record sequence by group key.
///
/// Groups appear in order of their first member; members keep their
/// relative order.
pub(crate) fn group_in_order<'a, I>(records: I) -> Vec<(GroupKey, Vec<&'a FilmRecord>)>
where
    I: IntoIterator<Item = &'a FilmRecord>,
{
    let mut positions: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Vec<&'a FilmRecord>)> = Vec::new();

    for record in records {
        let key = record.group_key();
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(record),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![record]));
            }
        }
    }
    groups
}
