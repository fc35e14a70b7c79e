//! Canonical film models produced by the record normalizer.
//!
//! Everything past normalization works on these types only; raw column
//! names never leave `normalize.rs`.

use serde::Serialize;
use std::fmt;

/// Placeholder shown for any technical field that could not be parsed.
pub const UNKNOWN_FIELD: &str = "?";

// =============================================================================
// Rating Tiers
// =============================================================================

/// Fixed rating taxonomy derived from the free-text rating code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RatingTier {
    Star4,
    Star3,
    Star2,
    Star1,
    Classic,
    Box,
    Unrated,
}

impl RatingTier {
    /// All tiers in display order.
    pub const ALL: [RatingTier; 7] = [
        RatingTier::Star4,
        RatingTier::Star3,
        RatingTier::Star2,
        RatingTier::Star1,
        RatingTier::Classic,
        RatingTier::Box,
        RatingTier::Unrated,
    ];

    /// Raw codes accepted for this tier, in canonical uppercase form.
    pub fn codes(&self) -> &'static [&'static str] {
        match self {
            RatingTier::Star4 => &["TPR"],
            RatingTier::Star3 => &["AFM", "A-FILM"],
            RatingTier::Star2 => &["BFM", "B-FILM"],
            RatingTier::Star1 => &["CFM", "C-FILM"],
            RatingTier::Classic => &["CLS"],
            RatingTier::Box => &["BOX"],
            RatingTier::Unrated => &[],
        }
    }

    /// Classify a raw rating code. Unknown or empty codes are `Unrated`.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|tier| tier.codes().contains(&code.as_str()))
            .unwrap_or(RatingTier::Unrated)
    }

    /// Parse a tier name as typed by a user (`star4`, `classic`, `4`, ...).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "star4" | "4" | "****" => Some(RatingTier::Star4),
            "star3" | "3" | "***" => Some(RatingTier::Star3),
            "star2" | "2" | "**" => Some(RatingTier::Star2),
            "star1" | "1" | "*" => Some(RatingTier::Star1),
            "classic" | "cls" => Some(RatingTier::Classic),
            "box" => Some(RatingTier::Box),
            "unrated" | "none" => Some(RatingTier::Unrated),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatingTier::Star4 => "****",
            RatingTier::Star3 => "***",
            RatingTier::Star2 => "**",
            RatingTier::Star1 => "*",
            RatingTier::Classic => "Classic",
            RatingTier::Box => "Box",
            RatingTier::Unrated => "Unrated",
        }
    }
}

impl fmt::Display for RatingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Technical Metadata
// =============================================================================

/// Parsed technical-metadata field. Every value falls back to `"?"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TechMeta {
    pub duration_token: String,
    pub resolution: String,
    pub codec: String,
    pub file_name: String,
}

impl Default for TechMeta {
    fn default() -> Self {
        Self {
            duration_token: UNKNOWN_FIELD.to_string(),
            resolution: UNKNOWN_FIELD.to_string(),
            codec: UNKNOWN_FIELD.to_string(),
            file_name: UNKNOWN_FIELD.to_string(),
        }
    }
}

// =============================================================================
// Film Records
// =============================================================================

/// One physical file entry of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilmRecord {
    pub title: String,
    pub year: Option<i32>,
    pub duration_raw: String,
    pub duration_minutes: Option<u32>,
    /// Opaque display date, empty when the film was never seen.
    pub last_seen: String,
    pub external_id: Option<String>,
    pub rating_code: String,
    pub rating_tier: RatingTier,
    pub tech_meta: Option<TechMeta>,
    pub file_size_display: String,
    /// Lower-cased title, used for searching and sorting.
    pub title_key: String,
}

impl FilmRecord {
    pub fn is_seen(&self) -> bool {
        !self.last_seen.trim().is_empty()
    }

    pub fn group_key(&self) -> GroupKey {
        match &self.external_id {
            Some(id) => GroupKey::Identity(id.clone()),
            None => GroupKey::Local {
                title_key: self.title_key.clone(),
                year: self.year,
            },
        }
    }
}

/// Key merging physical files into one logical title.
///
/// Records without an external id fall back to a title+year key so they are
/// still rendered on their own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GroupKey {
    Identity(String),
    Local { title_key: String, year: Option<i32> },
}

impl GroupKey {
    pub fn external_id(&self) -> Option<&str> {
        match self {
            GroupKey::Identity(id) => Some(id),
            GroupKey::Local { .. } => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Identity(id) => f.write_str(id),
            GroupKey::Local { title_key, year } => match year {
                Some(year) => write!(f, "{} ({})", title_key, year),
                None => write!(f, "{} (?)", title_key),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_code_in_the_table() {
        for tier in RatingTier::ALL {
            for code in tier.codes() {
                assert_eq!(RatingTier::from_code(code), tier);
            }
        }
    }

    #[test]
    fn classification_ignores_case_and_whitespace() {
        assert_eq!(RatingTier::from_code("  tpr "), RatingTier::Star4);
        assert_eq!(RatingTier::from_code("a-film"), RatingTier::Star3);
        assert_eq!(RatingTier::from_code("Box"), RatingTier::Box);
    }

    #[test]
    fn unknown_codes_are_unrated() {
        assert_eq!(RatingTier::from_code(""), RatingTier::Unrated);
        assert_eq!(RatingTier::from_code("DFM"), RatingTier::Unrated);
        assert_eq!(RatingTier::from_code("TPRX"), RatingTier::Unrated);
    }

    #[test]
    fn classification_is_stable_on_canonical_codes() {
        for tier in RatingTier::ALL {
            for code in tier.codes() {
                let once = RatingTier::from_code(code);
                let twice = RatingTier::from_code(&code.to_uppercase());
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn parses_tier_names() {
        assert_eq!(RatingTier::from_name("STAR4"), Some(RatingTier::Star4));
        assert_eq!(RatingTier::from_name("classic"), Some(RatingTier::Classic));
        assert_eq!(RatingTier::from_name("2"), Some(RatingTier::Star2));
        assert_eq!(RatingTier::from_name("gold"), None);
    }

    #[test]
    fn group_key_falls_back_to_title_and_year() {
        let record = FilmRecord {
            title: "Rebecca".to_string(),
            year: Some(1940),
            duration_raw: String::new(),
            duration_minutes: None,
            last_seen: String::new(),
            external_id: None,
            rating_code: String::new(),
            rating_tier: RatingTier::Unrated,
            tech_meta: None,
            file_size_display: UNKNOWN_FIELD.to_string(),
            title_key: "rebecca".to_string(),
        };
        assert_eq!(
            record.group_key(),
            GroupKey::Local {
                title_key: "rebecca".to_string(),
                year: Some(1940)
            }
        );
        assert_eq!(record.group_key().to_string(), "rebecca (1940)");
        assert!(!record.is_seen());
    }
}
