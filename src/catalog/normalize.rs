//! Record normalizer: raw table rows to `FilmRecord`.
//!
//! Column names vary between exports of the film database, so they are
//! resolved once per table through a synonym table. Past this module only the
//! canonical `FilmRecord` is used.

use super::error::CatalogError;
use super::parse::{
    classify_rating, extract_external_id, format_file_size, parse_duration, parse_tech_meta,
    parse_year,
};
use super::record::FilmRecord;
use tracing::debug;

/// A table as read from the backing store, every cell rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Year,
    Link,
    Seen,
    Rating,
    Duration,
    Tech,
    CompoundId,
}

impl Field {
    fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Year => "year",
            Field::Link => "link",
            Field::Seen => "seen",
            Field::Rating => "rating",
            Field::Duration => "duration",
            Field::Tech => "tech",
            Field::CompoundId => "compound id",
        }
    }

    /// Accepted column names, in order of preference.
    fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Field::Title => &["FILM", "TITLE", "TITEL"],
            Field::Year => &["JAAR", "YEAR"],
            Field::Link => &["IMDB", "IMDBLINK", "IMDB_LINK", "LINK", "URL"],
            Field::Seen => &["BEKEKEN", "GEZIEN", "WATCHED"],
            Field::Rating => &["FILMRATING", "RATING", "CLASS", "TYPE", "CAT"],
            Field::Duration => &["DUUR", "DURATION", "SPEELDUUR", "LENGTH"],
            Field::Tech => &["MEDIAINFO", "TECHINFO", "TECH", "INFO"],
            Field::CompoundId => &["FILEKEY", "BESTANDSID", "SIZEKEY", "FILEID"],
        }
    }

    fn locate(&self, columns: &[String]) -> Option<usize> {
        self.synonyms().iter().find_map(|synonym| {
            columns
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(synonym))
        })
    }

    fn require(&self, columns: &[String]) -> Result<usize, CatalogError> {
        self.locate(columns)
            .ok_or_else(|| CatalogError::MissingColumn {
                field: self.name(),
                accepted: self.synonyms().join(", "),
            })
    }
}

/// Column positions of the canonical fields within one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    title: usize,
    year: usize,
    link: usize,
    seen: Option<usize>,
    rating: Option<usize>,
    duration: Option<usize>,
    tech: Option<usize>,
    compound_id: Option<usize>,
}

impl ColumnMap {
    /// Resolve the column layout of a table.
    ///
    /// Fails when the title, year or link column is missing; the remaining
    /// columns are optional and read as empty text when absent.
    pub fn resolve(columns: &[String]) -> Result<Self, CatalogError> {
        let map = ColumnMap {
            title: Field::Title.require(columns)?,
            year: Field::Year.require(columns)?,
            link: Field::Link.require(columns)?,
            seen: Field::Seen.locate(columns),
            rating: Field::Rating.locate(columns),
            duration: Field::Duration.locate(columns),
            tech: Field::Tech.locate(columns),
            compound_id: Field::CompoundId.locate(columns),
        };
        debug!("Resolved catalog columns: {:?}", map);
        Ok(map)
    }

    /// Build the canonical record for one row.
    pub fn normalize(&self, row: &[String]) -> FilmRecord {
        let cell = |idx: Option<usize>| cell_text(row, idx);

        let title = cell(Some(self.title)).to_string();
        let external_id = extract_external_id(cell(Some(self.link)));
        let title_key = title.to_lowercase();
        let rating_code = cell(self.rating).to_uppercase();
        let rating_tier = classify_rating(&rating_code);

        let duration_raw = cell(self.duration).to_string();
        let tech_raw = cell(self.tech);
        let tech_meta = if tech_raw.is_empty() {
            None
        } else {
            Some(parse_tech_meta(tech_raw))
        };
        let duration_minutes = parse_duration(&duration_raw).or_else(|| {
            tech_meta
                .as_ref()
                .and_then(|meta| parse_duration(&meta.duration_token))
        });

        FilmRecord {
            title,
            year: parse_year(cell(Some(self.year))),
            duration_raw,
            duration_minutes,
            last_seen: cell(self.seen).to_string(),
            external_id,
            rating_code,
            rating_tier,
            tech_meta,
            file_size_display: format_file_size(cell(self.compound_id)),
            title_key,
        }
    }
}

fn cell_text(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim())
        .unwrap_or_default()
}

/// Normalize every row of a table.
pub fn normalize_table(table: &RawTable) -> Result<Vec<FilmRecord>, CatalogError> {
    let columns = ColumnMap::resolve(&table.columns)?;
    Ok(table.rows.iter().map(|row| columns.normalize(row)).collect())
}
