//! Shared constants for end-to-end tests
//!
//! When the fixture catalog changes, update only this file and `fixtures.rs`.

// ============================================================================
// Fixture Database
// ============================================================================

/// File name of the fixture database inside its temp dir
pub const FIXTURE_DB_FILE: &str = "films.db";

/// Film table used by the fixture database
pub const FILM_TABLE: &str = "tbl_DBase_Films";

// ============================================================================
// Fixture Titles
// ============================================================================

/// Two physical files of one title, one seen and one not
pub const REBECCA_TITLE: &str = "Rebecca";
pub const REBECCA_ID: &str = "tt0032976";

pub const VERTIGO_TITLE: &str = "Vertigo";
pub const VERTIGO_ID: &str = "tt0052357";

/// No link and no year
pub const BIRDS_TITLE: &str = "The Birds";

pub const HEAT_TITLE: &str = "Heat";
pub const ALIEN_TITLE: &str = "Alien";

/// Physical rows in the fixture table
pub const FIXTURE_ROW_COUNT: usize = 6;
