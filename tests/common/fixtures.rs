//! Test fixture creation for the film database

use super::constants::*;
use anyhow::Result;
use film_catalog::source::LocalFileFetcher;
use film_catalog::{CatalogService, RefreshSettings};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const FULL_SCHEMA: &str = "CREATE TABLE tbl_DBase_Films (
    FILM TEXT,
    JAAR REAL,
    IMDB TEXT,
    BEKEKEN TEXT,
    FILMRATING TEXT,
    DUUR TEXT,
    MEDIAINFO TEXT,
    FILEKEY TEXT
)";

/// Creates a temporary film database with 6 rows covering 5 logical titles.
/// Returns (temp_dir, db_path)
pub fn create_test_film_db() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join(FIXTURE_DB_FILE);
    let conn = Connection::open(&db_path)?;
    conn.execute_batch(FULL_SCHEMA)?;

    let rows: [[Option<&str>; 8]; FIXTURE_ROW_COUNT] = [
        [
            Some(REBECCA_TITLE),
            Some("1940"),
            Some("https://www.imdb.com/title/tt0032976/"),
            Some("12-03-2019"),
            Some("TPR"),
            Some("2:10:00"),
            Some("2:10:00|||1920x1080|AVC|/films/Rebecca (1940).mkv"),
            Some("8123456789*§*tt0032976"),
        ],
        [
            Some(REBECCA_TITLE),
            Some("1940"),
            Some("https://www.imdb.com/title/tt0032976/"),
            None,
            Some("tpr"),
            None,
            Some("2:10:00|||3840x2160|HEVC Main 10@L5.1|/films/uhd/Rebecca (1940) UHD.mkv"),
            Some("31001977235*§*tt0032976"),
        ],
        [
            Some(VERTIGO_TITLE),
            Some("1958"),
            Some("https://www.imdb.com/title/tt0052357/"),
            None,
            Some("A-FILM"),
            Some("2h 8min"),
            None,
            Some("4500000000*§*tt0052357"),
        ],
        [
            Some(BIRDS_TITLE),
            None,
            None,
            None,
            Some("CLS"),
            None,
            None,
            None,
        ],
        [
            Some(HEAT_TITLE),
            Some("1995"),
            Some("https://www.imdb.com/title/tt0113277/"),
            Some("01-01-2020"),
            Some("BOX"),
            Some("170 min"),
            Some("2:50:00|||1920x1080|x265|/films/Heat (1995).mkv"),
            Some("2700000000*§*tt0113277"),
        ],
        [
            Some(ALIEN_TITLE),
            Some("1979"),
            Some("https://www.imdb.com/title/tt0078748/"),
            None,
            Some("XYZ"),
            None,
            None,
            None,
        ],
    ];

    for row in rows {
        conn.execute(
            "INSERT INTO tbl_DBase_Films VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![row[0], row[1], row[2], row[3], row[4], row[5], row[6], row[7]],
        )?;
    }

    Ok((dir, db_path))
}

/// Creates a temporary database whose film table uses the given schema.
pub fn create_db_with_schema(schema: &str) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join(FIXTURE_DB_FILE);
    let conn = Connection::open(&db_path)?;
    conn.execute_batch(schema)?;
    Ok((dir, db_path))
}

/// Catalog service reading `db_path` from disk.
pub fn local_service(db_path: &std::path::Path, ttl: Duration) -> CatalogService {
    CatalogService::new(
        Arc::new(LocalFileFetcher),
        RefreshSettings {
            source: db_path.to_string_lossy().into_owned(),
            table: FILM_TABLE.to_string(),
            ttl,
            fetch_timeout: Duration::from_secs(5),
        },
    )
}
