//! Reads the film table out of a SQLite database image.

use super::error::ReadError;
use crate::catalog::RawTable;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

pub const DEFAULT_TABLE: &str = "tbl_DBase_Films";

/// Read `table` from an in-memory database image.
///
/// The bytes are staged in a temporary file that lives until the read
/// completes.
pub fn read_table(bytes: &[u8], table: &str) -> Result<RawTable, ReadError> {
    let mut staged = NamedTempFile::new()?;
    staged.write_all(bytes)?;
    staged.flush()?;
    read_table_from_path(staged.path(), table)
}

pub fn read_table_from_path(path: &Path, table: &str) -> Result<RawTable, ReadError> {
    query_table(path, table).map_err(|source| ReadError::Sqlite {
        table: table.to_string(),
        source,
    })
}

fn query_table(path: &Path, table: &str) -> rusqlite::Result<RawTable> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let sql = format!("SELECT * FROM \"{}\"", table.replace('"', "\"\""));
    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let column_count = columns.len();
    let mut raw = RawTable::new(columns);

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let cells = (0..column_count)
            .map(|i| row.get_ref(i).map(value_to_text))
            .collect::<rusqlite::Result<Vec<String>>>()?;
        raw.push_row(cells);
    }

    debug!("Read {} rows from table {}", raw.rows.len(), table);
    Ok(raw)
}

/// Render a cell as text. NULL becomes the empty string and integral REAL
/// values lose their trailing `.0`.
fn value_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}
