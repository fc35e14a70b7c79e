//! Access to the backing film database.

mod error;
mod fetcher;
mod sqlite_reader;
#[cfg(test)]
pub(crate) mod test_server;

pub use error::{FetchError, ReadError};
pub use fetcher::{
    fetcher_for_source, is_remote_source, validate_sqlite_signature, DatabaseFetcher,
    HttpDatabaseFetcher, LocalFileFetcher, SQLITE_SIGNATURE,
};
pub use sqlite_reader::{read_table, read_table_from_path, DEFAULT_TABLE};
