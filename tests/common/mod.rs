//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{create_test_film_db, local_service};
//! use std::time::Duration;
//!
//! #[tokio::test]
//! async fn test_load_catalog() {
//!     let (_dir, db_path) = create_test_film_db().unwrap();
//!     let service = local_service(&db_path, Duration::from_secs(600));
//!     let index = service.snapshot().await.unwrap();
//!     assert!(!index.is_empty());
//! }
//! ```

mod constants;
mod fixtures;

// Public API - this is what tests import
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{create_db_with_schema, create_test_film_db, local_service};
