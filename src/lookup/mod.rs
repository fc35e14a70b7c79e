//! Poster and plot enrichment keyed by external identity.

mod cached;
mod omdb;

pub use cached::CachedLookup;
pub use omdb::{OmdbLookup, OMDB_API_BASE};

use crate::source::FetchError;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilmDetails {
    pub poster_url: Option<String>,
    pub plot: Option<String>,
}

impl FilmDetails {
    pub fn is_empty(&self) -> bool {
        self.poster_url.is_none() && self.plot.is_none()
    }
}

#[async_trait]
pub trait FilmLookup: Send + Sync {
    /// Details for one identity. Unknown identities and missing credentials
    /// yield empty details rather than an error.
    async fn lookup(&self, external_id: &str) -> Result<FilmDetails, FetchError>;
}
