//! OMDb API client for poster and plot lookups by IMDb id.

use super::{FilmDetails, FilmLookup};
use crate::source::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const OMDB_API_BASE: &str = "https://www.omdbapi.com/";

pub struct OmdbLookup {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
}

impl OmdbLookup {
    /// Create a client. Without an API key every lookup returns no data.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: base_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

fn meaningful(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("N/A"))
}

fn details_from_response(body: OmdbResponse) -> FilmDetails {
    let found = body
        .response
        .as_deref()
        .map(|r| r.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if !found {
        return FilmDetails::default();
    }
    FilmDetails {
        poster_url: meaningful(body.poster),
        plot: meaningful(body.plot),
    }
}

#[async_trait]
impl FilmLookup for OmdbLookup {
    async fn lookup(&self, external_id: &str) -> Result<FilmDetails, FetchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(FilmDetails::default());
        };

        let url = format!(
            "{}/?i={}&plot=short&apikey={}",
            self.base_url,
            urlencoding::encode(external_id),
            urlencoding::encode(api_key)
        );

        debug!("Looking up details for {}", external_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&self.base_url, self.timeout, e))?;

        if response.status().as_u16() == 401 {
            warn!("OMDb rejected the configured API key");
            return Ok(FilmDetails::default());
        }
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: self.base_url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body: OmdbResponse =
            response
                .json()
                .await
                .map_err(|e| FetchError::InvalidResponse {
                    url: self.base_url.clone(),
                    message: e.to_string(),
                })?;

        Ok(details_from_response(body))
    }
}
