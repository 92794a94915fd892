//! Recoverable failures. Neither of these ever aborts a run.

use thiserror::Error;

/// A page could not be retrieved; the caller skips the page or record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// An address could not be resolved; the record keeps no coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder responded with status {0}")]
    Status(String),

    #[error("geocoder returned no coordinates")]
    NoResults,

    #[error("geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),
}
