use crate::models::{ArtistRef, TrackRef};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Failure kinds a metadata API call can report
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 429; `retry_after` is the server-advised wait in seconds
    #[error("rate limited (retry after {retry_after:?}s)")]
    Throttled { retry_after: Option<u64> },

    #[error("authorization failed ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("resource not found")]
    NotFound,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// The remote metadata operations the discovery pipeline consumes
#[cfg_attr(test, automock)]
pub trait MetadataApi {
    /// Fetch a single artist by canonical id
    fn artist(&self, id: &str) -> Result<ArtistRef, ApiError>;

    /// Search artists; `query` is passed through as the search expression
    fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>, ApiError>;

    /// Fetch several artists at once (at most 50 ids per call)
    fn artists(&self, ids: &[String]) -> Result<Vec<ArtistRef>, ApiError>;

    /// Ids of the artists related to `id`, in the API's order
    fn related_artist_ids(&self, id: &str) -> Result<Vec<String>, ApiError>;

    /// Top tracks for an artist in a market
    fn top_tracks(&self, id: &str, market: &str) -> Result<Vec<TrackRef>, ApiError>;
}
