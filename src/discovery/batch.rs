use tracing::debug;

use super::cache::TtlCache;
use super::rate_limit::RateLimitedCaller;
use super::DiscoveryError;
use crate::api::MetadataApi;
use crate::models::ArtistRef;

/// Most ids the batch artist endpoint accepts per request
pub const MAX_BATCH_SIZE: usize = 50;

/// Detail lookups keyed by the exact id chunk that was requested
pub type DetailCache = TtlCache<Vec<String>, Vec<ArtistRef>>;

/// Batch artist detail lookups
pub struct BatchDetailFetcher;

impl BatchDetailFetcher {
    /// Fetch full records for `ids`, one request per chunk of at most
    /// [`MAX_BATCH_SIZE`] ids. Failed chunks and unknown ids are dropped;
    /// results keep chunk order. Chunks already in `cache` are not requested.
    pub fn fetch<A: MetadataApi>(
        api: &A,
        caller: &RateLimitedCaller,
        cache: &DetailCache,
        ids: &[String],
    ) -> Result<Vec<ArtistRef>, DiscoveryError> {
        let mut details = Vec::with_capacity(ids.len());

        for (index, chunk) in ids.chunks(MAX_BATCH_SIZE).enumerate() {
            let fetched = cache.get_or_try_insert_with(chunk.to_vec(), || {
                caller.call("artists", || api.artists(chunk))
            })?;
            match fetched {
                Some(artists) => {
                    debug!(
                        batch = index + 1,
                        requested = chunk.len(),
                        received = artists.len(),
                        "fetched artist details"
                    );
                    details.extend(artists);
                }
                None => debug!(batch = index + 1, requested = chunk.len(), "artist batch dropped"),
            }
        }

        Ok(details)
    }
}
