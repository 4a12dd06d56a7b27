use tracing::{debug, info};

use super::batch::{BatchDetailFetcher, DetailCache};
use super::rate_limit::RateLimitedCaller;
use super::DiscoveryError;
use crate::api::MetadataApi;
use crate::models::ArtistRef;

/// Related artists below a popularity threshold, most obscure first.
///
/// Every member has popularity strictly below the threshold it was built
/// with, the sequence is sorted ascending by popularity and it never holds
/// more than the requested count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    artists: Vec<ArtistRef>,
}

impl CandidateSet {
    #[cfg(test)]
    pub fn as_slice(&self) -> &[ArtistRef] {
        &self.artists
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtistRef> {
        self.artists.iter()
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a ArtistRef;
    type IntoIter = std::slice::Iter<'a, ArtistRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.artists.iter()
    }
}

/// Expands a seed artist into lesser-known related artists
pub struct RelationExpander;

impl RelationExpander {
    /// Fetch the seed's related artists, re-fetch their details and rank them.
    ///
    /// No related artists (or a degraded call) yields an empty set.
    pub fn expand<A: MetadataApi>(
        api: &A,
        caller: &RateLimitedCaller,
        details: &DetailCache,
        seed_id: &str,
        count: usize,
        threshold: u8,
    ) -> Result<CandidateSet, DiscoveryError> {
        let related_ids = caller
            .call("related-artists", || api.related_artist_ids(seed_id))?
            .unwrap_or_default();
        if related_ids.is_empty() {
            info!(seed_id, "no related artists");
            return Ok(CandidateSet::default());
        }

        // Popularity in the relation listing may be stale
        let fetched = BatchDetailFetcher::fetch(api, caller, details, &related_ids)?;
        let candidates = Self::rank(fetched, count, threshold);
        info!(
            seed_id,
            related = related_ids.len(),
            kept = candidates.len(),
            threshold,
            "ranked related artists"
        );
        Ok(candidates)
    }

    /// Keep artists with popularity below `threshold`, most obscure first,
    /// ties in input order, at most `count` of them.
    pub fn rank(artists: Vec<ArtistRef>, count: usize, threshold: u8) -> CandidateSet {
        let mut lesser: Vec<ArtistRef> = artists
            .into_iter()
            .filter(|artist| {
                let keep = artist.effective_popularity() < threshold;
                if !keep {
                    debug!(artist = %artist.name, popularity = ?artist.popularity, "too popular");
                }
                keep
            })
            .collect();

        // sort_by_key is stable
        lesser.sort_by_key(ArtistRef::effective_popularity);
        lesser.truncate(count);

        CandidateSet { artists: lesser }
    }
}
