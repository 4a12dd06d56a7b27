use tracing::info;

use super::batch::DetailCache;
use super::cache::{TtlCache, DEFAULT_CACHE_TTL};
use super::rate_limit::RateLimitedCaller;
use super::related::{CandidateSet, RelationExpander};
use super::resolver::IdentityResolver;
use super::tracks::{Playlist, TrackSelector, DEFAULT_TARGET_DURATION_MS};
use super::DiscoveryError;
use crate::api::MetadataApi;
use crate::models::ArtistRef;

/// Everything a successful discovery request produces
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub seed: ArtistRef,
    pub candidates: CandidateSet,
    pub playlist: Playlist,
}

/// Artist discovery and playlist assembly over a metadata API.
///
/// The identity and detail caches are shared by every request served by one
/// `Discovery`.
pub struct Discovery<A: MetadataApi> {
    api: A,
    caller: RateLimitedCaller,
    identities: TtlCache<String, ArtistRef>,
    details: DetailCache,
    market: String,
    target_duration_ms: u64,
}

impl<A: MetadataApi> Discovery<A> {
    pub fn new(api: A, market: impl Into<String>) -> Self {
        Self {
            api,
            caller: RateLimitedCaller::new(),
            identities: TtlCache::new(DEFAULT_CACHE_TTL),
            details: DetailCache::new(DEFAULT_CACHE_TTL),
            market: market.into(),
            target_duration_ms: DEFAULT_TARGET_DURATION_MS,
        }
    }

    pub fn with_target_duration(mut self, target_duration_ms: u64) -> Self {
        self.target_duration_ms = target_duration_ms;
        self
    }

    /// Resolve `seed`, find up to `count` related artists with popularity
    /// below `threshold`, and weave a playlist from their top tracks.
    pub fn discover(
        &self,
        seed: &str,
        count: usize,
        threshold: u8,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let seed_text = seed.trim();
        if seed_text.is_empty() {
            return Err(DiscoveryError::EmptySeed);
        }

        let seed_artist =
            IdentityResolver::resolve(&self.api, &self.caller, &self.identities, seed_text)?
                .ok_or_else(|| DiscoveryError::SeedNotFound {
                    seed: seed_text.to_string(),
                })?;
        info!(seed = %seed_artist.name, popularity = ?seed_artist.popularity, "resolved seed");

        let candidates = RelationExpander::expand(
            &self.api,
            &self.caller,
            &self.details,
            &seed_artist.id,
            count,
            threshold,
        )?;
        if candidates.is_empty() {
            return Err(DiscoveryError::NoObscureRelations {
                seed: seed_artist.name,
            });
        }

        let playlist = TrackSelector::new(self.market.as_str(), self.target_duration_ms).select(
            &self.api,
            &self.caller,
            &seed_artist,
            &candidates,
        )?;
        if playlist.is_empty() {
            return Err(DiscoveryError::NoTracks {
                seed: seed_artist.name,
            });
        }

        Ok(DiscoveryReport {
            seed: seed_artist,
            candidates,
            playlist,
        })
    }
}
