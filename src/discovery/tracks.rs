use tracing::{debug, info};

use super::rate_limit::RateLimitedCaller;
use super::DiscoveryError;
use crate::api::MetadataApi;
use crate::models::{ArtistRef, TrackRef};

/// Roughly one hour of music
pub const DEFAULT_TARGET_DURATION_MS: u64 = 60 * 60 * 1000;

/// Top tracks pulled per artist
pub const TRACKS_PER_ARTIST: usize = 2;

/// Default market for top-track lookups
pub const DEFAULT_MARKET: &str = "BE";

/// Ordered tracks with their running total duration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tracks: Vec<TrackRef>,
    total_duration_ms: u64,
}

impl Playlist {
    pub fn push(&mut self, track: TrackRef) {
        self.total_duration_ms += track.duration_ms;
        self.tracks.push(track);
    }

    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Total length in whole minutes, rounded up
    pub fn total_minutes(&self) -> u64 {
        self.total_duration_ms.div_ceil(60_000)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Greedy duration-bounded track packing
pub struct TrackSelector {
    market: String,
    target_duration_ms: u64,
}

impl TrackSelector {
    pub fn new(market: impl Into<String>, target_duration_ms: u64) -> Self {
        Self {
            market: market.into(),
            target_duration_ms,
        }
    }

    /// Build a playlist from the seed's top tracks, then each candidate's in
    /// rank order.
    ///
    /// The target is checked before every append, so the last accepted track
    /// may push the total past it.
    pub fn select<'a, A, I>(
        &self,
        api: &A,
        caller: &RateLimitedCaller,
        seed: &ArtistRef,
        candidates: I,
    ) -> Result<Playlist, DiscoveryError>
    where
        A: MetadataApi,
        I: IntoIterator<Item = &'a ArtistRef>,
    {
        let mut playlist = Playlist::default();

        self.append_top_tracks(api, caller, seed, &mut playlist)?;

        for artist in candidates {
            if self.target_reached(&playlist) {
                break;
            }
            self.append_top_tracks(api, caller, artist, &mut playlist)?;
        }

        info!(
            tracks = playlist.len(),
            total_ms = playlist.total_duration_ms(),
            target_ms = self.target_duration_ms,
            "assembled playlist"
        );
        Ok(playlist)
    }

    fn append_top_tracks<A: MetadataApi>(
        &self,
        api: &A,
        caller: &RateLimitedCaller,
        artist: &ArtistRef,
        playlist: &mut Playlist,
    ) -> Result<(), DiscoveryError> {
        let tracks = caller
            .call("top-tracks", || api.top_tracks(&artist.id, &self.market))?
            .unwrap_or_default();
        if tracks.is_empty() {
            debug!(artist = %artist.name, "no top tracks");
        }

        for track in tracks.into_iter().take(TRACKS_PER_ARTIST) {
            if self.target_reached(playlist) {
                break;
            }
            playlist.push(TrackRef {
                artist: artist.name.clone(),
                ..track
            });
        }
        Ok(())
    }

    fn target_reached(&self, playlist: &Playlist) -> bool {
        playlist.total_duration_ms() >= self.target_duration_ms
    }
}

impl Default for TrackSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MARKET, DEFAULT_TARGET_DURATION_MS)
    }
}
