pub mod batch;
pub mod cache;
pub mod links;
pub mod pipeline;
pub mod rate_limit;
pub mod related;
pub mod resolver;
pub mod tracks;

pub use pipeline::*;

use thiserror::Error;

/// Reasons a discovery request ends without a playlist
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Please enter a seed artist.")]
    EmptySeed,

    #[error("No artist found for '{seed}'.")]
    SeedNotFound { seed: String },

    #[error("No lesser-known related artists found for {seed}, try adjusting the threshold.")]
    NoObscureRelations { seed: String },

    #[error("Could not build a playlist for {seed}: no tracks found.")]
    NoTracks { seed: String },

    /// Fatal: credentials were rejected, nothing else is attempted
    #[error("Auth error ({status}): {message}")]
    Unauthorized { status: u16, message: String },
}

impl DiscoveryError {
    /// Whether the request was halted rather than merely coming up empty
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiscoveryError::Unauthorized { .. })
    }
}
