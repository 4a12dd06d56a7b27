use serde::Deserialize;

/// Popularity assumed for artists whose record carries no score
pub const MAX_POPULARITY: u8 = 100;

/// An artist record as fetched from the metadata API
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
    pub popularity: Option<u8>, // 0-100, lower = more obscure
    pub genres: Vec<String>,
    pub followers: Option<u64>,
    pub images: Vec<ImageRef>, // source order preserved
    pub profile_url: Option<String>,
}

impl ArtistRef {
    /// Popularity used for ranking; a missing score counts as the maximum
    pub fn effective_popularity(&self) -> u8 {
        self.popularity.unwrap_or(MAX_POPULARITY)
    }

    /// The last image in source order (the smallest one for Spotify)
    pub fn thumbnail(&self) -> Option<&ImageRef> {
        self.images.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A single track picked for the playlist
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRef {
    pub name: String,
    pub duration_ms: u64,
    pub artist: String, // display name of the owning artist
}

/// Artist object of the Spotify Web API
#[derive(Debug, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    pub popularity: Option<u8>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub followers: Option<SpotifyFollowers>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
    #[serde(default)]
    pub external_urls: SpotifyExternalUrls,
}

#[derive(Debug, Deserialize)]
pub struct SpotifyFollowers {
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpotifyExternalUrls {
    pub spotify: Option<String>,
}

impl From<SpotifyArtist> for ArtistRef {
    fn from(artist: SpotifyArtist) -> Self {
        ArtistRef {
            id: artist.id,
            name: artist.name,
            popularity: artist.popularity,
            genres: artist.genres,
            followers: artist.followers.and_then(|f| f.total),
            images: artist
                .images
                .into_iter()
                .map(|image| ImageRef {
                    url: image.url,
                    width: image.width,
                    height: image.height,
                })
                .collect(),
            profile_url: artist.external_urls.spotify,
        }
    }
}

/// Response structure for `GET /v1/artists?ids=...`
#[derive(Debug, Deserialize)]
pub struct ArtistsResponse {
    /// Unknown ids come back as `null`
    pub artists: Vec<Option<SpotifyArtist>>,
}

/// Response structure for `GET /v1/search?type=artist`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub artists: Option<ArtistPage>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistPage {
    #[serde(default)]
    pub items: Vec<SpotifyArtist>,
}

/// Response structure for `GET /v1/artists/{id}/related-artists`
#[derive(Debug, Deserialize)]
pub struct RelatedArtistsResponse {
    #[serde(default)]
    pub artists: Vec<RelatedArtist>,
}

/// Only the id of a related artist is used; details are re-fetched
#[derive(Debug, Deserialize)]
pub struct RelatedArtist {
    pub id: String,
}

/// Response structure for `GET /v1/artists/{id}/top-tracks`
#[derive(Debug, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

impl From<SpotifyTrack> for TrackRef {
    fn from(track: SpotifyTrack) -> Self {
        let artist = track
            .artists
            .into_iter()
            .next()
            .map(|a| a.name)
            .unwrap_or_else(|| "Unknown".to_string());
        TrackRef {
            name: track.name,
            duration_ms: track.duration_ms,
            artist,
        }
    }
}

/// Response structure for the client-credentials token call
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<u64>,
}
