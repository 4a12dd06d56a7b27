use crate::api::{ApiError, MetadataApi};
use crate::config::Config;
use crate::models::{
    ArtistRef, ArtistsResponse, RelatedArtistsResponse, SearchResponse, SpotifyArtist,
    TokenResponse, TopTracksResponse, TrackRef,
};
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;
use ureq::Agent;
use urlencoding::encode;

const API_BASE_URL: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Tokens are refreshed this long before Spotify says they expire
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A Spotify Web API client using the client-credentials flow
pub struct SpotifyClient {
    agent: Agent,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<(String, Instant)>>,
}

impl SpotifyClient {
    /// Create a new client from loaded credentials
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();

        SpotifyClient {
            agent,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: Mutex::new(None),
        }
    }

    /// Return a valid access token, requesting a new one when needed
    fn access_token(&self) -> Result<String, ApiError> {
        let mut cached = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((token, expires_at)) = cached.as_ref() {
            if Instant::now() < *expires_at {
                return Ok(token.clone());
            }
        }

        debug!("requesting Spotify access token");
        let response = self
            .agent
            .post(TOKEN_URL)
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .map_err(classify_token_error)?;
        let token: TokenResponse = response
            .into_json()
            .map_err(|e| ApiError::Unexpected(format!("failed to parse token response: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        let expires_at = Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some((token.access_token.clone(), expires_at));
        Ok(token.access_token)
    }

    /// Authenticated GET against the Web API, decoding the JSON body
    fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
        let token = self.access_token()?;
        let url = format!("{API_BASE_URL}{path_and_query}");
        debug!(%url, "GET");

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {token}"))
            .call()
            .map_err(classify_error)?;

        response
            .into_json()
            .map_err(|e| ApiError::Unexpected(format!("failed to parse JSON response: {e}")))
    }
}

/// Map a `ureq` failure onto the failure kinds the pipeline distinguishes
fn classify_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(429, response) => ApiError::Throttled {
            retry_after: response
                .header("Retry-After")
                .and_then(|v| v.trim().parse().ok()),
        },
        ureq::Error::Status(status @ (401 | 403), response) => ApiError::Unauthorized {
            status,
            message: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Status(404, _) => ApiError::NotFound,
        ureq::Error::Status(status, response) => ApiError::Api {
            status,
            message: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => ApiError::Unexpected(transport.to_string()),
    }
}

/// The token endpoint answers rejected client credentials with 400 or 401
fn classify_token_error(error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(status @ (400 | 401), response) => ApiError::Unauthorized {
            status,
            message: response.into_string().unwrap_or_default(),
        },
        other => classify_error(other),
    }
}

impl MetadataApi for SpotifyClient {
    fn artist(&self, id: &str) -> Result<ArtistRef, ApiError> {
        let artist: SpotifyArtist = self.get_json(&format!("/artists/{}", encode(id)))?;
        Ok(artist.into())
    }

    fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>, ApiError> {
        let response: SearchResponse = self.get_json(&format!(
            "/search?q={}&type=artist&limit={}",
            encode(query),
            limit
        ))?;
        Ok(response
            .artists
            .map(|page| page.items.into_iter().map(Into::into).collect())
            .unwrap_or_default())
    }

    fn artists(&self, ids: &[String]) -> Result<Vec<ArtistRef>, ApiError> {
        let joined = ids.iter().map(|id| encode(id)).collect::<Vec<_>>().join(",");
        let response: ArtistsResponse = self.get_json(&format!("/artists?ids={joined}"))?;
        // Unknown ids come back as nulls and are dropped
        Ok(response.artists.into_iter().flatten().map(Into::into).collect())
    }

    fn related_artist_ids(&self, id: &str) -> Result<Vec<String>, ApiError> {
        let response: RelatedArtistsResponse =
            self.get_json(&format!("/artists/{}/related-artists", encode(id)))?;
        Ok(response.artists.into_iter().map(|a| a.id).collect())
    }

    fn top_tracks(&self, id: &str, market: &str) -> Result<Vec<TrackRef>, ApiError> {
        let response: TopTracksResponse = self.get_json(&format!(
            "/artists/{}/top-tracks?market={}",
            encode(id),
            encode(market)
        ))?;
        Ok(response.tracks.into_iter().map(Into::into).collect())
    }
}
