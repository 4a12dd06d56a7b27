use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::discovery::tracks::DEFAULT_MARKET;

/// Spotify credentials and lookup settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub market: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    spotify: SpotifySection,
}

#[derive(Debug, Deserialize)]
struct SpotifySection {
    client_id: Option<String>,
    client_secret: Option<String>,
    market: Option<String>,
}

impl Config {
    /// Parse a `config.toml` body with a `[spotify]` table
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let file: ConfigFile = toml::from_str(content).context("invalid config file")?;
        let section = file.spotify;
        Ok(Config {
            client_id: require(section.client_id, "spotify.client_id")?,
            client_secret: require(section.client_secret, "spotify.client_secret")?,
            market: section.market.unwrap_or_else(|| DEFAULT_MARKET.to_string()),
        })
    }

    /// Read `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_MARKET`
    pub fn from_env() -> Result<Config> {
        // Load `.env` file if present
        dotenv::dotenv().ok();
        Ok(Config {
            client_id: require(std::env::var("SPOTIFY_CLIENT_ID").ok(), "SPOTIFY_CLIENT_ID")?,
            client_secret: require(
                std::env::var("SPOTIFY_CLIENT_SECRET").ok(),
                "SPOTIFY_CLIENT_SECRET",
            )?,
            market: std::env::var("SPOTIFY_MARKET").unwrap_or_else(|_| DEFAULT_MARKET.to_string()),
        })
    }
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .with_context(|| format!("Spotify credentials not found: set {name}"))
}

/// Load configuration from `path` when it exists, otherwise from `.env` and environment
pub fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        return Config::from_toml_str(&content);
    }
    Config::from_env()
}
