use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod client;
mod config;
mod discovery;
mod models;


use crate::client::SpotifyClient;
use crate::config::load_config;
use crate::discovery::links::{playlist_links, track_links};
use crate::discovery::{Discovery, DiscoveryReport};

#[derive(Parser)]
#[command(name = "tuneweaver")]
#[command(about = "Discover lesser-known artists related to your favorites and weave a ~1-hour playlist")]
#[command(version)]
struct Args {
    /// Artist name, Spotify URI or profile URL (e.g. spotify:artist:1Xyo4u8uXC1ZmMpatF05PJ or "The Weeknd")
    seed: String,

    /// Number of artist suggestions
    #[arg(short = 'n', long = "count", default_value_t = 10, value_parser = clap::value_parser!(u8).range(5..=20))]
    count: u8,

    /// Max popularity (lower = more obscure artists)
    #[arg(short = 'p', long = "max-popularity", default_value_t = 60, value_parser = clap::value_parser!(u8).range(0..=100))]
    max_popularity: u8,

    /// Target playlist length in minutes
    #[arg(short = 'm', long = "minutes", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    minutes: u64,

    /// Path to a TOML file with a [spotify] table; falls back to environment variables
    #[arg(short = 'c', long = "config", default_value = "config.toml")]
    config_file: String,

    /// Quiet mode - only log warnings and errors
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args.config_file)?;
    let discovery = Discovery::new(SpotifyClient::new(&config), config.market.clone())
        .with_target_duration(args.minutes * 60 * 1000);

    println!("Building your playlist...");
    match discovery.discover(&args.seed, usize::from(args.count), args.max_popularity) {
        Ok(report) => {
            render(&report);
            Ok(())
        }
        Err(e) if e.is_fatal() => {
            eprintln!("✗ {e}");
            Err(anyhow::anyhow!("Discovery halted: {}", e))
        }
        Err(e) => {
            println!("⚠ {e}");
            Ok(())
        }
    }
}

fn render(report: &DiscoveryReport) {
    let seed = &report.seed;
    println!(
        "\n✓ Seed: {} (Pop: {})",
        seed.name,
        seed.popularity
            .map(|p| p.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );

    println!("\nSuggested Artists");
    println!("=================");
    for artist in &report.candidates {
        let genres = artist
            .genres
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let followers = artist
            .followers
            .map(|f| f.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        println!("- {} (Pop: {})", artist.name, artist.effective_popularity());
        println!("  Genres: {genres} | Followers: {followers}");
        if let Some(url) = &artist.profile_url {
            println!("  Open on Spotify: {url}");
        }
        if let Some(image) = artist.thumbnail() {
            println!("  Image: {}", image.url);
        }
    }

    let playlist = &report.playlist;
    println!("\n🎶 Your Playlist (~{} minutes)", playlist.total_minutes());
    for (i, track) in playlist.tracks().iter().enumerate() {
        let seconds = track.duration_ms / 1000;
        println!(
            "{}. {} by {} ({:02}:{:02})",
            i + 1,
            track.name,
            track.artist,
            seconds / 60,
            seconds % 60
        );
        let links = track_links(&track.name, &track.artist)
            .into_iter()
            .map(|link| format!("{}: {}", link.service, link.url))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("   {links}");
    }

    println!("\n🔗 Search Full Playlist");
    for link in playlist_links(playlist.tracks()) {
        println!("- {}: {}", link.service, link.url);
    }
}
