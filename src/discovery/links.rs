use urlencoding::encode;

use crate::models::TrackRef;

/// Tracks named in a full-playlist search query
pub const PLAYLIST_SEARCH_TRACKS: usize = 4;

/// A search URL on an external streaming service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLink {
    pub service: &'static str,
    pub url: String,
}

// (service, url prefix); the query is appended verbatim
const SPOTIFY: (&str, &str) = ("Spotify", "https://open.spotify.com/search/");
const APPLE_MUSIC: (&str, &str) = ("Apple Music", "https://music.apple.com/us/search?term=");
const DEEZER: (&str, &str) = ("Deezer", "https://www.deezer.com/search/");
const YOUTUBE_MUSIC: (&str, &str) = ("YouTube Music", "https://music.youtube.com/search?q=");

const TRACK_SERVICES: [(&str, &str); 4] = [SPOTIFY, APPLE_MUSIC, DEEZER, YOUTUBE_MUSIC];
const PLAYLIST_SERVICES: [(&str, &str); 3] = [SPOTIFY, APPLE_MUSIC, DEEZER];

/// Form-style encoding: spaces become `+`, everything else outside
/// `A-Za-z0-9-_.~` is percent-encoded
fn encode_query(phrase: &str) -> String {
    encode(phrase).replace("%20", "+")
}

fn build_links(services: &[(&'static str, &str)], phrase: &str) -> Vec<ServiceLink> {
    let query = encode_query(phrase);
    services
        .iter()
        .map(|&(service, prefix)| ServiceLink {
            service,
            url: format!("{prefix}{query}"),
        })
        .collect()
}

/// Search links for one track on every supported service
pub fn track_links(track_name: &str, artist_name: &str) -> Vec<ServiceLink> {
    build_links(&TRACK_SERVICES, &format!("{track_name} {artist_name}"))
}

/// Search links naming the first few tracks of a playlist.
/// YouTube Music is left out; an empty list yields no links.
pub fn playlist_links(tracks: &[TrackRef]) -> Vec<ServiceLink> {
    if tracks.is_empty() {
        return Vec::new();
    }
    let phrase = tracks
        .iter()
        .take(PLAYLIST_SEARCH_TRACKS)
        .map(|t| format!("{} {}", t.name, t.artist))
        .collect::<Vec<_>>()
        .join(", ");
    build_links(&PLAYLIST_SERVICES, &phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(name: &str, artist: &str) -> TrackRef {
        TrackRef {
            name: name.to_string(),
            duration_ms: 180_000,
            artist: artist.to_string(),
        }
    }

    #[test]
    fn test_track_links_cover_four_services_in_order() {
        let links = track_links("Blinding Lights", "The Weeknd");

        let services: Vec<_> = links.iter().map(|l| l.service).collect();
        assert_eq!(services, vec!["Spotify", "Apple Music", "Deezer", "YouTube Music"]);
        assert_eq!(links[0].url, "https://open.spotify.com/search/Blinding+Lights+The+Weeknd");
        assert_eq!(
            links[1].url,
            "https://music.apple.com/us/search?term=Blinding+Lights+The+Weeknd"
        );
        assert_eq!(links[2].url, "https://www.deezer.com/search/Blinding+Lights+The+Weeknd");
        assert_eq!(
            links[3].url,
            "https://music.youtube.com/search?q=Blinding+Lights+The+Weeknd"
        );
    }

    #[test]
    fn test_special_characters_are_percent_encoded() {
        let links = track_links("Rock & Roll/Part 2", "Sigur Rós");

        assert_eq!(
            links[0].url,
            "https://open.spotify.com/search/Rock+%26+Roll%2FPart+2+Sigur+R%C3%B3s"
        );
    }

    #[test]
    fn test_links_are_deterministic() {
        assert_eq!(track_links("a", "b"), track_links("a", "b"));
    }

    #[test]
    fn test_playlist_links_omit_youtube_and_cap_tracks() {
        let tracks = vec![
            track("One", "A"),
            track("Two", "B"),
            track("Three", "C"),
            track("Four", "D"),
            track("Five", "E"),
        ];

        let links = playlist_links(&tracks);

        let services: Vec<_> = links.iter().map(|l| l.service).collect();
        assert_eq!(services, vec!["Spotify", "Apple Music", "Deezer"]);
        assert_eq!(
            links[2].url,
            "https://www.deezer.com/search/One+A%2C+Two+B%2C+Three+C%2C+Four+D"
        );
        assert!(links.iter().all(|l| !l.url.contains("Five")));
    }

    #[test]
    fn test_playlist_links_for_short_list() {
        let links = playlist_links(&[track("Solo", "Artist")]);

        assert_eq!(links.len(), 3);
        assert_eq!(links[0].url, "https://open.spotify.com/search/Solo+Artist");
    }

    #[test]
    fn test_empty_playlist_has_no_links() {
        assert!(playlist_links(&[]).is_empty());
    }
}
