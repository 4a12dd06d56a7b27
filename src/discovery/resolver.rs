use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::cache::TtlCache;
use super::rate_limit::RateLimitedCaller;
use super::DiscoveryError;
use crate::api::MetadataApi;
use crate::models::ArtistRef;

/// Only the first hit of a name search is used
pub const NAME_SEARCH_LIMIT: u32 = 1;

/// `spotify:artist:<id>` or `open.spotify.com/artist/<id>`
static EMBEDDED_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:spotify:artist:|open\.spotify\.com/artist/)([A-Za-z0-9]+)")
        .expect("embedded artist id regex is valid")
});

/// A bare 22-character base62 Spotify id
static CANONICAL_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{22}$").expect("canonical artist id regex is valid")
});

/// Turns free-form seed text into an artist record
pub struct IdentityResolver;

impl IdentityResolver {
    /// Extract a canonical artist id from a URI, a profile URL or a bare id.
    /// Returns `None` when the input should be treated as a name.
    pub fn extract_artist_id(input: &str) -> Option<&str> {
        if let Some(id) = EMBEDDED_ID_PATTERN
            .captures(input)
            .and_then(|caps| caps.get(1))
        {
            return Some(id.as_str());
        }
        CANONICAL_ID_PATTERN.is_match(input).then_some(input)
    }

    /// Resolve `input` to an artist, consulting `cache` first.
    ///
    /// Ids are looked up directly; anything else goes through an artist-name
    /// search. `Ok(None)` means no artist could be found.
    pub fn resolve<A: MetadataApi>(
        api: &A,
        caller: &RateLimitedCaller,
        cache: &TtlCache<String, ArtistRef>,
        input: &str,
    ) -> Result<Option<ArtistRef>, DiscoveryError> {
        cache.get_or_try_insert_with(input.to_string(), || Self::fetch(api, caller, input))
    }

    fn fetch<A: MetadataApi>(
        api: &A,
        caller: &RateLimitedCaller,
        input: &str,
    ) -> Result<Option<ArtistRef>, DiscoveryError> {
        if let Some(id) = Self::extract_artist_id(input) {
            debug!(id, "resolving seed by id");
            return caller.call("artist", || api.artist(id));
        }

        debug!(name = input, "resolving seed by name search");
        let query = format!("artist:{input}");
        let hits = caller.call("search", || api.search_artists(&query, NAME_SEARCH_LIMIT))?;
        Ok(hits.and_then(|artists| artists.into_iter().next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockMetadataApi};
    use crate::discovery::cache::DEFAULT_CACHE_TTL;
    use mockall::predicate::eq;

    const WEEKND_ID: &str = "1Xyo4u8uXC1ZmMpatF05PJ";

    fn artist(id: &str, name: &str) -> ArtistRef {
        ArtistRef {
            id: id.to_string(),
            name: name.to_string(),
            popularity: Some(90),
            genres: vec![],
            followers: None,
            images: vec![],
            profile_url: None,
        }
    }

    #[test]
    fn test_extracts_id_from_uri() {
        assert_eq!(
            IdentityResolver::extract_artist_id("spotify:artist:1Xyo4u8uXC1ZmMpatF05PJ"),
            Some(WEEKND_ID)
        );
    }

    #[test]
    fn test_extracts_id_from_profile_url() {
        assert_eq!(
            IdentityResolver::extract_artist_id(
                "https://open.spotify.com/artist/1Xyo4u8uXC1ZmMpatF05PJ?si=abc123"
            ),
            Some(WEEKND_ID)
        );
        // Stops at the first non-identifier character
        assert_eq!(
            IdentityResolver::extract_artist_id("open.spotify.com/artist/ab12/"),
            Some("ab12")
        );
    }

    #[test]
    fn test_extraction_is_case_sensitive() {
        assert_eq!(
            IdentityResolver::extract_artist_id("spotify:artist:AbCdEf"),
            Some("AbCdEf")
        );
        assert_eq!(IdentityResolver::extract_artist_id("SPOTIFY:ARTIST:AbCdEf"), None);
    }

    #[test]
    fn test_bare_canonical_id_is_returned_unchanged() {
        assert_eq!(IdentityResolver::extract_artist_id(WEEKND_ID), Some(WEEKND_ID));
    }

    #[test]
    fn test_names_are_not_ids() {
        assert_eq!(IdentityResolver::extract_artist_id("The Weeknd"), None);
        // one character short of canonical length
        assert_eq!(IdentityResolver::extract_artist_id("1Xyo4u8uXC1ZmMpatF05P"), None);
        assert_eq!(IdentityResolver::extract_artist_id("1Xyo4u8uXC1ZmMpatF05PJ "), None);
    }

    #[test]
    fn test_canonical_id_resolves_without_search() {
        let mut api = MockMetadataApi::new();
        api.expect_search_artists().times(0);
        api.expect_artist()
            .with(eq(WEEKND_ID))
            .times(1)
            .returning(|id| Ok(artist(id, "The Weeknd")));
        let cache = TtlCache::new(DEFAULT_CACHE_TTL);

        let resolved =
            IdentityResolver::resolve(&api, &RateLimitedCaller::new(), &cache, WEEKND_ID).unwrap();

        assert_eq!(resolved.unwrap().id, WEEKND_ID);
    }

    #[test]
    fn test_name_search_is_scoped_and_limited() {
        let mut api = MockMetadataApi::new();
        api.expect_artist().times(0);
        api.expect_search_artists()
            .withf(|query, limit| query == "artist:Nils Frahm" && *limit == 1)
            .times(1)
            .returning(|_, _| Ok(vec![artist("nils", "Nils Frahm")]));
        let cache = TtlCache::new(DEFAULT_CACHE_TTL);

        let resolved =
            IdentityResolver::resolve(&api, &RateLimitedCaller::new(), &cache, "Nils Frahm").unwrap();

        assert_eq!(resolved.unwrap().name, "Nils Frahm");
    }

    #[test]
    fn test_empty_search_is_not_found() {
        let mut api = MockMetadataApi::new();
        api.expect_search_artists().returning(|_, _| Ok(vec![]));
        let cache = TtlCache::new(DEFAULT_CACHE_TTL);

        let resolved =
            IdentityResolver::resolve(&api, &RateLimitedCaller::new(), &cache, "zzzqqq").unwrap();

        assert!(resolved.is_none());
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut api = MockMetadataApi::new();
        api.expect_artist().returning(|_| Err(ApiError::NotFound));
        let cache = TtlCache::new(DEFAULT_CACHE_TTL);

        let resolved = IdentityResolver::resolve(
            &api,
            &RateLimitedCaller::new(),
            &cache,
            "spotify:artist:doesnotexist",
        )
        .unwrap();

        assert!(resolved.is_none());
    }

    #[test]
    fn test_repeated_input_is_served_from_cache() {
        let mut api = MockMetadataApi::new();
        api.expect_search_artists()
            .times(1)
            .returning(|_, _| Ok(vec![artist("w", "The Weeknd")]));
        let cache = TtlCache::new(DEFAULT_CACHE_TTL);
        let caller = RateLimitedCaller::new();

        let first = IdentityResolver::resolve(&api, &caller, &cache, "The Weeknd").unwrap();
        let second = IdentityResolver::resolve(&api, &caller, &cache, "The Weeknd").unwrap();

        assert_eq!(first, second);
    }
}
