//! Endpoint URL builders for the Discogs API.
//!
//! Each page the application renders maps to one upstream endpoint; the
//! builders here own the paths, sort orders, and query encoding so route
//! handlers never assemble URL strings by hand.

use url::Url;

/// API URL for the landing-page feed: trending vinyl releases.
pub fn home(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_path("/database/search");
    url.query_pairs_mut()
        .append_pair("sort", "hot,desc")
        .append_pair("ev", "em_tr")
        .append_pair("year", "2019")
        .append_pair("format", "Vinyl")
        .finish();
    url
}

/// API URL for an artist search.
///
/// `query` is the raw, unencoded search term; encoding happens here.
pub fn artist_search(base: &Url, query: &str, page: u32) -> Url {
    let mut url = base.clone();
    url.set_path("/database/search");
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("type", "artist")
        .append_pair("page", &page.to_string())
        .finish();
    url
}

/// API URL for an artist/act.
pub fn artist(base: &Url, artist_id: u64) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("/artists/{artist_id}"));
    url.set_query(None);
    url
}

/// API URL for an artist's releases, newest first, main roles only.
pub fn artist_releases(base: &Url, artist_id: u64, page: u32) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("/artists/{artist_id}/releases"));
    url.query_pairs_mut()
        .append_pair("sort", "year")
        .append_pair("sort_order", "desc")
        .append_pair("role", "Main")
        .append_pair("page", &page.to_string())
        .finish();
    url
}

/// API URL for a master release.
pub fn master(base: &Url, master_id: u64) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("/masters/{master_id}"));
    url.set_query(None);
    url
}

/// API URL for a release.
pub fn release(base: &Url, release_id: u64) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("/releases/{release_id}"));
    url.set_query(None);
    url
}
