//! Paginated retrieval of a playlist's tracks

use std::collections::HashSet;

use futures::{StreamExt, TryStreamExt, stream};

use super::catalog::PlaylistCatalog;
use super::remote::{PAGE_SIZE, SpotifyApi};
use super::types::Track;
use crate::error::Result;

/// Page requests allowed in flight at once. The remote rate-limits bursts
/// and the transport does not retry, so this stays small.
pub const MAX_CONCURRENT_PAGES: usize = 4;

/// Number of page requests needed to cover `track_count` items.
pub fn page_count(track_count: u32) -> u32 {
    track_count.div_ceil(PAGE_SIZE)
}

/// Fetches every track of a catalog playlist, one request per page.
///
/// The page count comes from the catalog's last known track count, not from
/// the remote. Tracks are deduplicated by id and come back in first-seen
/// order. At most [`MAX_CONCURRENT_PAGES`] requests run at once, and any
/// failed page fails the whole fetch.
pub async fn fetch_all(api: &dyn SpotifyApi, catalog: &PlaylistCatalog, playlist_id: &str) -> Result<Vec<Track>> {
    // Page count comes from the catalog, so a stale count reads a prefix only
    let entry = catalog.lookup(playlist_id).await?;
    let pages = page_count(entry.track_count);
    tracing::debug!(playlist_id, track_count = entry.track_count, pages, "API: playlist_tracks");

    // `buffered` yields pages in request order; the first error stops the stream
    let result: Result<Vec<Vec<Track>>> = stream::iter(0..pages)
        .map(|page| api.playlist_tracks_page(playlist_id, page * PAGE_SIZE, PAGE_SIZE))
        .buffered(MAX_CONCURRENT_PAGES)
        .try_collect()
        .await;
    crate::log_api_result!("playlist_tracks", result);

    // Flatten pages, then drop repeated ids
    let tracks = dedup_tracks(result?.into_iter().flatten());
    tracing::info!(playlist_id, count = tracks.len(), "Fetched playlist tracks");
    Ok(tracks)
}

/// Keeps the first track seen for each id.
pub fn dedup_tracks(tracks: impl IntoIterator<Item = Track>) -> Vec<Track> {
    let mut seen = HashSet::new();
    tracks
        .into_iter()
        .filter(|track| seen.insert(track.id.clone()))
        .collect()
}
