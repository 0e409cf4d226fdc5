//! Remote playlist mutations that keep the catalog in step
//!
//! Each operation makes its remote call first and updates the catalog only
//! after the call succeeds. Nothing is rolled back: if the process stops
//! between the two steps, or a later remote step fails, the catalog may be
//! stale until the next [`PlaylistCatalog::sync`].

use std::sync::Arc;

use super::catalog::PlaylistCatalog;
use super::remote::SpotifyApi;
use super::types::{PlaylistEntry, Track};
use crate::error::Result;

/// The remote rejects more than this many items per add request.
pub const MAX_ITEMS_PER_ADD: usize = 100;

#[derive(Clone)]
pub struct PlaylistMutator {
    api: Arc<dyn SpotifyApi>,
    catalog: PlaylistCatalog,
    user_id: String,
}

impl PlaylistMutator {
    pub fn new(api: Arc<dyn SpotifyApi>, catalog: PlaylistCatalog, user_id: impl Into<String>) -> Self {
        Self {
            api,
            catalog,
            user_id: user_id.into(),
        }
    }

    /// Creates the playlist remotely, registers it with a count of zero, then adds `tracks`.
    pub async fn create_playlist(&self, name: &str, public: bool, tracks: &[Track]) -> Result<String> {
        tracing::debug!(name, public, "API: user_playlist_create");
        let result = self.api.create_playlist(&self.user_id, name, public).await;
        crate::log_api_result!("user_playlist_create", result);
        let id = result?;

        // Register the empty playlist first so the add below can find it
        self.catalog.add(PlaylistEntry::new(name, id.clone(), 0)).await?;
        self.add_to_playlist(&id, tracks).await?;
        Ok(id)
    }

    /// Adds `tracks` (duplicates included) and bumps the stored count by `tracks.len()`.
    pub async fn add_to_playlist(&self, playlist_id: &str, tracks: &[Track]) -> Result<()> {
        // Unknown ids fail here, before anything reaches the remote
        self.catalog.lookup(playlist_id).await?;

        // The remote caps each add request, so send the uris in order, chunk by chunk.
        // A failed chunk stops here; earlier chunks stay on the remote.
        let uris: Vec<String> = tracks.iter().map(Track::uri).collect();
        for chunk in uris.chunks(MAX_ITEMS_PER_ADD) {
            tracing::debug!(playlist_id, items = chunk.len(), "API: playlist_add_items");
            let result = self.api.add_tracks(playlist_id, chunk).await;
            crate::log_api_result!("playlist_add_items", result);
            result?;
        }

        // Count every track sent, duplicates included
        self.catalog.increment_count(playlist_id, tracks.len()).await?;
        Ok(())
    }

    /// Unfollows the playlist remotely and drops it from the catalog.
    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        self.catalog.lookup(playlist_id).await?;

        tracing::debug!(playlist_id, "API: playlist_unfollow");
        let result = self.api.unfollow_playlist(playlist_id).await;
        crate::log_api_result!("playlist_unfollow", result);
        result?;

        // Only forget the playlist once the remote has let go of it
        self.catalog.remove(playlist_id).await?;
        Ok(())
    }
}
