//! Local mirror of the user's playlists (name, id, track count)

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::remote::SpotifyApi;
use super::types::PlaylistEntry;
use crate::error::{CoreError, Result};

/// Shared handle to the session's playlist catalog.
///
/// Cloning the handle shares the same entries. Writers are serialized by the
/// lock; readers only run while no writer holds it.
#[derive(Clone, Default)]
pub struct PlaylistCatalog {
    entries: Arc<RwLock<Vec<PlaylistEntry>>>,
}

impl PlaylistCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<PlaylistEntry>) -> Result<Self> {
        ensure_unique(&entries)?;
        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Replaces every entry with the remote listing, keeping remote order.
    pub async fn sync(&self, api: &dyn SpotifyApi) -> Result<()> {
        tracing::debug!("API: list_playlists");
        let result = api.list_playlists().await;
        crate::log_api_result!("list_playlists", result);
        let fresh = result?;
        ensure_unique(&fresh)?;

        let mut entries = self.entries.write().await;
        tracing::info!(count = fresh.len(), "Playlist catalog synced");
        *entries = fresh;
        Ok(())
    }

    pub async fn list(&self) -> Vec<PlaylistEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn lookup(&self, id: &str) -> Result<PlaylistEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("playlist {}", id)))
    }

    /// First entry whose name matches, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Option<PlaylistEntry> {
        let name = name.to_lowercase();
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.name.to_lowercase() == name)
            .cloned()
    }

    pub async fn add(&self, entry: PlaylistEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(CoreError::Conflict(format!("playlist {}", entry.id)));
        }
        tracing::debug!(playlist_id = %entry.id, name = %entry.name, "Catalog entry added");
        entries.push(entry);
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> Result<PlaylistEntry> {
        let mut entries = self.entries.write().await;
        let index = entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("playlist {}", id)))?;
        tracing::debug!(playlist_id = id, "Catalog entry removed");
        Ok(entries.remove(index))
    }

    /// Adds `delta` to the stored count and returns the new count.
    ///
    /// The count saturates at `u32::MAX`.
    pub async fn increment_count(&self, id: &str, delta: usize) -> Result<u32> {
        let delta = u32::try_from(delta).unwrap_or(u32::MAX);
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("playlist {}", id)))?;
        entry.track_count = entry.track_count.saturating_add(delta);
        tracing::debug!(playlist_id = id, track_count = entry.track_count, "Catalog count updated");
        Ok(entry.track_count)
    }
}

fn ensure_unique(entries: &[PlaylistEntry]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(CoreError::Conflict(format!("playlist {}", entry.id)));
        }
    }
    Ok(())
}
