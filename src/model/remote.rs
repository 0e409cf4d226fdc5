//! Seam between the core and whatever talks to the remote service

use async_trait::async_trait;

use super::types::{PlaylistEntry, Track};
use crate::error::Result;

/// Items per page when listing a playlist's tracks. Fixed by the remote.
pub const PAGE_SIZE: u32 = 100;

/// Every remote call the core issues. Implementations own authorization,
/// transport and retries; the core only sees success or `CoreError::Remote`.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user_id(&self) -> Result<String>;

    /// All of the user's playlists, every page, in remote order.
    async fn list_playlists(&self) -> Result<Vec<PlaylistEntry>>;

    /// One page of a playlist's tracks. Items that are not tracks or have no id are dropped.
    async fn playlist_tracks_page(&self, playlist_id: &str, offset: u32, limit: u32) -> Result<Vec<Track>>;

    /// Starts playback of exactly these URIs.
    async fn play(&self, uris: &[String], device_id: Option<&str>) -> Result<()>;

    /// Returns the id of the new playlist.
    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String>;

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<()>;

    async fn unfollow_playlist(&self, playlist_id: &str) -> Result<()>;
}
