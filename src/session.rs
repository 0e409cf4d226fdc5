//! One authenticated user's session: the entry point for a presentation layer

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::TokenContext;
use crate::error::{CoreError, Result};
use crate::model::{
    FilterNode, PlaylistCatalog, PlaylistEntry, PlaylistMutator, Queue, SpotifyApi, Track, fetch_all, filter,
};

/// Source of the current time, used for token expiry checks.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct Session {
    api: Arc<dyn SpotifyApi>,
    token: TokenContext,
    clock: Clock,
    catalog: PlaylistCatalog,
    mutator: PlaylistMutator,
    queue: Arc<Mutex<Queue>>,
    device_id: Option<String>,
}

impl Session {
    /// Resolves the current user and builds the catalog from the remote listing.
    pub async fn start(api: Arc<dyn SpotifyApi>, token: TokenContext, device_id: Option<String>) -> Result<Self> {
        Self::start_with_clock(api, token, device_id, Arc::new(Utc::now)).await
    }

    /// Like [`Session::start`], but expiry is judged against `clock`.
    pub async fn start_with_clock(
        api: Arc<dyn SpotifyApi>,
        token: TokenContext,
        device_id: Option<String>,
        clock: Clock,
    ) -> Result<Self> {
        ensure_fresh(&token, clock())?;

        tracing::debug!("API: me");
        let user = api.current_user_id().await;
        crate::log_api_result!("me", user);
        let user_id = user?;

        let catalog = PlaylistCatalog::new();
        catalog.sync(api.as_ref()).await?;
        let playlists = catalog.len().await;
        tracing::info!(user_id = %user_id, playlists, "Session started");

        Ok(Self {
            mutator: PlaylistMutator::new(api.clone(), catalog.clone(), user_id),
            api,
            token,
            clock,
            catalog,
            queue: Arc::new(Mutex::new(Queue::new())),
            device_id,
        })
    }

    pub fn catalog(&self) -> &PlaylistCatalog {
        &self.catalog
    }

    pub async fn playlists(&self) -> Vec<PlaylistEntry> {
        self.catalog.list().await
    }

    /// Rebuilds the catalog from the remote after a partial failure.
    pub async fn resync(&self) -> Result<()> {
        self.ensure_fresh()?;
        self.catalog.sync(self.api.as_ref()).await
    }

    pub async fn fetch_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        self.ensure_fresh()?;
        fetch_all(self.api.as_ref(), &self.catalog, playlist_id).await
    }

    pub fn filter(&self, tracks: &[Track], expr: &FilterNode) -> Result<Vec<Track>> {
        filter(tracks, expr)
    }

    /// Replaces the queue with `track_ids` and starts playing it.
    ///
    /// The queue is left as it was if the play command fails.
    pub async fn play_tracks(&self, track_ids: &[String]) -> Result<Vec<String>> {
        self.ensure_fresh()?;
        let mut queue = self.queue.lock().await;
        let mut next = Queue::new();
        next.replace(track_ids.iter().cloned());
        next.submit(self.api.as_ref(), self.device_id.as_deref()).await?;
        *queue = next;
        Ok(queue.ids().to_vec())
    }

    /// Extends the queue and plays the whole of it again.
    ///
    /// The queue is left as it was if the play command fails.
    pub async fn queue_tracks(&self, track_ids: &[String], allow_duplicates: bool) -> Result<Vec<String>> {
        self.ensure_fresh()?;
        let mut queue = self.queue.lock().await;
        let mut next = queue.clone();
        next.append(track_ids.iter().cloned(), allow_duplicates);
        next.submit(self.api.as_ref(), self.device_id.as_deref()).await?;
        *queue = next;
        Ok(queue.ids().to_vec())
    }

    pub async fn queued(&self) -> Vec<String> {
        self.queue.lock().await.ids().to_vec()
    }

    pub async fn create_playlist(&self, name: &str, public: bool, tracks: &[Track]) -> Result<String> {
        self.ensure_fresh()?;
        self.mutator.create_playlist(name, public, tracks).await
    }

    pub async fn add_to_playlist(&self, playlist_id: &str, tracks: &[Track]) -> Result<()> {
        self.ensure_fresh()?;
        self.mutator.add_to_playlist(playlist_id, tracks).await
    }

    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        self.ensure_fresh()?;
        self.mutator.delete_playlist(playlist_id).await
    }

    pub fn token_age_seconds(&self) -> f64 {
        self.token.age_seconds_at((self.clock)())
    }

    pub fn is_token_expired(&self) -> bool {
        self.token.is_expired_at((self.clock)())
    }

    fn ensure_fresh(&self) -> Result<()> {
        ensure_fresh(&self.token, (self.clock)())
    }
}

fn ensure_fresh(token: &TokenContext, now: DateTime<Utc>) -> Result<()> {
    if token.is_expired_at(now) {
        tracing::warn!(age_seconds = token.age_seconds_at(now), "Access token expired");
        return Err(CoreError::Remote("access token expired".to_string()));
    }
    Ok(())
}
