//! rspotify-backed implementation of [`SpotifyApi`]

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use rspotify::{
    AuthCodeSpotify, Config,
    model::{PlayableId, PlayableItem, PlaylistId, PlaylistItem, SimplifiedPlaylist, TrackId, UserId},
    prelude::*,
};

use super::remote::SpotifyApi;
use super::types::{PlaylistEntry, Track, URI_SCHEME};
use crate::auth::TokenContext;
use crate::error::{CoreError, Result};

/// Spotify Web API client authorized with a bearer token we were handed.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Arc<AuthCodeSpotify>,
}

impl SpotifyClient {
    pub async fn new(token: &TokenContext) -> Result<Self> {
        // No credentials or OAuth settings: the token is supplied from outside,
        // and rspotify must neither cache nor refresh it
        let spotify = AuthCodeSpotify::with_config(
            Default::default(),
            Default::default(),
            Config {
                token_cached: false,
                token_refreshing: false,
                ..Default::default()
            },
        );

        // Install the token; the lock guard is dropped before the client moves
        {
            let mut slot = spotify
                .token
                .lock()
                .await
                .map_err(|_| CoreError::Remote("rspotify token lock poisoned".to_string()))?;
            *slot = Some(token.to_rspotify_token());
        }
        tracing::debug!("rspotify client initialized");

        Ok(Self {
            client: Arc::new(spotify),
        })
    }
}

/// Strips a `spotify:track:` prefix if present.
fn bare_track_id(uri: &str) -> &str {
    uri.strip_prefix(URI_SCHEME)
        .and_then(|rest| rest.strip_prefix(":track:"))
        .unwrap_or(uri)
}

fn playable_ids(uris: &[String]) -> Result<Vec<PlayableId<'static>>> {
    uris.iter()
        .map(|uri| {
            TrackId::from_id(bare_track_id(uri).to_string())
                .map(PlayableId::Track)
                .map_err(|e| CoreError::Remote(format!("invalid track id {}: {}", uri, e)))
        })
        .collect()
}

fn playlist_id(id: &str) -> Result<PlaylistId<'static>> {
    PlaylistId::from_id(id.to_string()).map_err(|e| CoreError::Remote(format!("invalid playlist id {}: {}", id, e)))
}

fn playlist_entry(playlist: SimplifiedPlaylist) -> PlaylistEntry {
    // `tracks.total` is the remote's count at listing time
    PlaylistEntry::new(playlist.name, playlist.id.id(), playlist.tracks.total)
}

/// Keeps tracks with an id; local files and episodes are skipped.
fn parse_item(item: PlaylistItem) -> Option<Track> {
    match item.track {
        Some(PlayableItem::Track(track)) => {
            // Local files come back as tracks without an id
            let id = track.id.as_ref()?.id().to_string();
            // Artist order follows the remote's credit order
            let artists = track.artists.into_iter().map(|a| a.name).collect();
            Some(Track::new(track.name, artists, id))
        }
        // Episodes, unparseable items and removed tracks (null)
        _ => None,
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn current_user_id(&self) -> Result<String> {
        // Needed as the owner when creating playlists
        let user = self.client.me().await?;
        Ok(user.id.id().to_string())
    }

    async fn list_playlists(&self) -> Result<Vec<PlaylistEntry>> {
        // The paginator walks every page; collect them all before returning
        let playlists: Vec<_> = self.client.current_user_playlists().try_collect().await?;
        Ok(playlists.into_iter().map(playlist_entry).collect())
    }

    async fn playlist_tracks_page(&self, playlist: &str, offset: u32, limit: u32) -> Result<Vec<Track>> {
        let id = playlist_id(playlist)?;
        // No field filter and no market: the full item shape, in the account's country
        let page = self
            .client
            .playlist_items_manual(id, None, None, Some(limit), Some(offset))
            .await?;
        Ok(page.items.into_iter().filter_map(parse_item).collect())
    }

    async fn play(&self, uris: &[String], device_id: Option<&str>) -> Result<()> {
        let ids = playable_ids(uris)?;
        // No offset or position: start from the first uri
        self.client.start_uris_playback(ids, device_id, None, None).await?;
        Ok(())
    }

    async fn create_playlist(&self, user_id: &str, name: &str, public: bool) -> Result<String> {
        let user = UserId::from_id(user_id.to_string())
            .map_err(|e| CoreError::Remote(format!("invalid user id {}: {}", user_id, e)))?;
        let playlist = self
            .client
            // Not collaborative, no description
            .user_playlist_create(user, name, Some(public), None, None)
            .await?;
        Ok(playlist.id.id().to_string())
    }

    async fn add_tracks(&self, playlist: &str, uris: &[String]) -> Result<()> {
        let id = playlist_id(playlist)?;
        let items = playable_ids(uris)?;
        // No position: append at the end
        self.client.playlist_add_items(id, items, None).await?;
        Ok(())
    }

    async fn unfollow_playlist(&self, playlist: &str) -> Result<()> {
        let id = playlist_id(playlist)?;
        self.client.playlist_unfollow(id).await?;
        Ok(())
    }
}
