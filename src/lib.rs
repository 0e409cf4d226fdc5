//! Playlist and playback-queue management for one Spotify account.
//!
//! A [`Session`] keeps a local [`PlaylistCatalog`] in step with the remote,
//! fetches a playlist's tracks, narrows them with a [`FilterNode`] and then
//! plays them, queues them or writes them into a playlist.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;

pub use auth::TokenContext;
pub use config::Config;
pub use error::{CoreError, Result};
pub use model::{
    FilterNode, LeafPredicate, PlaylistCatalog, PlaylistEntry, PredicateKind, Queue, SpotifyApi, SpotifyClient, Track,
};
pub use session::{Clock, Session};
