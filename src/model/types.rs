//! Core type definitions shared by the catalog, fetcher, filter and queue

use serde::{Deserialize, Serialize};

/// Remote namespace used when turning ids into playable URIs
pub const URI_SCHEME: &str = "spotify";

/// A single song as read from a playlist page
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
    pub id: String,
}

impl Track {
    pub fn new(title: impl Into<String>, artists: Vec<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artists,
            id: id.into(),
        }
    }

    pub fn uri(&self) -> String {
        track_uri(&self.id)
    }
}

/// `spotify:track:<id>`
pub fn track_uri(id: &str) -> String {
    format!("{}:track:{}", URI_SCHEME, id)
}

/// A user's playlist as last seen on the remote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    pub id: String,
    pub track_count: u32,
}

impl PlaylistEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>, track_count: u32) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            track_count,
        }
    }
}
