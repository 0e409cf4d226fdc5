//! Model module - catalog, track fetching, filtering and mutation
//!
//! - `types`: Track and playlist records
//! - `remote`: The `SpotifyApi` seam every remote call goes through
//! - `spotify_client`: rspotify-backed `SpotifyApi`
//! - `catalog`: Local mirror of the user's playlists
//! - `fetcher`: Paginated, deduplicated track retrieval
//! - `filter`: Nested boolean filter expressions
//! - `queue`: Playback queue building
//! - `mutator`: Playlist create/add/delete keeping the catalog in step

mod types;
pub(crate) mod remote;
mod spotify_client;
mod catalog;
mod fetcher;
mod filter;
mod queue;
mod mutator;

pub use types::{PlaylistEntry, Track, URI_SCHEME, track_uri};

pub use remote::{PAGE_SIZE, SpotifyApi};

pub use spotify_client::SpotifyClient;

pub use catalog::PlaylistCatalog;

pub use fetcher::{MAX_CONCURRENT_PAGES, dedup_tracks, fetch_all, page_count};

pub use filter::{Combinator, FilterNode, LeafPredicate, PredicateKind, build_mask, filter};

pub use queue::Queue;

pub use mutator::{MAX_ITEMS_PER_ADD, PlaylistMutator};
