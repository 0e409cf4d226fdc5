//! Ordered playback queue of track ids

use std::collections::HashSet;

use super::remote::SpotifyApi;
use super::types::track_uri;
use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Queue {
    ids: Vec<String>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Drops the previous queue and takes `track_ids` as given.
    pub fn replace<I, S>(&mut self, track_ids: I) -> &[String]
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = track_ids.into_iter().map(Into::into).collect();
        &self.ids
    }

    /// Appends in order. Without `allow_duplicates`, ids already queued are
    /// skipped, including ones added earlier in the same batch.
    pub fn append<I, S>(&mut self, track_ids: I, allow_duplicates: bool) -> &[String]
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if allow_duplicates {
            self.ids.extend(track_ids.into_iter().map(Into::into));
            return &self.ids;
        }

        let mut queued: HashSet<String> = self.ids.iter().cloned().collect();
        for id in track_ids {
            let id = id.into();
            if queued.insert(id.clone()) {
                self.ids.push(id);
            }
        }
        &self.ids
    }

    pub fn uris(&self) -> Vec<String> {
        self.ids.iter().map(|id| track_uri(id)).collect()
    }

    /// Asks the remote to play the whole queue.
    pub async fn submit(&self, api: &dyn SpotifyApi, device_id: Option<&str>) -> Result<()> {
        tracing::debug!(tracks = self.ids.len(), device_id = ?device_id, "API: start_uris_playback");
        let result = api.play(&self.uris(), device_id).await;
        crate::log_api_result!("start_uris_playback", result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::remote::mock::{Call, MockApi};

    #[test]
    fn append_skips_duplicates_within_batch() {
        let mut queue = Queue::new();
        assert_eq!(queue.append(["a", "b", "a"], false), ["a", "b"]);
    }

    #[test]
    fn append_keeps_duplicates_when_allowed() {
        let mut queue = Queue::new();
        assert_eq!(queue.append(["a", "b", "a"], true), ["a", "b", "a"]);
    }

    #[test]
    fn append_checks_existing_queue() {
        let mut queue = Queue::new();
        queue.replace(["x", "y"]);
        assert_eq!(queue.append(["y", "z", "x", "w"], false), ["x", "y", "z", "w"]);
    }

    #[test]
    fn replace_discards_previous_queue() {
        let mut queue = Queue::new();
        queue.append(["a", "b"], true);
        assert_eq!(queue.replace(["c", "c", "d"]), ["c", "c", "d"]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn uris_use_track_scheme() {
        let mut queue = Queue::new();
        queue.replace(["4uLU6hMCjMI75M1A2tKUQC"]);
        assert_eq!(queue.uris(), vec!["spotify:track:4uLU6hMCjMI75M1A2tKUQC"]);
    }

    #[tokio::test]
    async fn submit_plays_all_uris() {
        let api = MockApi::new();
        let mut queue = Queue::new();
        queue.replace(["a", "b"]);
        queue.submit(&api, Some("device-1")).await.unwrap();

        assert_eq!(
            api.calls(),
            vec![Call::Play {
                uris: vec!["spotify:track:a".into(), "spotify:track:b".into()],
                device_id: Some("device-1".into()),
            }]
        );
    }
}
