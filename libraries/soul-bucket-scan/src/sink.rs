//! Destinations for decoded tracks.

use soul_flac_meta::{sort_for_listing, Track};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;

/// Append-only receiver of decoded tracks.
///
/// Called from several workers at once; publication order across workers
/// is unspecified.
pub trait TrackSink: Send + Sync {
    fn publish(&self, track: Track);
}

impl<T: TrackSink + ?Sized> TrackSink for Arc<T> {
    fn publish(&self, track: Track) {
        (**self).publish(track);
    }
}

impl TrackSink for mpsc::UnboundedSender<Track> {
    fn publish(&self, track: Track) {
        if let Err(mpsc::error::SendError(track)) = self.send(track) {
            debug!(locator = %track.locator, "Track receiver dropped");
        }
    }
}

/// Shared in-memory list of tracks.
#[derive(Clone, Default)]
pub struct TrackCollection {
    tracks: Arc<Mutex<Vec<Track>>>,
}

impl TrackCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the tracks in publication order.
    pub fn snapshot(&self) -> Vec<Track> {
        self.lock().clone()
    }

    /// Copy of the tracks sorted by artist, album and track number.
    pub fn sorted(&self) -> Vec<Track> {
        let mut tracks = self.snapshot();
        sort_for_listing(&mut tracks);
        tracks
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Track>> {
        self.tracks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TrackSink for TrackCollection {
    fn publish(&self, track: Track) {
        self.lock().push(track);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_remote::Locator;

    fn track(key: &str, artist: &str) -> Track {
        Track {
            locator: Locator::new("music", key),
            tags: [("artist".to_string(), artist.to_string())].into_iter().collect(),
            cover: None,
        }
    }

    #[test]
    fn collection_keeps_publication_order() {
        let collection = TrackCollection::new();
        collection.publish(track("2.flac", "B"));
        collection.publish(track("1.flac", "A"));

        let keys: Vec<String> = collection.snapshot().into_iter().map(|t| t.locator.key).collect();
        assert_eq!(keys, vec!["2.flac", "1.flac"]);

        let keys: Vec<String> = collection.sorted().into_iter().map(|t| t.locator.key).collect();
        assert_eq!(keys, vec!["1.flac", "2.flac"]);
    }

    #[test]
    fn clones_share_storage() {
        let collection = TrackCollection::new();
        let sink: Arc<dyn TrackSink> = Arc::new(collection.clone());

        sink.publish(track("a.flac", "A"));
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn channel_sink_forwards_and_tolerates_drop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.publish(track("a.flac", "A"));
        assert_eq!(rx.recv().await.unwrap().locator.key, "a.flac");

        drop(rx);
        tx.publish(track("b.flac", "B"));
    }
}
