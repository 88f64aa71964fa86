//! Rendering of indexed tracks.

use serde::Serialize;
use soul_flac_meta::Track;
use soul_remote::ObjectStore;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;
use tracing::warn;

/// One line of the track listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRow {
    pub bucket: String,
    pub key: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track_number: Option<u32>,
    pub has_cover: bool,
    /// Playback URL, absent when signing failed
    pub url: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl TrackRow {
    pub fn new(track: &Track, url: Option<String>) -> Self {
        Self {
            bucket: track.locator.bucket.clone(),
            key: track.locator.key.clone(),
            title: track.title().map(str::to_string),
            artist: track.artist().map(str::to_string),
            album: track.album().map(str::to_string),
            track_number: track.track_number(),
            has_cover: track.has_cover(),
            url,
            tags: track
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Build rows for `tracks`, signing a playback URL for each.
pub async fn rows_with_urls(
    store: &dyn ObjectStore,
    tracks: &[Track],
    expires_in: Duration,
) -> Vec<TrackRow> {
    let mut rows = Vec::with_capacity(tracks.len());
    for track in tracks {
        let url = match store.signed_url(&track.locator, expires_in).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(locator = %track.locator, error = %e, "Failed to sign URL");
                None
            }
        };
        rows.push(TrackRow::new(track, url));
    }
    rows
}

/// Plain-text table: number, artist, album, title, cover flag, URL.
pub fn render_table(rows: &[TrackRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let number = row
            .track_number
            .map_or_else(|| "-".to_string(), |n| format!("{:>2}", n));
        let title = row.title.as_deref().unwrap_or(&row.key);
        let _ = writeln!(
            out,
            "{}  {} / {} / {}{}",
            number,
            row.artist.as_deref().unwrap_or("Unknown Artist"),
            row.album.as_deref().unwrap_or("Unknown Album"),
            title,
            if row.has_cover { "  [cover]" } else { "" },
        );
        if let Some(ref url) = row.url {
            let _ = writeln!(out, "    {}", url);
        }
    }
    out
}

/// Tags of a single track, one `key=value` per line in key order.
pub fn render_tags(track: &Track) -> String {
    let tags: BTreeMap<&str, &str> = track
        .tags
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}", track.locator);
    for (key, value) in tags {
        let _ = writeln!(out, "  {}={}", key, value);
    }
    match track.cover {
        Some(ref cover) => {
            let mime = cover
                .strip_prefix("data:")
                .and_then(|rest| rest.split_once(';'))
                .map_or("unknown", |(mime, _)| mime);
            let _ = writeln!(out, "  cover: {} (data URI, {} chars)", mime, cover.len());
        }
        None => {
            let _ = writeln!(out, "  cover: none");
        }
    }
    out
}
