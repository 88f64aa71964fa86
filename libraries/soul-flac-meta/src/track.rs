use serde::{Deserialize, Serialize};
use soul_remote::Locator;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Lower-cased tag name → value.
pub type Tags = HashMap<String, String>;

/// Metadata decoded from one remote FLAC object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub locator: Locator,
    pub tags: Tags,
    /// Cover art as a `data:` URI
    pub cover: Option<String>,
}

impl Track {
    /// Look up a tag by name, case-insensitively.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.tag("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.tag("artist")
    }

    pub fn album(&self) -> Option<&str> {
        self.tag("album")
    }

    /// Leading digits of `tracknumber`, so `"3/12"` is 3.
    pub fn track_number(&self) -> Option<u32> {
        let value = self.tag("tracknumber")?.trim();
        let digits = value
            .find(|c: char| !c.is_ascii_digit())
            .map_or(value, |end| &value[..end]);
        digits.parse().ok()
    }

    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }
}

/// Listing order: artist, then album, then track number.
///
/// Missing values sort first.
pub fn compare_for_listing(a: &Track, b: &Track) -> Ordering {
    a.artist()
        .cmp(&b.artist())
        .then_with(|| a.album().cmp(&b.album()))
        .then_with(|| a.track_number().cmp(&b.track_number()))
}

/// Sort tracks for display, keeping discovery order among equal entries.
pub fn sort_for_listing(tracks: &mut [Track]) {
    tracks.sort_by(compare_for_listing);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(key: &str, tags: &[(&str, &str)]) -> Track {
        Track {
            locator: Locator::new("music", key),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            cover: None,
        }
    }

    #[test]
    fn tag_lookup_is_case_insensitive() {
        let t = track("a.flac", &[("title", "Intro")]);
        assert_eq!(t.tag("TITLE"), Some("Intro"));
        assert_eq!(t.title(), Some("Intro"));
        assert_eq!(t.artist(), None);
    }

    #[test]
    fn track_number_parsing() {
        assert_eq!(track("a", &[("tracknumber", "7")]).track_number(), Some(7));
        assert_eq!(track("a", &[("tracknumber", "03/12")]).track_number(), Some(3));
        assert_eq!(track("a", &[("tracknumber", " 11 ")]).track_number(), Some(11));
        assert_eq!(track("a", &[("tracknumber", "A1")]).track_number(), None);
        assert_eq!(track("a", &[]).track_number(), None);
    }

    #[test]
    fn listing_order() {
        let mut tracks = vec![
            track("4", &[("artist", "B"), ("album", "X"), ("tracknumber", "1")]),
            track("3", &[("artist", "A"), ("album", "Y"), ("tracknumber", "1")]),
            track("2", &[("artist", "A"), ("album", "X"), ("tracknumber", "10")]),
            track("1", &[("artist", "A"), ("album", "X"), ("tracknumber", "2")]),
            track("0", &[("title", "untagged")]),
        ];

        sort_for_listing(&mut tracks);

        let keys: Vec<&str> = tracks.iter().map(|t| t.locator.key.as_str()).collect();
        assert_eq!(keys, vec!["0", "1", "2", "3", "4"]);
    }
}
