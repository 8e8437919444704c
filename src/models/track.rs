use serde::{Deserialize, Serialize};

use crate::models::album::Album;
use crate::models::artist::SimplifiedArtist;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    pub album: Option<Album>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub uri: String,
}

impl Track {
    /// A track can be searched for only if it has a catalog id and is not a local file.
    pub fn is_transferable(&self) -> bool {
        !self.is_local && self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(|artist| artist.name.as_str())
            .unwrap_or_default()
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Entry of a playlist's track listing. `track` is null for removed items.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<Track>,
}

pub fn retain_transferable(tracks: Vec<Track>) -> Vec<Track> {
    tracks
        .into_iter()
        .filter(Track::is_transferable)
        .collect()
}

pub fn transferable_tracks(items: Vec<PlaylistTrackItem>) -> Vec<Track> {
    retain_transferable(items.into_iter().filter_map(|item| item.track).collect())
}

#[cfg(test)]
pub(crate) fn track(id: &str, name: &str, artists: &[&str]) -> Track {
    Track {
        id: Some(id.to_string()).filter(|id| !id.is_empty()),
        name: name.to_string(),
        artists: artists
            .iter()
            .map(|name| SimplifiedArtist {
                id: None,
                name: name.to_string(),
            })
            .collect(),
        album: None,
        duration_ms: 180_000,
        is_local: false,
        uri: format!("spotify:track:{id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_and_idless_tracks_are_dropped() {
        let mut local = track("t2", "Demo", &["Me"]);
        local.is_local = true;
        let tracks = vec![
            track("t1", "Song A", &["Artist X"]),
            local,
            track("", "Ghost", &[]),
            track("t3", "Song C", &["Artist Z"]),
        ];

        let kept = retain_transferable(tracks);
        let ids: Vec<_> = kept.iter().filter_map(|t| t.id.as_deref()).collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut local = track("t2", "Demo", &["Me"]);
        local.is_local = true;
        let once = retain_transferable(vec![track("t1", "A", &["X"]), local, track("t3", "C", &[])]);
        let twice = retain_transferable(once.clone());

        let ids = |tracks: &[Track]| -> Vec<Option<String>> {
            tracks.iter().map(|t| t.id.clone()).collect()
        };
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn removed_items_are_skipped() {
        let items = vec![
            PlaylistTrackItem { track: None },
            PlaylistTrackItem {
                track: Some(track("t1", "Song A", &["Artist X"])),
            },
        ];
        let tracks = transferable_tracks(items);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Song A");
    }

    #[test]
    fn decodes_a_local_file_entry() {
        let raw = r#"{
            "track": {
                "id": null,
                "name": "bootleg.mp3",
                "artists": [{"id": null, "name": ""}],
                "album": {"id": null, "name": ""},
                "duration_ms": 0,
                "is_local": true,
                "uri": "spotify:local:::bootleg:0"
            }
        }"#;
        let item: PlaylistTrackItem = serde_json::from_str(raw).unwrap();
        let track = item.track.unwrap();
        assert!(track.is_local);
        assert!(!track.is_transferable());
    }

    #[test]
    fn primary_artist_is_first_or_empty() {
        assert_eq!(track("t1", "A", &["X", "Y"]).primary_artist(), "X");
        assert_eq!(track("t1", "A", &[]).primary_artist(), "");
    }
}
