use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistMetadata {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl PlaylistMetadata {
    /// The description to carry over, if the source has a non-blank one.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksRef {
    pub total: u32,
}

/// Entry of the current user's playlist listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tracks: TracksRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub total_tracks: u32,
}

impl From<SimplifiedPlaylist> for PlaylistSummary {
    fn from(playlist: SimplifiedPlaylist) -> Self {
        PlaylistSummary {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            total_tracks: playlist.tracks.total,
        }
    }
}
