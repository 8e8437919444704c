use thiserror::Error;

/// Failures a transfer run can hit. Whether one is fatal depends on where it
/// happens: anything before the track loop aborts the run, `AppendFailed`
/// only costs the track it belongs to.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to fetch {locator}: {reason}")]
    UpstreamFetch { locator: String, reason: String },
    #[error("Playlist {0} was not found or is not accessible.")]
    PlaylistNotFound(String),
    #[error("Failed to create playlist \"{title}\": {reason}")]
    PlaylistCreateFailed { title: String, reason: String },
    #[error("Failed to add video {video_id} to playlist {playlist_id}: {reason}")]
    AppendFailed {
        playlist_id: String,
        video_id: String,
        reason: String,
    },
}

impl TransferError {
    pub fn upstream(locator: &str, reason: impl ToString) -> Self {
        TransferError::UpstreamFetch {
            locator: locator.to_string(),
            reason: reason.to_string(),
        }
    }
}
