use crate::error::TransferError;
use crate::models::playlist::{PlaylistMetadata, PlaylistSummary};
use crate::models::track::Track;

/// Read access to the streaming service playlists are transferred from.
///
/// Implemented by `actions::spotify::SpotifyClient`, or mocks in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SourcePlaylists: Send + Sync {
    async fn playlist_metadata(&self, playlist_id: &str)
        -> Result<PlaylistMetadata, TransferError>;

    /// Transferable tracks of the playlist, in playlist order.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, TransferError>;

    async fn user_playlists(&self) -> Result<Vec<PlaylistSummary>, TransferError>;
}
