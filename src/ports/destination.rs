use crate::error::TransferError;
use crate::models::youtube::{Privacy, SearchRequest, SearchResult};

/// Write access to the video service playlists are created on.
///
/// Implemented by `actions::youtube::YoutubeClient`, or mocks in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DestinationPlaylists: Send + Sync {
    /// Returns the id of the new playlist.
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<String, TransferError>;

    /// Returns the id of the new playlist item.
    async fn append_item(&self, playlist_id: &str, video_id: &str)
        -> Result<String, TransferError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, TransferError>;
}
