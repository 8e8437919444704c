use reqwest::{Client, RequestBuilder};
use serde_json::json;

use crate::api_endpoint;
use crate::authorize::Access;
use crate::endpoints::YOUTUBE_API;
use crate::error::TransferError;
use crate::models::youtube::{
    InsertResponse, Privacy, SearchListResponse, SearchRequest, SearchResult, VIDEO_KIND,
};
use crate::ports::destination::{DestinationPlaylists, VideoSearch};

pub struct YoutubeClient {
    client: Client,
    access: Access,
    base_url: String,
}

impl YoutubeClient {
    pub fn new(client: Client, access: Access) -> Self {
        YoutubeClient {
            client,
            access,
            base_url: YOUTUBE_API.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn insert(&self, request_builder: RequestBuilder) -> Result<InsertResponse, String> {
        let request = self
            .access
            .authorize(request_builder)
            .build()
            .map_err(|err| err.to_string())?;
        let resp = self
            .client
            .execute(request)
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| err.to_string())?;
        resp.json::<InsertResponse>()
            .await
            .map_err(|err| err.to_string())
    }
}

fn search_query(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("part", "snippet".to_string()),
        ("q", request.query.clone()),
        ("maxResults", request.max_results.to_string()),
    ];
    if request.video_only {
        query.push(("type", "video".to_string()));
    }
    if let Some(category_id) = &request.category_id {
        query.push(("videoCategoryId", category_id.clone()));
    }
    query
}

#[async_trait::async_trait]
impl DestinationPlaylists for YoutubeClient {
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        privacy: Privacy,
    ) -> Result<String, TransferError> {
        log::info!("Creating YouTube playlist \"{}\" ({})", title, privacy);
        let failed = |reason: String| TransferError::PlaylistCreateFailed {
            title: title.to_string(),
            reason,
        };

        let request_builder = self
            .client
            .post(api_endpoint!(self.base_url, "/playlists"))
            .query(&[("part", "snippet,status")])
            .json(&json!({
                "snippet": {
                    "title": title,
                    "description": description,
                },
                "status": {
                    "privacyStatus": privacy.to_string(),
                },
            }));
        let resp = self.insert(request_builder).await.map_err(failed)?;
        let id = resp
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| failed("response had no playlist id".to_string()))?;

        log::info!("Created YouTube playlist \"{}\" with id {}", title, id);
        Ok(id)
    }

    async fn append_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<String, TransferError> {
        log::debug!("Adding video {} to YouTube playlist {}", video_id, playlist_id);
        let failed = |reason: String| TransferError::AppendFailed {
            playlist_id: playlist_id.to_string(),
            video_id: video_id.to_string(),
            reason,
        };

        let request_builder = self
            .client
            .post(api_endpoint!(self.base_url, "/playlistItems"))
            .query(&[("part", "snippet")])
            .json(&json!({
                "snippet": {
                    "playlistId": playlist_id,
                    "resourceId": {
                        "kind": VIDEO_KIND,
                        "videoId": video_id,
                    },
                },
            }));
        let resp = self.insert(request_builder).await.map_err(failed)?;
        resp.id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| failed("response had no playlist item id".to_string()))
    }
}

#[async_trait::async_trait]
impl VideoSearch for YoutubeClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, TransferError> {
        let locator = api_endpoint!(self.base_url, "/search");
        let request_builder = self
            .access
            .authorize(self.client.get(&locator))
            .query(&search_query(request));
        let request = request_builder
            .build()
            .map_err(|err| TransferError::upstream(&locator, err))?;
        let resp = self
            .client
            .execute(request)
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| TransferError::upstream(&locator, err))?;
        let resp = resp
            .json::<SearchListResponse>()
            .await
            .map_err(|err| TransferError::upstream(&locator, err))?;
        Ok(resp.items)
    }
}
