use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api_endpoint;
use crate::authorize::Access;
use crate::endpoints::SPOTIFY_API;
use crate::error::TransferError;
use crate::models::page::Page;
use crate::models::playlist::{PlaylistMetadata, PlaylistSummary, SimplifiedPlaylist};
use crate::models::track::{transferable_tracks, PlaylistTrackItem, Track};
use crate::paging::{PageSource, Pager};
use crate::ports::source::SourcePlaylists;

const MAX_TRACK_PAGE: u32 = 100;
const PLAYLIST_PAGE: u32 = 50;

pub struct SpotifyClient {
    client: Client,
    access: Access,
    base_url: String,
    track_page_limit: u32,
}

impl SpotifyClient {
    pub fn new(client: Client, access: Access, track_page_limit: u32) -> Self {
        SpotifyClient {
            client,
            access,
            base_url: SPOTIFY_API.to_string(),
            track_page_limit: track_page_limit.clamp(1, MAX_TRACK_PAGE),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn tracks_endpoint(&self, playlist_id: &str) -> String {
        api_endpoint!(
            self.base_url,
            "/playlists/{}/tracks?limit={}",
            playlist_id,
            self.track_page_limit
        )
    }

    /// Sends an authorized request. When the request is about a playlist,
    /// 404 and 403 both mean it is missing or not visible to this token.
    async fn send(
        &self,
        locator: &str,
        request_builder: RequestBuilder,
        playlist_id: Option<&str>,
    ) -> Result<Response, TransferError> {
        let request = self
            .access
            .authorize(request_builder)
            .build()
            .map_err(|err| TransferError::upstream(locator, err))?;
        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|err| TransferError::upstream(locator, err))?;

        match (resp.status(), playlist_id) {
            (StatusCode::NOT_FOUND | StatusCode::FORBIDDEN, Some(playlist_id)) => {
                Err(TransferError::PlaylistNotFound(playlist_id.to_string()))
            }
            (status, _) if !status.is_success() => Err(TransferError::upstream(locator, status)),
            _ => Ok(resp),
        }
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        locator: &str,
        playlist_id: Option<&str>,
    ) -> Result<Option<Page<T>>, TransferError> {
        let resp = self
            .send(locator, self.client.get(locator), playlist_id)
            .await?;
        resp.json::<Option<Page<T>>>()
            .await
            .map_err(|err| TransferError::upstream(locator, err))
    }
}

#[async_trait::async_trait]
impl<T> PageSource<T> for SpotifyClient
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, locator: &str) -> Result<Option<Page<T>>, TransferError> {
        self.get_page(locator, None).await
    }
}

/// Track pages of one playlist, so a missing playlist is reported by id.
struct PlaylistPages<'a> {
    client: &'a SpotifyClient,
    playlist_id: &'a str,
}

#[async_trait::async_trait]
impl<'a> PageSource<PlaylistTrackItem> for PlaylistPages<'a> {
    async fn fetch_page(
        &self,
        locator: &str,
    ) -> Result<Option<Page<PlaylistTrackItem>>, TransferError> {
        self.client.get_page(locator, Some(self.playlist_id)).await
    }
}

/// Pages through a playlist's track listing, dropping untransferable entries
/// page by page.
pub async fn read_transferable_tracks<S>(
    source: &S,
    start: impl Into<String>,
) -> Result<Vec<Track>, TransferError>
where
    S: PageSource<PlaylistTrackItem> + ?Sized,
{
    let mut pager = Pager::new(source, start);
    let mut tracks = Vec::new();
    while let Some(items) = pager.next_page().await? {
        let fetched = items.len();
        let kept = transferable_tracks(items);
        log::debug!("Kept {} of {} tracks from page", kept.len(), fetched);
        tracks.extend(kept);
    }
    if let Some(total) = pager.total() {
        log::debug!(
            "Read {} transferable of {} listed tracks in {} requests",
            tracks.len(),
            total,
            pager.requests()
        );
    }
    Ok(tracks)
}

#[async_trait::async_trait]
impl SourcePlaylists for SpotifyClient {
    async fn playlist_metadata(
        &self,
        playlist_id: &str,
    ) -> Result<PlaylistMetadata, TransferError> {
        let locator = api_endpoint!(self.base_url, "/playlists/{}", playlist_id);
        let request_builder = self
            .client
            .get(&locator)
            .query(&[("fields", "id,name,description")]);
        let resp = self
            .send(&locator, request_builder, Some(playlist_id))
            .await?;
        resp.json::<PlaylistMetadata>()
            .await
            .map_err(|err| TransferError::upstream(&locator, err))
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, TransferError> {
        log::info!("Fetching tracks of Spotify playlist {}", playlist_id);
        let pages = PlaylistPages {
            client: self,
            playlist_id,
        };
        let tracks = read_transferable_tracks(&pages, self.tracks_endpoint(playlist_id)).await?;
        log::info!(
            "Found {} transferable tracks in Spotify playlist {}",
            tracks.len(),
            playlist_id
        );
        Ok(tracks)
    }

    async fn user_playlists(&self) -> Result<Vec<PlaylistSummary>, TransferError> {
        let start = api_endpoint!(self.base_url, "/me/playlists?limit={}", PLAYLIST_PAGE);
        let playlists: Vec<SimplifiedPlaylist> = Pager::new(self, start).collect_all().await?;
        log::info!("Fetched {} playlists of the current user", playlists.len());
        Ok(playlists.into_iter().map(PlaylistSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::models::track::track;

    fn client_for(server: &MockServer) -> SpotifyClient {
        SpotifyClient::new(Client::new(), Access::new("spotify", "token"), 100)
            .with_base_url(server.base_url())
    }

    fn track_item(id: &str, name: &str) -> serde_json::Value {
        json!({
            "track": {
                "id": id,
                "name": name,
                "artists": [{"id": "a1", "name": "Artist X"}],
                "album": {"id": "al1", "name": "Album"},
                "duration_ms": 200000,
                "is_local": false,
                "uri": format!("spotify:track:{id}")
            }
        })
    }

    struct ScriptedTracks {
        pages: Mutex<Vec<Page<PlaylistTrackItem>>>,
    }

    #[async_trait::async_trait]
    impl PageSource<PlaylistTrackItem> for ScriptedTracks {
        async fn fetch_page(
            &self,
            _locator: &str,
        ) -> Result<Option<Page<PlaylistTrackItem>>, TransferError> {
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok(None);
            }
            Ok(Some(pages.remove(0)))
        }
    }

    fn item(track: Option<Track>) -> PlaylistTrackItem {
        PlaylistTrackItem { track }
    }

    #[tokio::test]
    async fn filters_each_page_and_keeps_order() {
        let mut local = track("t3", "Voice Memo", &["Me"]);
        local.is_local = true;
        let source = ScriptedTracks {
            pages: Mutex::new(vec![
                Page {
                    items: vec![
                        item(Some(track("t1", "Song A", &["Artist X"]))),
                        item(None),
                    ],
                    next: Some("page-2".into()),
                    total: 5,
                },
                Page {
                    items: vec![
                        item(Some(track("t2", "Song B", &["Artist Y"]))),
                        item(Some(local)),
                        item(Some(track("t4", "Song D", &[]))),
                    ],
                    next: None,
                    total: 5,
                },
            ]),
        };

        let tracks = read_transferable_tracks(&source, "page-1").await.unwrap();
        let names: Vec<_> = tracks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Song A", "Song B", "Song D"]);
    }

    #[test]
    fn track_page_limit_is_clamped() {
        let client = SpotifyClient::new(Client::new(), Access::new("spotify", "t"), 500);
        assert_eq!(
            client.tracks_endpoint("abc"),
            "https://api.spotify.com/v1/playlists/abc/tracks?limit=100"
        );
    }

    #[tokio::test]
    async fn reads_metadata_with_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/playlists/p1")
                    .query_param("fields", "id,name,description")
                    .header("authorization", "Bearer token");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"id": "p1", "name": "Mix", "description": null}));
            })
            .await;

        let playlist = client_for(&server).playlist_metadata("p1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(playlist.name, "Mix");
        assert_eq!(playlist.description, None);
    }

    #[tokio::test]
    async fn missing_or_forbidden_metadata_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/playlists/gone");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/playlists/private");
                then.status(403);
            })
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.playlist_metadata("gone").await,
            Err(TransferError::PlaylistNotFound(id)) if id == "gone"
        ));
        assert!(matches!(
            client.playlist_metadata("private").await,
            Err(TransferError::PlaylistNotFound(id)) if id == "private"
        ));
    }

    #[tokio::test]
    async fn metadata_server_error_is_upstream_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/playlists/p1");
                then.status(500);
            })
            .await;

        let err = client_for(&server).playlist_metadata("p1").await.unwrap_err();
        assert!(matches!(err, TransferError::UpstreamFetch { .. }));
    }

    #[tokio::test]
    async fn missing_playlist_tracks_are_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/playlists/missing/tracks");
                then.status(404);
            })
            .await;

        let err = client_for(&server)
            .playlist_tracks("missing")
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::PlaylistNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn follows_next_until_a_null_page() {
        let server = MockServer::start_async().await;
        let next = format!("{}/pages/2", server.base_url());
        let first = server
            .mock_async(move |when, then| {
                when.method(GET)
                    .path("/playlists/p1/tracks")
                    .query_param("limit", "100");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "items": [track_item("t1", "Song A"), {"track": null}],
                        "next": next,
                        "total": 2
                    }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET).path("/pages/2");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("null");
            })
            .await;

        let tracks = client_for(&server).playlist_tracks("p1").await.unwrap();
        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Song A");
    }

    #[tokio::test]
    async fn failed_page_is_upstream_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/me/playlists");
                then.status(502);
            })
            .await;

        let err = client_for(&server).user_playlists().await.unwrap_err();
        assert!(matches!(
            err,
            TransferError::UpstreamFetch { locator, .. } if locator.ends_with("/me/playlists?limit=50")
        ));
    }

    #[tokio::test]
    async fn lists_user_playlists_across_pages() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/me/playlists");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "items": [
                            {"id": "p1", "name": "Mix", "description": "", "tracks": {"total": 3}},
                            {"id": "p2", "name": "Chill", "description": null, "tracks": {"total": 7}}
                        ],
                        "next": null,
                        "total": 2
                    }));
            })
            .await;

        let playlists = client_for(&server).user_playlists().await.unwrap();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[1].total_tracks, 7);
    }
}
