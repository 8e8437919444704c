use std::sync::Arc;

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::jobs::{validate_playlist_id, JobId, SubmitError, TransferQueue};
use crate::matcher::MatchResolver;
use crate::models::playlist::PlaylistSummary;
use crate::models::youtube::Privacy;
use crate::ports::destination::DestinationPlaylists;
use crate::ports::source::SourcePlaylists;

type Source = Arc<dyn SourcePlaylists>;
type Destination = Arc<dyn DestinationPlaylists>;

/// Everything the routes need, handed to rocket as managed state.
pub struct Services {
    pub queue: TransferQueue,
    pub source: Source,
    pub destination: Destination,
    pub resolver: MatchResolver,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransferAccepted {
    pub job_id: JobId,
    pub source_playlist_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TrackView {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NewPlaylist {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: Privacy,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoMatch {
    pub query: String,
    pub video_id: String,
}

fn submit_status(err: &SubmitError) -> Status {
    match err {
        SubmitError::InvalidPlaylistId(_) => Status::BadRequest,
        SubmitError::QueueFull | SubmitError::QueueClosed => Status::ServiceUnavailable,
    }
}

fn fetch_status(err: &TransferError) -> Status {
    match err {
        TransferError::PlaylistNotFound(_) => Status::NotFound,
        _ => Status::BadGateway,
    }
}

#[post("/api/transfers/spotify/<playlist_id>")]
pub fn start_transfer(
    queue: &State<TransferQueue>,
    playlist_id: &str,
) -> Result<Custom<Json<TransferAccepted>>, Custom<String>> {
    match queue.submit(playlist_id) {
        Ok(job) => Ok(Custom(
            Status::Accepted,
            Json(TransferAccepted {
                message: format!(
                    "Transfer of Spotify playlist {} started in the background.",
                    job.source_playlist_id
                ),
                job_id: job.id,
                source_playlist_id: job.source_playlist_id,
            }),
        )),
        Err(err) => {
            log::warn!("Rejected transfer request for \"{}\": {}", playlist_id, err);
            Err(Custom(submit_status(&err), err.to_string()))
        }
    }
}

#[get("/api/spotify/playlists")]
pub async fn user_playlists(
    source: &State<Source>,
) -> Result<Json<Vec<PlaylistSummary>>, Custom<String>> {
    source.user_playlists().await.map(Json).map_err(|err| {
        log::error!("Listing Spotify playlists failed: {}", err);
        Custom(fetch_status(&err), err.to_string())
    })
}

#[get("/api/spotify/playlists/<playlist_id>/tracks")]
pub async fn playlist_tracks(
    source: &State<Source>,
    playlist_id: &str,
) -> Result<Json<Vec<TrackView>>, Custom<String>> {
    let playlist_id = validate_playlist_id(playlist_id).map_err(|err| {
        log::warn!("Rejected track listing request: {}", err);
        Custom(Status::BadRequest, err.to_string())
    })?;
    let tracks = source.playlist_tracks(playlist_id).await.map_err(|err| {
        log::error!("Listing tracks of {} failed: {}", playlist_id, err);
        Custom(fetch_status(&err), err.to_string())
    })?;
    Ok(Json(
        tracks
            .into_iter()
            .map(|track| TrackView {
                id: track.id.unwrap_or_default(),
                uri: track.uri,
                artists: track.artists.into_iter().map(|artist| artist.name).collect(),
                album: track.album.map(|album| album.name),
                name: track.name,
                duration_ms: track.duration_ms,
            })
            .collect(),
    ))
}

#[post("/api/youtube/playlists", data = "<playlist>")]
pub async fn create_playlist(
    destination: &State<Destination>,
    playlist: Json<NewPlaylist>,
) -> Result<Custom<Json<CreatedPlaylist>>, Custom<String>> {
    let playlist = playlist.into_inner();
    let title = playlist.title.trim();
    if title.is_empty() {
        return Err(Custom(
            Status::BadRequest,
            "Playlist title must not be blank.".to_string(),
        ));
    }

    let id = destination
        .create_playlist(title, &playlist.description, playlist.privacy)
        .await
        .map_err(|err| {
            log::error!("{}", err);
            Custom(Status::BadGateway, err.to_string())
        })?;
    Ok(Custom(
        Status::Created,
        Json(CreatedPlaylist {
            id,
            title: title.to_string(),
            description: playlist.description,
            privacy: playlist.privacy,
        }),
    ))
}

#[get("/api/youtube/search?<query>")]
pub async fn search_video(
    resolver: &State<MatchResolver>,
    query: Option<String>,
) -> Result<Json<VideoMatch>, Custom<String>> {
    let Some(query) = query.map(|query| query.trim().to_string()).filter(|query| !query.is_empty())
    else {
        return Err(Custom(
            Status::BadRequest,
            "A non-blank query is required.".to_string(),
        ));
    };

    match resolver.resolve_query(&query).await {
        Some(video_id) => Ok(Json(VideoMatch { query, video_id })),
        None => Err(Custom(
            Status::NotFound,
            format!("No video found for \"{}\".", query),
        )),
    }
}

pub fn build(rocket: Rocket<Build>, services: Services) -> Rocket<Build> {
    rocket
        .manage(services.queue)
        .manage(services.source)
        .manage(services.destination)
        .manage(services.resolver)
        .mount(
            "/",
            routes![
                start_transfer,
                user_playlists,
                playlist_tracks,
                create_playlist,
                search_video
            ],
        )
}
