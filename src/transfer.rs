use std::fmt::Display;
use std::sync::Arc;

use crate::error::TransferError;
use crate::matcher::MatchResolver;
use crate::models::track::Track;
use crate::models::youtube::Privacy;
use crate::ports::destination::DestinationPlaylists;
use crate::ports::source::SourcePlaylists;
use crate::throttle::Throttle;

pub const DEFAULT_DESCRIPTION: &str = "Transferred from Spotify";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    ReadingSource,
    CreatingDestination,
    Iterating { index: usize, total: usize },
    Done,
    Aborted,
}

impl Display for TransferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferState::ReadingSource => write!(f, "reading source"),
            TransferState::CreatingDestination => write!(f, "creating destination"),
            TransferState::Iterating { index, total } => {
                write!(f, "track {}/{}", index + 1, total)
            }
            TransferState::Done => write!(f, "done"),
            TransferState::Aborted => write!(f, "aborted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissReason {
    NoMatch,
    AppendFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMiss {
    pub position: usize,
    pub title: String,
    pub reason: MissReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub source_playlist_id: String,
    pub destination_playlist_id: String,
    pub succeeded: usize,
    pub failed: usize,
    pub misses: Vec<TrackMiss>,
}

impl TransferOutcome {
    fn new(source_playlist_id: &str, destination_playlist_id: &str) -> Self {
        TransferOutcome {
            source_playlist_id: source_playlist_id.to_string(),
            destination_playlist_id: destination_playlist_id.to_string(),
            succeeded: 0,
            failed: 0,
            misses: Vec::new(),
        }
    }

    fn record_miss(&mut self, position: usize, track: &Track, reason: MissReason) {
        self.failed += 1;
        self.misses.push(TrackMiss {
            position,
            title: track.name.clone(),
            reason,
        });
    }
}

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub privacy: Privacy,
    pub fallback_description: String,
}

impl Default for TransferSettings {
    fn default() -> Self {
        TransferSettings {
            privacy: Privacy::Private,
            fallback_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Copies one source playlist into a new destination playlist.
///
/// Reading the source and creating the destination are all-or-nothing; after
/// that every track is matched and appended on its own, and a track that
/// cannot be matched or appended is counted and skipped.
pub struct Transfer {
    source: Arc<dyn SourcePlaylists>,
    destination: Arc<dyn DestinationPlaylists>,
    resolver: MatchResolver,
    throttle: Throttle,
    settings: TransferSettings,
}

impl Transfer {
    pub fn new(
        source: Arc<dyn SourcePlaylists>,
        destination: Arc<dyn DestinationPlaylists>,
        resolver: MatchResolver,
        throttle: Throttle,
        settings: TransferSettings,
    ) -> Self {
        Transfer {
            source,
            destination,
            resolver,
            throttle,
            settings,
        }
    }

    /// An `Err` means the run was aborted.
    pub async fn run(&self, source_playlist_id: &str) -> Result<TransferOutcome, TransferError> {
        log::info!("Starting transfer of Spotify playlist {}", source_playlist_id);
        let result = self.execute(source_playlist_id).await;
        match &result {
            Ok(outcome) => {
                enter(source_playlist_id, TransferState::Done);
                log::info!(
                    "Transfer of Spotify playlist {} into {} completed. Success: {}, Failed/Skipped: {}",
                    source_playlist_id,
                    outcome.destination_playlist_id,
                    outcome.succeeded,
                    outcome.failed
                );
                for miss in &outcome.misses {
                    log::debug!(
                        "Missed track {} \"{}\": {:?}",
                        miss.position + 1,
                        miss.title,
                        miss.reason
                    );
                }
            }
            Err(err) => {
                enter(source_playlist_id, TransferState::Aborted);
                log::error!(
                    "Transfer of Spotify playlist {} failed: {}",
                    source_playlist_id,
                    err
                );
            }
        }
        result
    }

    async fn execute(&self, source_playlist_id: &str) -> Result<TransferOutcome, TransferError> {
        enter(source_playlist_id, TransferState::ReadingSource);
        let playlist = self.source.playlist_metadata(source_playlist_id).await?;
        let tracks = self.source.playlist_tracks(source_playlist_id).await?;

        enter(source_playlist_id, TransferState::CreatingDestination);
        let description = playlist
            .description()
            .unwrap_or(self.settings.fallback_description.as_str());
        let destination_id = self
            .destination
            .create_playlist(&playlist.name, description, self.settings.privacy)
            .await?;

        let mut outcome = TransferOutcome::new(source_playlist_id, &destination_id);
        let total = tracks.len();
        for (index, track) in tracks.iter().enumerate() {
            enter(source_playlist_id, TransferState::Iterating { index, total });
            log::info!(
                "[Track {}/{}] Processing: {} by {}",
                index + 1,
                total,
                track.name,
                track.artist_names()
            );
            self.transfer_track(&destination_id, index, track, &mut outcome)
                .await;
            self.throttle.wait().await;
        }
        Ok(outcome)
    }

    async fn transfer_track(
        &self,
        destination_id: &str,
        index: usize,
        track: &Track,
        outcome: &mut TransferOutcome,
    ) {
        let Some(video_id) = self.resolver.resolve(track).await else {
            log::warn!(
                "[Track {}] Could not find a YouTube video for \"{}\", skipping",
                index + 1,
                track.name
            );
            outcome.record_miss(index, track, MissReason::NoMatch);
            return;
        };

        match self.destination.append_item(destination_id, &video_id).await {
            Ok(item_id) => {
                log::info!(
                    "[Track {}] Added \"{}\" as video {} (item {})",
                    index + 1,
                    track.name,
                    video_id,
                    item_id
                );
                outcome.succeeded += 1;
            }
            Err(err) => {
                log::warn!("[Track {}] {}", index + 1, err);
                outcome.record_miss(index, track, MissReason::AppendFailed(err.to_string()));
            }
        }
    }
}

fn enter(source_playlist_id: &str, state: TransferState) {
    log::debug!("Transfer {}: {}", source_playlist_id, state);
}
