use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Local};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::transfer::Transfer;

const JOB_ID_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    fn random() -> Self {
        JobId(
            thread_rng()
                .sample_iter(&Alphanumeric)
                .take(JOB_ID_LENGTH)
                .map(char::from)
                .collect(),
        )
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct TransferJob {
    pub id: JobId,
    pub source_playlist_id: String,
    pub accepted_at: DateTime<Local>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Playlist id \"{0}\" is not a valid Spotify id.")]
    InvalidPlaylistId(String),
    #[error("Too many transfers are waiting, try again later.")]
    QueueFull,
    #[error("The transfer workers have shut down.")]
    QueueClosed,
}

/// Spotify ids are base-62 strings.
pub(crate) fn validate_playlist_id(playlist_id: &str) -> Result<&str, SubmitError> {
    let trimmed = playlist_id.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SubmitError::InvalidPlaylistId(playlist_id.to_string()));
    }
    Ok(trimmed)
}

/// Sending half of the job queue. Submitting never waits for a transfer.
#[derive(Clone)]
pub struct TransferQueue {
    sender: mpsc::Sender<TransferJob>,
}

pub type JobReceiver = mpsc::Receiver<TransferJob>;

impl TransferQueue {
    pub fn bounded(capacity: usize) -> (TransferQueue, JobReceiver) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (TransferQueue { sender }, receiver)
    }

    pub fn submit(&self, playlist_id: &str) -> Result<TransferJob, SubmitError> {
        let playlist_id = validate_playlist_id(playlist_id)?;
        let job = TransferJob {
            id: JobId::random(),
            source_playlist_id: playlist_id.to_string(),
            accepted_at: Local::now(),
        };
        self.sender.try_send(job.clone()).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => SubmitError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SubmitError::QueueClosed,
        })?;
        log::info!(
            "Accepted transfer job {} for Spotify playlist {}",
            job.id,
            job.source_playlist_id
        );
        Ok(job)
    }
}

/// Starts `workers` tasks that take jobs off the queue and run them one at a
/// time. Workers exit once every `TransferQueue` handle is dropped.
pub fn spawn_workers(
    receiver: JobReceiver,
    transfer: Arc<Transfer>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    let receiver = Arc::new(Mutex::new(receiver));
    (0..workers.max(1))
        .map(|worker| {
            let receiver = receiver.clone();
            let transfer = transfer.clone();
            tokio::spawn(async move {
                log::debug!("Transfer worker {} started", worker);
                loop {
                    let job = receiver.lock().await.recv().await;
                    let Some(job) = job else {
                        break;
                    };
                    run_job(&transfer, job).await;
                }
                log::debug!("Transfer worker {} stopped", worker);
            })
        })
        .collect()
}

async fn run_job(transfer: &Transfer, job: TransferJob) {
    log::info!(
        "Running transfer job {} for Spotify playlist {}",
        job.id,
        job.source_playlist_id
    );
    let result = transfer.run(&job.source_playlist_id).await;
    let elapsed = Local::now() - job.accepted_at;
    match result {
        Ok(outcome) => log::info!(
            "Job {} ({} -> {}) finished after {}s: {} added, {} failed or skipped",
            job.id,
            outcome.source_playlist_id,
            outcome.destination_playlist_id,
            elapsed.num_seconds(),
            outcome.succeeded,
            outcome.failed
        ),
        Err(err) => log::error!(
            "Job {} aborted after {}s: {}",
            job.id,
            elapsed.num_seconds(),
            err
        ),
    }
}
