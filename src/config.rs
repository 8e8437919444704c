use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::SearchPolicy;
use crate::models::youtube::Privacy;
use crate::transfer::DEFAULT_DESCRIPTION;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Could not parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("pacing_ms must be greater than zero.")]
    ZeroPacing,
}

/// The config file as written by the user. Everything but the tokens is optional.
#[derive(Debug, Deserialize, Serialize)]
pub struct TubeifyConfigFile {
    address: Option<IpAddr>,
    port: Option<u16>,
    spotify_access_token: String,
    youtube_access_token: String,
    search: Option<SearchPolicy>,
    pacing_ms: Option<u64>,
    privacy: Option<Privacy>,
    fallback_description: Option<String>,
    workers: Option<usize>,
    queue_capacity: Option<usize>,
    page_limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct TubeifyConfig {
    pub address: IpAddr,
    pub port: u16,
    pub spotify_access_token: String,
    pub youtube_access_token: String,
    pub search: SearchPolicy,
    pub pacing: Duration,
    pub privacy: Privacy,
    pub fallback_description: String,
    pub workers: usize,
    pub queue_capacity: usize,
    pub page_limit: u32,
}

impl From<TubeifyConfigFile> for TubeifyConfig {
    fn from(file_config: TubeifyConfigFile) -> Self {
        TubeifyConfig {
            address: file_config
                .address
                .unwrap_or(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: file_config.port.unwrap_or(3000),
            spotify_access_token: file_config.spotify_access_token,
            youtube_access_token: file_config.youtube_access_token,
            search: file_config.search.unwrap_or_default(),
            pacing: Duration::from_millis(file_config.pacing_ms.unwrap_or(500)),
            privacy: file_config.privacy.unwrap_or_default(),
            fallback_description: file_config
                .fallback_description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            workers: file_config.workers.unwrap_or(1).max(1),
            queue_capacity: file_config.queue_capacity.unwrap_or(16).max(1),
            page_limit: file_config.page_limit.unwrap_or(100).clamp(1, 100),
        }
    }
}

impl TubeifyConfig {
    pub fn from_json(path: &str, contents: &str) -> Result<Self, ConfigError> {
        let file_config: TubeifyConfigFile =
            serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;
        let config = TubeifyConfig::from(file_config);
        if config.pacing.is_zero() {
            return Err(ConfigError::ZeroPacing);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Self::from_json(&display, &contents)
    }
}
