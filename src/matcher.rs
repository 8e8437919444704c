use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::track::Track;
use crate::models::youtube::SearchRequest;
use crate::ports::destination::VideoSearch;

const MUSIC_CATEGORY: &str = "10";

/// Which search results count as candidates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchPolicy {
    pub video_only: bool,
    pub category_id: Option<String>,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        SearchPolicy {
            video_only: true,
            category_id: Some(MUSIC_CATEGORY.to_string()),
        }
    }
}

/// `"<title> <primary artist>"`, keeping the trailing space when there is no artist.
pub fn search_query(track: &Track) -> String {
    format!("{} {}", track.name, track.primary_artist())
}

/// Picks a best-guess video for a track from the top search result.
#[derive(Clone)]
pub struct MatchResolver {
    search: Arc<dyn VideoSearch>,
    policy: SearchPolicy,
}

impl MatchResolver {
    pub fn new(search: Arc<dyn VideoSearch>, policy: SearchPolicy) -> Self {
        MatchResolver { search, policy }
    }

    pub fn request_for(&self, track: &Track) -> SearchRequest {
        self.request_for_query(search_query(track))
    }

    fn request_for_query(&self, query: String) -> SearchRequest {
        SearchRequest {
            query,
            video_only: self.policy.video_only,
            category_id: self.policy.category_id.clone(),
            max_results: 1,
        }
    }

    pub async fn resolve(&self, track: &Track) -> Option<String> {
        self.resolve_query(&search_query(track)).await
    }

    /// Looks up free text under the same policy as track matching. Search
    /// failures are logged and reported as no match.
    pub async fn resolve_query(&self, query: &str) -> Option<String> {
        let request = self.request_for_query(query.to_string());
        log::debug!("Searching YouTube for \"{}\"", request.query);

        let results = match self.search.search(&request).await {
            Ok(results) => results,
            Err(err) => {
                log::error!("Search for \"{}\" failed: {}", request.query, err);
                return None;
            }
        };

        let Some(top) = results.first() else {
            log::warn!("No YouTube results for \"{}\"", request.query);
            return None;
        };
        match top.video_id() {
            Some(video_id) => {
                log::info!(
                    "Matched \"{}\" to video {} ({})",
                    request.query,
                    video_id,
                    top.title()
                );
                Some(video_id.to_string())
            }
            None => {
                log::warn!(
                    "Top result for \"{}\" is not a video ({})",
                    request.query,
                    top.id.kind
                );
                None
            }
        }
    }
}
