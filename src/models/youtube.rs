use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const VIDEO_KIND: &str = "youtube#video";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Unlisted,
    Public,
}

impl Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Privacy::Private => write!(f, "private"),
            Privacy::Unlisted => write!(f, "unlisted"),
            Privacy::Public => write!(f, "public"),
        }
    }
}

/// Search parameters for one track lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub video_only: bool,
    pub category_id: Option<String>,
    pub max_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: Option<SearchSnippet>,
}

impl SearchResult {
    /// The video id, if this result is a video.
    pub fn video_id(&self) -> Option<&str> {
        if self.id.kind != VIDEO_KIND {
            return None;
        }
        self.id.video_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn title(&self) -> &str {
        self.snippet
            .as_ref()
            .map(|snippet| snippet.title.as_str())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    pub kind: String,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSnippet {
    #[serde(default)]
    pub title: String,
}

/// Response of playlist and playlist item inserts; only the id matters.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertResponse {
    pub id: Option<String>,
}

#[cfg(test)]
pub(crate) fn search_result(id_kind: &str, video_id: &str) -> SearchResult {
    SearchResult {
        id: SearchResultId {
            kind: id_kind.to_string(),
            video_id: Some(video_id.to_string()),
        },
        snippet: Some(SearchSnippet {
            title: format!("Video {video_id}"),
        }),
    }
}
