use serde::{Deserialize, Serialize};

/// Album reference carried by a track. Local files have no album id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Album {
    pub id: Option<String>,
    pub name: String,
}
