use serde::Deserialize;

/// One page of a cursor-paginated collection. `next` is an absolute locator.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: u32,
}
