use std::marker::PhantomData;

use crate::error::TransferError;
use crate::models::page::Page;

/// Something that can turn a page locator into a decoded page.
///
/// `Ok(None)` means the response decoded to nothing, which ends pagination.
#[async_trait::async_trait]
pub trait PageSource<T: Send + 'static>: Send + Sync {
    async fn fetch_page(&self, locator: &str) -> Result<Option<Page<T>>, TransferError>;
}

/// Follows `next` cursors from a starting locator, one page per call.
///
/// A pager is forward-only: once a request fails or the cursor runs out it
/// yields nothing more. A page whose `next` equals the locator it was fetched
/// from ends pagination instead of looping.
pub struct Pager<'a, T, S: ?Sized> {
    source: &'a S,
    next: Option<String>,
    requests: usize,
    total: Option<u32>,
    _items: PhantomData<fn() -> T>,
}

impl<'a, T, S> Pager<'a, T, S>
where
    T: Send + 'static,
    S: PageSource<T> + ?Sized,
{
    pub fn new(source: &'a S, start: impl Into<String>) -> Self {
        Pager {
            source,
            next: Some(start.into()),
            requests: 0,
            total: None,
            _items: PhantomData,
        }
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, TransferError> {
        let Some(locator) = self.next.take() else {
            return Ok(None);
        };

        log::debug!("Requesting page {}", locator);
        self.requests += 1;
        let Some(page) = self.source.fetch_page(&locator).await? else {
            log::warn!("Received no page from {}, stopping", locator);
            return Ok(None);
        };

        self.total.get_or_insert(page.total);
        self.next = match page.next {
            Some(next) if next == locator => {
                log::warn!("Cursor {} did not advance, stopping", locator);
                None
            }
            next => next,
        };
        log::debug!(
            "Fetched {} items, next page: {}",
            page.items.len(),
            self.next.as_deref().unwrap_or("none")
        );
        Ok(Some(page.items))
    }

    pub async fn collect_all(mut self) -> Result<Vec<T>, TransferError> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }

    /// Number of page requests issued so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Collection size reported by the first page.
    pub fn total(&self) -> Option<u32> {
        self.total
    }
}
