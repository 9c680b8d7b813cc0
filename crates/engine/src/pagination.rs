//! Cursor-pagination draining.
//!
//! Listing endpoints answer with `{ data, has_more, next }`. A [`PageCursor`]
//! walks that chain one request at a time; [`collect_all_pages`] drains it
//! into a single ordered sequence.

use controlroom_api::{ControlRoomError, Gateway};
use controlroom_types::Page;
use serde_json::Value;
use tracing::debug;

/// Lazy, finite, non-restartable sequence of listing pages.
///
/// The first call to [`PageCursor::next_page`] fetches the base URL. Later
/// calls follow `next` for as long as the previous page reported
/// `has_more` with a usable `next` URL. Once exhausted, or after a failed
/// fetch, the cursor yields `None` forever.
pub struct PageCursor<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
    pending_url: Option<String>,
    pages_fetched: usize,
}

impl<'a, G: Gateway + ?Sized> PageCursor<'a, G> {
    pub fn new(gateway: &'a G, base_url: impl Into<String>) -> Self {
        Self {
            gateway,
            pending_url: Some(base_url.into()),
            pages_fetched: 0,
        }
    }

    /// Fetch the next page, or `None` when the listing is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Page, ControlRoomError>> {
        let url = self.pending_url.take()?;
        let document = match self.gateway.get(&url).await {
            Ok(document) => document,
            Err(error) => return Some(Err(error)),
        };

        let page = Page::from_document(document);
        self.pages_fetched += 1;
        self.pending_url = page.continuation().map(str::to_string);
        debug!(
            page = self.pages_fetched,
            items = page.data.len(),
            has_more = page.has_more,
            follows = self.pending_url.is_some(),
            "listing page fetched"
        );
        Some(Ok(page))
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending_url.is_none()
    }
}

/// Drain every page reachable from `base_url` into one ordered sequence.
///
/// Any failed page aborts the whole listing; items gathered so far are
/// discarded.
pub async fn collect_all_pages<G: Gateway + ?Sized>(gateway: &G, base_url: &str) -> Result<Vec<Value>, ControlRoomError> {
    let mut cursor = PageCursor::new(gateway, base_url);
    let mut items = Vec::new();
    while let Some(page) = cursor.next_page().await {
        items.extend(page?.data);
    }
    debug!(pages = cursor.pages_fetched(), items = items.len(), "listing drained");
    Ok(items)
}
