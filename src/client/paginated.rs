//! Lazy page-by-page traversal of cursor-paginated listings.
//!
//! [`PageStream`] yields the page it was built from, then follows
//! [`TransactionList::next_page`] one request at a time. Nothing is fetched
//! until the stream is polled past the pages already in hand.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::Stream;

use crate::models::TransactionList;
use crate::Result;

/// Page cap used by [`TransactionList::all`].
pub const DEFAULT_MAX_PAGES: usize = 100;

/// A stream of transaction pages.
///
/// Ends after a page reports `has_more = false`, when a page cannot produce
/// a cursor, or after yielding an error.
///
/// # Example
///
/// ```no_run
/// use futures_util::TryStreamExt;
///
/// # async fn example(client: hcb_rs::HcbClient) -> hcb_rs::Result<()> {
/// let first = client.transactions().missing_receipt(Default::default()).await?;
///
/// let mut pages = first.each_page();
/// while let Some(page) = pages.try_next().await? {
///     println!("{} transactions on this page", page.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct PageStream {
    /// Page ready to be yielded.
    current: Option<TransactionList>,
    /// In-flight request for the following page.
    pending_fetch: Option<BoxFuture<'static, Result<TransactionList>>>,
}

impl PageStream {
    pub(crate) fn new(first: TransactionList) -> Self {
        Self {
            current: Some(first),
            pending_fetch: None,
        }
    }
}

impl Stream for PageStream {
    type Item = Result<TransactionList>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if let Some(page) = this.current.take() {
            // The request is only built here; it runs once polled.
            this.pending_fetch = page.next_page_request();
            return Poll::Ready(Some(Ok(page)));
        }

        if let Some(fut) = this.pending_fetch.as_mut() {
            return match fut.as_mut().poll(cx) {
                Poll::Ready(Ok(page)) => {
                    this.pending_fetch = page.next_page_request();
                    Poll::Ready(Some(Ok(page)))
                }
                Poll::Ready(Err(e)) => {
                    this.pending_fetch = None;
                    Poll::Ready(Some(Err(e)))
                }
                Poll::Pending => Poll::Pending,
            };
        }

        Poll::Ready(None)
    }
}

impl std::fmt::Debug for PageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("current", &self.current.as_ref().map(TransactionList::len))
            .field("fetching", &self.pending_fetch.is_some())
            .finish()
    }
}
