//! Cursor-driven pagination.
//!
//! [`collect_all`] walks every page of a cursor-paginated endpoint and
//! returns the concatenated items; [`page_stream`] yields the same pages
//! lazily. Both are strictly sequential since each request depends on the
//! cursor of the previous response.
//!
//! Neither bounds the number of round-trips. Callers that need bounded memory
//! should use the stream or the single-page operation directly.

use std::future::Future;

use futures_util::Stream;
use futures_util::stream;

use crate::error::Result;

/// One page of a cursor-paginated result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items reported by the server.
    pub total: u64,
    /// Page size the server applied.
    pub limit: u64,
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// The cursor for the following page, if the server returned a non-empty
    /// one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some()
    }
}

/// What to do when a page has no items but still carries a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPagePolicy {
    /// Treat the empty page as the end.
    #[default]
    Stop,
    /// Follow the cursor anyway.
    Continue,
}

fn next_cursor<T>(page: &Page<T>, policy: EmptyPagePolicy) -> Option<String> {
    let cursor = page.next_cursor()?;
    if page.items.is_empty() && policy == EmptyPagePolicy::Stop {
        return None;
    }
    Some(cursor.to_string())
}

/// Fetches every page and returns all items in server order.
///
/// `fetch` is called first with `None`, then with each returned cursor. Any
/// page error aborts the walk and is returned as is; items gathered so far
/// are dropped.
pub async fn collect_all<T, F, Fut>(mut fetch: F, policy: EmptyPagePolicy) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = None;

    loop {
        let page = fetch(cursor.take()).await?;
        let next = next_cursor(&page, policy);
        items.extend(page.items);

        match next {
            Some(c) => cursor = Some(c),
            None => return Ok(items),
        }
    }
}

enum Position {
    Start,
    At(String),
    Done,
}

/// Lazily yields pages using the same stop rules as [`collect_all`].
///
/// The stream ends after the last page or after the first error.
pub fn page_stream<T, F, Fut>(fetch: F, policy: EmptyPagePolicy) -> impl Stream<Item = Result<Page<T>>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    stream::try_unfold((fetch, Position::Start), move |(mut fetch, position)| async move {
        let cursor = match position {
            Position::Start => None,
            Position::At(cursor) => Some(cursor),
            Position::Done => return Ok(None),
        };

        let page = fetch(cursor).await?;
        let position = match next_cursor(&page, policy) {
            Some(cursor) => Position::At(cursor),
            None => Position::Done,
        };
        Ok::<_, crate::error::Error>(Some((page, (fetch, position))))
    })
}
