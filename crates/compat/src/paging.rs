//! Chunked-result aggregation: drives one logical query across a server
//! that only answers in bounded pages.
//!
//! UCMDB endpoints paginate in three styles: explicit continuation tokens,
//! numeric offsets where exhaustion shows up as a short or empty page, and
//! numbered chunks (which the adapter re-expresses as tokens). The
//! [`ResultChunk`]/[`Continuation`] contract carries enough information per
//! page for [`collect`] to decide termination without special-casing any of
//! them.

use std::future::Future;
use std::num::NonZeroUsize;

use crate::errors::AggregationError;

/// Position of the next page within a logical query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// Numeric offset into the result set, in entries.
    Offset(u64),
    /// Opaque continuation token handed out by the server.
    Token(String),
}

/// What the server said about further data after one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// An explicit cursor for the next page; more data remains.
    Token(String),
    /// The server explicitly reported exhaustion.
    Finished,
    /// The endpoint does not report continuation state; termination falls
    /// back to the short-chunk rule against the size hint.
    Unreported,
}

/// One bounded page of results plus its continuation indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultChunk<T> {
    /// The page's entries, in server order.
    pub entries: Vec<T>,
    /// Whether further pages remain.
    pub continuation: Continuation,
}

impl<T> ResultChunk<T> {
    /// A page followed by an explicit next-page token.
    pub fn next(entries: Vec<T>, token: impl Into<String>) -> Self {
        Self {
            entries,
            continuation: Continuation::Token(token.into()),
        }
    }

    /// A page the server marked as the last one.
    pub fn finished(entries: Vec<T>) -> Self {
        Self {
            entries,
            continuation: Continuation::Finished,
        }
    }

    /// A page from an endpoint that reports no continuation state.
    pub fn unreported(entries: Vec<T>) -> Self {
        Self {
            entries,
            continuation: Continuation::Unreported,
        }
    }
}

/// The ordered concatenation of every chunk collected for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResult<T> {
    /// Entries in the order their chunks arrived, which is the order the
    /// page fetcher was invoked. No global sort is imposed.
    pub entries: Vec<T>,
    /// Number of chunks fetched successfully.
    pub chunks: usize,
}

impl<T> AggregatedResult<T> {
    /// Total number of collected entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the result, yielding the entries.
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

/// Collects every page of a logical query into one [`AggregatedResult`].
///
/// `fetch` performs one bounded page fetch; `chunk_size_hint` is passed
/// through to it and is advisory — a server returning fewer entries than
/// the hint is not an error, it is (for endpoints with [`Continuation::Unreported`])
/// the signal that the query is exhausted. `max_chunks` is a safety cap on
/// total work: reaching it with data still outstanding fails with
/// [`AggregationError::ChunkLimit`] rather than truncating silently.
///
/// Fetches are strictly sequential — no prefetch, no reordering — and the
/// cursor advances per chunk: an explicit token is adopted as-is, a numeric
/// offset grows by the number of entries received. A given record is never
/// emitted twice, and entries from completed chunks are never dropped: a
/// fetch failure after one or more successful chunks fails with
/// [`AggregationError::Fetch`] carrying the partial result. Cancelling an
/// in-flight fetch surfaces through the same path, as that fetch's error.
pub async fn collect<T, E, F, Fut>(
    mut fetch: F,
    start: PageCursor,
    chunk_size_hint: NonZeroUsize,
    max_chunks: NonZeroUsize,
) -> Result<AggregatedResult<T>, AggregationError<T, E>>
where
    F: FnMut(PageCursor, NonZeroUsize) -> Fut,
    Fut: Future<Output = Result<ResultChunk<T>, E>>,
{
    let mut result = AggregatedResult {
        entries: Vec::new(),
        chunks: 0,
    };
    let mut cursor = start;

    loop {
        let chunk = match fetch(cursor.clone(), chunk_size_hint).await {
            Ok(chunk) => chunk,
            Err(source) => {
                return Err(AggregationError::Fetch {
                    partial: result,
                    source,
                })
            }
        };
        let received = chunk.entries.len();
        result.entries.extend(chunk.entries);
        result.chunks += 1;
        tracing::trace!(
            chunk = result.chunks,
            received,
            total = result.entries.len(),
            "collected one page"
        );

        match chunk.continuation {
            Continuation::Finished => return Ok(result),
            Continuation::Token(token) => {
                if result.chunks >= max_chunks.get() {
                    return Err(AggregationError::ChunkLimit {
                        partial: result,
                        limit: max_chunks,
                    });
                }
                cursor = PageCursor::Token(token);
            }
            Continuation::Unreported => {
                // Short or empty chunk: the implicit exhaustion signal.
                if received == 0 || received < chunk_size_hint.get() {
                    return Ok(result);
                }
                if result.chunks >= max_chunks.get() {
                    return Err(AggregationError::ChunkLimit {
                        partial: result,
                        limit: max_chunks,
                    });
                }
                cursor = match cursor {
                    PageCursor::Offset(offset) => PageCursor::Offset(offset + received as u64),
                    // A token cursor cannot advance without a fresh token.
                    PageCursor::Token(_) => return Ok(result),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HINT_50: NonZeroUsize = match NonZeroUsize::new(50) {
        Some(n) => n,
        None => unreachable!(),
    };
    const CAP_10: NonZeroUsize = match NonZeroUsize::new(10) {
        Some(n) => n,
        None => unreachable!(),
    };

    #[derive(Debug, thiserror::Error)]
    #[error("page fetch exploded")]
    struct Boom;

    /// Serves pages of the given sizes with `Unreported` continuation,
    /// numbering entries consecutively so order can be asserted.
    fn offset_pages<'a>(
        sizes: &'static [usize],
        calls: &'a AtomicUsize,
    ) -> impl FnMut(PageCursor, NonZeroUsize) -> std::future::Ready<Result<ResultChunk<u64>, Boom>>
           + 'a {
        move |cursor, _hint| {
            let page = calls.fetch_add(1, Ordering::SeqCst);
            let PageCursor::Offset(offset) = cursor else {
                panic!("expected an offset cursor");
            };
            let size = sizes.get(page).copied().unwrap_or(0);
            let entries = (offset..offset + size as u64).collect();
            std::future::ready(Ok(ResultChunk::unreported(entries)))
        }
    }

    #[tokio::test]
    async fn short_final_chunk_terminates_offset_paging() {
        let calls = AtomicUsize::new(0);
        let result = collect(
            offset_pages(&[50, 50, 30], &calls),
            PageCursor::Offset(0),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 130);
        assert_eq!(result.chunks, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Entries arrive in fetch order with the offset advancing by the
        // received count, so they are exactly 0..130.
        assert!(result.entries.iter().copied().eq(0..130));
    }

    #[tokio::test]
    async fn empty_first_chunk_means_one_call_and_no_entries() {
        let calls = AtomicUsize::new(0);
        let result = collect(
            offset_pages(&[0], &calls),
            PageCursor::Offset(0),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.chunks, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exact_multiple_ends_on_the_empty_chunk() {
        let calls = AtomicUsize::new(0);
        let result = collect(
            offset_pages(&[50, 50], &calls),
            PageCursor::Offset(0),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 100);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn mid_stream_failure_preserves_the_partial_result() {
        let calls = AtomicUsize::new(0);
        let err = collect(
            |cursor, _hint| {
                let page = calls.fetch_add(1, Ordering::SeqCst);
                std::future::ready(match page {
                    0 => {
                        let PageCursor::Offset(offset) = cursor else {
                            panic!("expected an offset cursor");
                        };
                        Ok(ResultChunk::unreported(
                            (offset..offset + 50).collect::<Vec<u64>>(),
                        ))
                    }
                    _ => Err(Boom),
                })
            },
            PageCursor::Offset(0),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap_err();

        match err {
            AggregationError::Fetch { partial, source: _ } => {
                assert_eq!(partial.len(), 50);
                assert_eq!(partial.chunks, 1);
            }
            other => panic!("expected a fetch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_on_the_first_fetch_carries_an_empty_partial() {
        let err = collect(
            |_cursor: PageCursor, _hint| std::future::ready(Err::<ResultChunk<u64>, _>(Boom)),
            PageCursor::Offset(0),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap_err();

        assert!(err.partial().is_empty());
    }

    #[tokio::test]
    async fn token_continuation_is_followed_until_finished() {
        let err_free = collect(
            |cursor, _hint| {
                std::future::ready(Ok::<_, Infallible>(match cursor {
                    PageCursor::Token(t) if t == "start" => {
                        ResultChunk::next(vec!["a", "b"], "page-2")
                    }
                    PageCursor::Token(t) if t == "page-2" => {
                        // An empty page with an explicit token keeps going.
                        ResultChunk::next(vec![], "page-3")
                    }
                    PageCursor::Token(t) if t == "page-3" => ResultChunk::finished(vec!["c"]),
                    other => panic!("unexpected cursor {other:?}"),
                }))
            },
            PageCursor::Token("start".into()),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap();

        assert_eq!(err_free.entries, vec!["a", "b", "c"]);
        assert_eq!(err_free.chunks, 3);
    }

    #[tokio::test]
    async fn chunk_cap_fails_with_the_partial_rather_than_truncating() {
        let cap = NonZeroUsize::new(2).unwrap();
        let err = collect(
            |_cursor, _hint| {
                std::future::ready(Ok::<_, Infallible>(ResultChunk::next(vec![1u64], "again")))
            },
            PageCursor::Token("start".into()),
            HINT_50,
            cap,
        )
        .await
        .unwrap_err();

        match err {
            AggregationError::ChunkLimit { partial, limit } => {
                assert_eq!(partial.len(), 2);
                assert_eq!(limit, cap);
            }
            other => panic!("expected the chunk cap, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreported_continuation_under_a_token_cursor_stops_cleanly() {
        let calls = AtomicUsize::new(0);
        let result = collect(
            |_cursor, _hint| {
                calls.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok::<_, Infallible>(ResultChunk::unreported(vec![0u64; 50])))
            },
            PageCursor::Token("start".into()),
            HINT_50,
            CAP_10,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 50);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
