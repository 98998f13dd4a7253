//! Listing page controller
//!
//! Holds the accumulated post summaries and the pagination cursor, and
//! merges follow-up pages on demand. The invariants here are small but
//! load-bearing:
//!
//! - batches append in received order, never reordered
//! - a uid never appears twice, even if the provider repeats one
//! - a failed fetch leaves the list and cursor exactly as they were
//! - at most one load is in flight; concurrent calls are rejected before
//!   any fetch is issued

use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::content::PostSummary;
use crate::provider::{normalize_token, ListQuery, PostPage, Provider};

/// Why a `load_more` call did not merge a page
#[derive(Debug, Error)]
pub enum ListingError {
    /// No cursor is held; the listing is complete.
    #[error("no more pages to load")]
    NoMorePages,

    /// Another load is already in flight.
    #[error("a load is already in flight")]
    LoadInProgress,

    /// The fetch itself failed; accumulated state is unchanged.
    #[error(transparent)]
    Fetch(#[from] crate::error::Error),
}

/// Result of a successful `load_more`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// How many new posts the merged batch contributed
    pub appended: usize,
    /// Whether a further page is available
    pub has_more: bool,
}

struct ListingState {
    /// Accumulated posts keyed by uid; insertion order is display order
    posts: IndexMap<String, PostSummary>,
    next_page: Option<String>,
}

/// The listing page controller.
///
/// Shareable across handlers; all methods take `&self`.
pub struct ListingController {
    provider: Arc<dyn Provider>,
    state: Mutex<ListingState>,
    in_flight: AtomicBool,
}

impl ListingController {
    /// Create a controller over an already-fetched first page.
    pub fn new(
        provider: Arc<dyn Provider>,
        initial: Vec<PostSummary>,
        next_page: Option<String>,
    ) -> Self {
        let mut posts = IndexMap::with_capacity(initial.len());
        for post in initial {
            if posts.insert(post.uid.clone(), post).is_some() {
                tracing::warn!("duplicate uid in initial listing, keeping the later entry");
            }
        }
        Self {
            provider,
            state: Mutex::new(ListingState {
                posts,
                next_page: normalize_token(next_page),
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Create a controller by issuing the initial listing query.
    pub async fn bootstrap(
        provider: Arc<dyn Provider>,
        type_tag: &str,
        page_size: usize,
    ) -> crate::error::Result<Self> {
        let page = provider.list(ListQuery::listing(type_tag, page_size)).await?;
        Ok(Self::new(provider, page.results, page.next_page))
    }

    /// Fetch and merge the next page.
    ///
    /// Rejected without a network call when no cursor is held or another
    /// load is in flight. On fetch failure the held list and cursor are
    /// untouched and the caller may retry.
    pub async fn load_more(&self) -> Result<LoadOutcome, ListingError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ListingError::LoadInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let cursor = {
            let state = self.state.lock().expect("listing state lock poisoned");
            state.next_page.clone()
        };
        let Some(cursor) = cursor else {
            return Err(ListingError::NoMorePages);
        };

        // State is not touched until the fetch has fully succeeded, so a
        // failure here cannot leave a partial merge behind.
        let page: PostPage = self.provider.next_page(&cursor).await?;

        let mut state = self.state.lock().expect("listing state lock poisoned");
        let mut appended = 0;
        for post in page.results {
            if state.posts.contains_key(&post.uid) {
                tracing::warn!(uid = %post.uid, "provider repeated a post across pages, skipping");
                continue;
            }
            state.posts.insert(post.uid.clone(), post);
            appended += 1;
        }
        state.next_page = normalize_token(page.next_page);

        Ok(LoadOutcome {
            appended,
            has_more: state.next_page.is_some(),
        })
    }

    /// The current accumulated posts, in display order.
    pub fn posts(&self) -> Vec<PostSummary> {
        let state = self.state.lock().expect("listing state lock poisoned");
        state.posts.values().cloned().collect()
    }

    /// Whether a further page is available. True iff a cursor is held.
    pub fn has_more(&self) -> bool {
        let state = self.state.lock().expect("listing state lock poisoned");
        state.next_page.is_some()
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock().expect("listing state lock poisoned");
        state.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clears the in-flight flag when the load finishes, errors out, or the
/// future is dropped mid-fetch.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testutil::ScriptedProvider;
    use std::sync::atomic::Ordering as AtomicOrdering;

    fn summary(uid: &str) -> PostSummary {
        PostSummary {
            uid: uid.to_string(),
            first_publication_date: None,
            title: format!("Post {}", uid),
            subtitle: "sub".to_string(),
            author: "Jane".to_string(),
        }
    }

    fn page(uids: &[&str], next: Option<&str>) -> PostPage {
        PostPage {
            results: uids.iter().map(|u| summary(u)).collect(),
            next_page: next.map(str::to_string),
        }
    }

    fn uids(controller: &ListingController) -> Vec<String> {
        controller.posts().into_iter().map(|p| p.uid).collect()
    }

    #[tokio::test]
    async fn test_load_more_appends_in_call_order() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page(Ok(page(&["c", "d"], Some("page3"))));
        provider.push_page(Ok(page(&["e"], None)));

        let controller =
            ListingController::new(provider, page(&["a", "b"], None).results, Some("page2".into()));

        controller.load_more().await.unwrap();
        assert_eq!(uids(&controller), ["a", "b", "c", "d"]);

        controller.load_more().await.unwrap();
        assert_eq!(uids(&controller), ["a", "b", "c", "d", "e"]);
        assert!(!controller.has_more());
    }

    #[tokio::test]
    async fn test_spec_example_scenario() {
        // initial [a, b] with cursor "page2"; the next page returns [c]
        // and an empty cursor
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page(Ok(page(&["c"], Some(""))));

        let controller =
            ListingController::new(provider, page(&["a", "b"], None).results, Some("page2".into()));
        assert!(controller.has_more());

        let outcome = controller.load_more().await.unwrap();
        assert_eq!(outcome.appended, 1);
        assert!(!outcome.has_more);
        assert_eq!(uids(&controller), ["a", "b", "c"]);
        assert!(!controller.has_more());
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_state_unchanged() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page(Err(Error::Fetch("connection reset".into())));
        provider.push_page(Ok(page(&["c"], None)));

        let controller =
            ListingController::new(provider, page(&["a", "b"], None).results, Some("page2".into()));

        let err = controller.load_more().await.unwrap_err();
        assert!(matches!(err, ListingError::Fetch(_)));
        assert_eq!(uids(&controller), ["a", "b"]);
        assert!(controller.has_more());

        // the caller may retry with the same cursor
        controller.load_more().await.unwrap();
        assert_eq!(uids(&controller), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_load_more_without_cursor_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new());
        let controller = ListingController::new(provider.clone(), vec![summary("a")], None);

        assert!(!controller.has_more());
        let err = controller.load_more().await.unwrap_err();
        assert!(matches!(err, ListingError::NoMorePages));
        // no fetch was issued
        assert_eq!(provider.page_calls.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_string_cursor_means_no_more_pages() {
        let provider = Arc::new(ScriptedProvider::new());
        let controller = ListingController::new(provider, vec![summary("a")], Some(String::new()));
        assert!(!controller.has_more());
        assert!(matches!(
            controller.load_more().await.unwrap_err(),
            ListingError::NoMorePages
        ));
    }

    #[tokio::test]
    async fn test_duplicate_uid_from_later_page_is_skipped() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page(Ok(page(&["b", "c"], None)));

        let controller =
            ListingController::new(provider, page(&["a", "b"], None).results, Some("page2".into()));

        let outcome = controller.load_more().await.unwrap();
        assert_eq!(outcome.appended, 1);
        assert_eq!(uids(&controller), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_concurrent_load_is_rejected_without_a_second_fetch() {
        let (provider, gate) = ScriptedProvider::gated();
        provider.push_page(Ok(page(&["c"], None)));
        let provider = Arc::new(provider);

        let controller = Arc::new(ListingController::new(
            provider.clone(),
            page(&["a", "b"], None).results,
            Some("page2".into()),
        ));

        let racing = controller.clone();
        let first = tokio::spawn(async move { racing.load_more().await });

        // wait for the first call to reach the provider and park on the gate
        while provider.page_calls.load(AtomicOrdering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let err = controller.load_more().await.unwrap_err();
        assert!(matches!(err, ListingError::LoadInProgress));
        assert_eq!(provider.page_calls.load(AtomicOrdering::SeqCst), 1);

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(uids(&controller), ["a", "b", "c"]);

        // with the first load finished, loading is permitted again
        assert!(matches!(
            controller.load_more().await.unwrap_err(),
            ListingError::NoMorePages
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_issues_initial_query() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_page(Ok(page(&["a", "b"], Some("page2"))));

        let controller = ListingController::bootstrap(provider, "posts", 20)
            .await
            .unwrap();
        assert_eq!(uids(&controller), ["a", "b"]);
        assert!(controller.has_more());
    }
}
