//! Post detail resolution
//!
//! Given a slug, fetch the backing document, then its chronological
//! neighbors, and assemble a render-ready structure. Results are held in a
//! per-slug cache for a bounded freshness window; serving a resolution up
//! to that age is acceptable by contract.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::content::{NeighborRef, ResolvedPost};
use crate::error::{Error, Result};
use crate::provider::{ListQuery, Provider, SortOrder};

struct CachedEntry {
    resolved_at: Instant,
    value: ResolvedPost,
}

/// Resolves slugs into render-ready post structures.
pub struct PostResolver {
    provider: Arc<dyn Provider>,
    type_tag: String,
    freshness: Duration,
    cache: Mutex<HashMap<String, CachedEntry>>,
}

impl PostResolver {
    pub fn new(provider: Arc<dyn Provider>, type_tag: &str, freshness: Duration) -> Self {
        Self {
            provider,
            type_tag: type_tag.to_string(),
            freshness,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a slug into a post plus its chronological neighbors.
    ///
    /// A slug with no backing document is [`Error::NotFound`], never an
    /// empty detail structure. Neighbor lookups that fail degrade to "no
    /// neighbor" since navigation is a secondary enhancement.
    pub async fn resolve(&self, slug: &str) -> Result<ResolvedPost> {
        if slug.is_empty() {
            return Err(Error::NotFound(String::new()));
        }

        if let Some(cached) = self.fresh(slug) {
            tracing::debug!(slug, "serving post from resolver cache");
            return Ok(cached);
        }

        let post = self.provider.get_by_uid(&self.type_tag, slug).await?;

        // The two neighbor queries only depend on the primary document's
        // id, not on each other.
        let (next, previous) = tokio::join!(
            self.neighbor(SortOrder::PublishedAsc, &post.id),
            self.neighbor(SortOrder::PublishedDesc, &post.id),
        );

        let resolved = ResolvedPost {
            post,
            previous,
            next,
        };

        let mut cache = self.cache.lock().expect("resolver cache lock poisoned");
        cache.insert(
            slug.to_string(),
            CachedEntry {
                resolved_at: Instant::now(),
                value: resolved.clone(),
            },
        );

        Ok(resolved)
    }

    /// How long a resolved page may be served stale, in whole seconds.
    pub fn freshness_secs(&self) -> u64 {
        self.freshness.as_secs()
    }

    fn fresh(&self, slug: &str) -> Option<ResolvedPost> {
        let mut cache = self.cache.lock().expect("resolver cache lock poisoned");
        match cache.get(slug) {
            Some(entry) if entry.resolved_at.elapsed() < self.freshness => {
                Some(entry.value.clone())
            }
            Some(_) => {
                cache.remove(slug);
                None
            }
            None => None,
        }
    }

    /// The single chronologically adjacent post in the given direction.
    async fn neighbor(&self, order: SortOrder, after_id: &str) -> Option<NeighborRef> {
        let query = ListQuery::neighbor(&self.type_tag, order, after_id);
        match self.provider.list(query).await {
            Ok(page) => page.results.into_iter().next().map(|p| NeighborRef {
                uid: p.uid,
                title: p.title,
            }),
            Err(e) => {
                tracing::warn!(after_id, error = %e, "neighbor lookup failed, omitting link");
                None
            }
        }
    }
}
