//! JSON-backed document store
//!
//! Reads the provider's document export from disk and answers listing and
//! lookup queries over it. Continuation tokens are the follow-up query
//! serialized to JSON; callers treat them as opaque strings.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use super::{normalize_token, Document, ListQuery, PostPage, Provider, SortOrder};
use crate::content::PostDetail;
use crate::error::{Error, Result};

/// An in-memory view over the provider's exported documents
#[derive(Debug)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    /// Load a document export from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Fetch(format!("cannot read {}: {}", path.display(), e)))?;
        let documents: Vec<Document> = serde_json::from_str(&content)
            .map_err(|e| Error::MalformedResponse(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("loaded {} documents from {}", documents.len(), path.display());
        Ok(Self { documents })
    }

    /// Build a store from documents already in memory.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Documents of the given type in the requested publication order.
    /// Undated documents sort last in either direction.
    fn ordered(&self, type_tag: &str, order: SortOrder) -> Vec<&Document> {
        let mut docs: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| d.doc_type == type_tag)
            .collect();

        docs.sort_by(|a, b| match (a.first_publication_date, b.first_publication_date) {
            (Some(x), Some(y)) => match order {
                SortOrder::PublishedAsc => x.cmp(&y),
                SortOrder::PublishedDesc => y.cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        docs
    }

    fn execute(&self, query: &ListQuery) -> Result<PostPage> {
        let ordered = self.ordered(&query.type_tag, query.order);

        // `after` excludes everything up to and including the named
        // document, in the requested ordering
        let scoped: &[&Document] = match &query.after {
            Some(after_id) => match ordered.iter().position(|d| &d.id == after_id) {
                Some(pos) => &ordered[pos + 1..],
                None => &ordered[..],
            },
            None => &ordered[..],
        };

        let start = query.page.saturating_sub(1) * query.page_size;
        let window = scoped
            .iter()
            .skip(start)
            .take(query.page_size)
            .map(|d| d.summary())
            .collect::<Result<Vec<_>>>()?;

        let next_page = if start + query.page_size < scoped.len() {
            let next = ListQuery {
                page: query.page + 1,
                ..query.clone()
            };
            Some(serde_json::to_string(&next).expect("list query serializes to JSON"))
        } else {
            None
        };

        Ok(PostPage {
            results: window,
            next_page,
        })
    }
}

#[async_trait]
impl Provider for DocumentStore {
    async fn list(&self, query: ListQuery) -> Result<PostPage> {
        self.execute(&query)
    }

    async fn next_page(&self, token: &str) -> Result<PostPage> {
        let query: ListQuery = serde_json::from_str(token)
            .map_err(|e| Error::MalformedResponse(format!("invalid continuation token: {}", e)))?;
        self.execute(&query)
    }

    async fn get_by_uid(&self, type_tag: &str, uid: &str) -> Result<PostDetail> {
        self.documents
            .iter()
            .find(|d| d.doc_type == type_tag && d.uid.as_deref() == Some(uid))
            .ok_or_else(|| Error::NotFound(uid.to_string()))?
            .detail()
    }
}
