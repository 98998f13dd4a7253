//! Content provider boundary
//!
//! The blog never talks to the CMS wire protocol directly; everything goes
//! through the [`Provider`] trait. [`store::DocumentStore`] is the shipped
//! implementation, backed by the provider's JSON document export.

pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{ContentBlock, PostDetail, PostSummary, RichTextNode};
use crate::error::{Error, Result};

/// A page of listing results plus the continuation token for the next one
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    /// Results in provider order, preserved as received
    pub results: Vec<PostSummary>,
    /// Continuation token; `None` means no further pages
    pub next_page: Option<String>,
}

/// Sort direction over first publication date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    #[serde(rename = "published_asc")]
    PublishedAsc,
    #[serde(rename = "published_desc")]
    PublishedDesc,
}

/// A listing query against the provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListQuery {
    /// Document type tag, e.g. "posts"
    pub type_tag: String,
    pub page_size: usize,
    /// 1-based page number
    pub page: usize,
    pub order: SortOrder,
    /// Exclude everything up to and including the document with this id,
    /// in the requested ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl ListQuery {
    /// The standard listing query: newest first, page 1
    pub fn listing(type_tag: &str, page_size: usize) -> Self {
        Self {
            type_tag: type_tag.to_string(),
            page_size,
            page: 1,
            order: SortOrder::PublishedDesc,
            after: None,
        }
    }

    /// A single-result neighbor query in the given direction, excluding the
    /// document with `after_id`
    pub fn neighbor(type_tag: &str, order: SortOrder, after_id: &str) -> Self {
        Self {
            type_tag: type_tag.to_string(),
            page_size: 1,
            page: 1,
            order,
            after: Some(after_id.to_string()),
        }
    }
}

/// Normalize a continuation token: the provider conflates "no token" and an
/// empty string, and both mean no further pages.
pub fn normalize_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

/// The query surface the blog consumes from the content provider.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Execute a listing query.
    async fn list(&self, query: ListQuery) -> Result<PostPage>;

    /// Follow a continuation token returned by an earlier page.
    async fn next_page(&self, token: &str) -> Result<PostPage>;

    /// Fetch the document with the given uid, or [`Error::NotFound`].
    async fn get_by_uid(&self, type_tag: &str, uid: &str) -> Result<PostDetail>;
}

/// A provider document as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub last_publication_date: Option<DateTime<Utc>>,
    pub data: DocumentData,
}

/// The content payload of a document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<Banner>,
    pub content: Option<Vec<RawBlock>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Banner {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawBlock {
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Vec<RichTextNode>,
}

impl Document {
    fn require<'a>(&self, field: &str, value: Option<&'a str>) -> Result<&'a str> {
        value.ok_or_else(|| {
            Error::MalformedResponse(format!("document {} is missing {}", self.id, field))
        })
    }

    /// Project this document into a listing summary.
    ///
    /// Missing required fields are reported, never defaulted.
    pub fn summary(&self) -> Result<PostSummary> {
        Ok(PostSummary {
            uid: self.require("uid", self.uid.as_deref())?.to_string(),
            first_publication_date: self.first_publication_date,
            title: self.require("title", self.data.title.as_deref())?.to_string(),
            subtitle: self
                .require("subtitle", self.data.subtitle.as_deref())?
                .to_string(),
            author: self
                .require("author", self.data.author.as_deref())?
                .to_string(),
        })
    }

    /// Project this document into a full post detail.
    pub fn detail(&self) -> Result<PostDetail> {
        let summary = self.summary()?;
        let content = self.data.content.as_ref().ok_or_else(|| {
            Error::MalformedResponse(format!("document {} is missing content", self.id))
        })?;

        let blocks = content
            .iter()
            .map(|block| {
                let heading = block.heading.as_deref().ok_or_else(|| {
                    Error::MalformedResponse(format!(
                        "document {} has a content block without a heading",
                        self.id
                    ))
                })?;
                Ok(ContentBlock {
                    heading: heading.to_string(),
                    body: block.body.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PostDetail {
            id: self.id.clone(),
            uid: summary.uid,
            first_publication_date: self.first_publication_date,
            last_publication_date: self.last_publication_date,
            title: summary.title,
            subtitle: summary.subtitle,
            author: summary.author,
            banner_url: self.data.banner.as_ref().map(|b| b.url.clone()),
            content: blocks,
        })
    }
}
