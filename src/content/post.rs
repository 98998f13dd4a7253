//! Post models
//!
//! All of these are read-only projections of provider data, shaped for a
//! single render and never persisted locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::richtext::RichTextNode;

/// A post as it appears on the listing page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostSummary {
    /// Unique identifier (slug), the `/post/{uid}` path segment
    pub uid: String,

    /// First publication timestamp; the provider may omit it
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Post title
    pub title: String,

    /// Post subtitle
    pub subtitle: String,

    /// Post author
    pub author: String,
}

/// A fully resolved post, as rendered on its own page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDetail {
    /// Provider document id, used to exclude this post from neighbor queries
    pub id: String,

    /// Unique identifier (slug)
    pub uid: String,

    /// First publication timestamp
    pub first_publication_date: Option<DateTime<Utc>>,

    /// Last modification timestamp, used only for the "edited" marker
    pub last_publication_date: Option<DateTime<Utc>>,

    /// Post title
    pub title: String,

    /// Post subtitle
    pub subtitle: String,

    /// Post author
    pub author: String,

    /// Banner image URL
    pub banner_url: Option<String>,

    /// Ordered content blocks, rich text kept unmodified until render time
    pub content: Vec<ContentBlock>,
}

/// A heading plus its rich-text body fragments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentBlock {
    pub heading: String,
    pub body: Vec<RichTextNode>,
}

impl PostDetail {
    /// The listing projection of this post
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            uid: self.uid.clone(),
            first_publication_date: self.first_publication_date,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
        }
    }

    /// Whether the post was modified after publication.
    ///
    /// True only when the last modification is strictly after the first
    /// publication; equal timestamps mean "never edited".
    pub fn is_edited(&self) -> bool {
        match (self.first_publication_date, self.last_publication_date) {
            (Some(first), Some(last)) => last > first,
            _ => false,
        }
    }

    /// Estimated reading time at 200 words per minute, never below one.
    pub fn reading_minutes(&self) -> usize {
        let words: usize = self
            .content
            .iter()
            .map(|block| {
                block.heading.split_whitespace().count()
                    + block
                        .body
                        .iter()
                        .map(|node| node.text.split_whitespace().count())
                        .sum::<usize>()
            })
            .sum();
        words.div_ceil(200).max(1)
    }
}

/// A chronologically adjacent post, minimal projection for navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeighborRef {
    pub uid: String,
    pub title: String,
}

/// The output of post-detail resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPost {
    pub post: PostDetail,
    /// The chronologically previous post, absent for the oldest post
    pub previous: Option<NeighborRef>,
    /// The chronologically next post, absent for the newest post
    pub next: Option<NeighborRef>,
}
