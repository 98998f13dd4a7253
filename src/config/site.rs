//! Site configuration (travelog.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Content provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Seconds a resolved post page may be served without re-fetching
    pub freshness_secs: u64,

    // Date format (Moment.js-style, used on post cards and post pages)
    pub date_format: String,

    // Comments widget
    #[serde(default)]
    pub comments: CommentsConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Travelog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            provider: ProviderConfig::default(),
            freshness_secs: 1800,
            date_format: "DD MMM YYYY".to_string(),
            comments: CommentsConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Content provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Path to the provider's JSON document export
    pub documents: String,
    /// Document type tag queried for posts
    pub type_tag: String,
    /// Page size for the listing query
    pub page_size: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            documents: "content/documents.json".to_string(),
            type_tag: "posts".to_string(),
            page_size: 20,
        }
    }
}

/// Comments widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    /// GitHub repository backing the widget, e.g. "user/blog-comments"
    pub repo: String,
    /// How the widget maps a page to a discussion thread
    pub issue_term: String,
    pub label: String,
    pub theme: String,
    /// Element id the widget script is attached to
    pub anchor_id: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            repo: String::new(),
            issue_term: "pathname".to_string(),
            label: "comment".to_string(),
            theme: "photon-dark".to_string(),
            anchor_id: "comments".to_string(),
        }
    }
}
