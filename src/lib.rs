//! travelog: a blog front-end for headless CMS content
//!
//! This crate renders a paginated post listing and individual post pages
//! from documents supplied by a headless content provider. The provider is
//! reached through the [`provider::Provider`] trait; the shipped
//! implementation reads the provider's JSON document export.

pub mod comments;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod listing;
pub mod pages;
pub mod provider;
pub mod resolver;
pub mod server;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Result};

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use listing::ListingController;
use provider::store::DocumentStore;
use provider::Provider;
use resolver::PostResolver;

/// The main travelog application
pub struct Travelog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
}

impl Travelog {
    /// Create a new instance from a directory, loading `travelog.yml` when
    /// present.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("travelog.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self { config, base_dir })
    }

    /// Open the configured document store.
    pub fn document_store(&self) -> anyhow::Result<Arc<dyn Provider>> {
        let path = self.base_dir.join(&self.config.provider.documents);
        let store = DocumentStore::load(&path)
            .with_context(|| format!("opening document store at {}", path.display()))?;
        Ok(Arc::new(store))
    }

    /// Build the listing controller over the initial listing page.
    pub async fn listing(&self, provider: Arc<dyn Provider>) -> Result<ListingController> {
        ListingController::bootstrap(
            provider,
            &self.config.provider.type_tag,
            self.config.provider.page_size,
        )
        .await
    }

    /// Build the post resolver with the configured freshness window.
    pub fn resolver(&self, provider: Arc<dyn Provider>) -> PostResolver {
        PostResolver::new(
            provider,
            &self.config.provider.type_tag,
            Duration::from_secs(self.config.freshness_secs),
        )
    }
}
