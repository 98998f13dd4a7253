//! Configuration module

mod site;

pub use site::CommentsConfig;
pub use site::ProviderConfig;
pub use site::SiteConfig;
