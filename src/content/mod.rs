//! Content model: post projections and rich-text rendering

mod post;
pub mod richtext;

pub use post::{ContentBlock, NeighborRef, PostDetail, PostSummary, ResolvedPost};
pub use richtext::{render_html, RichTextNode};
