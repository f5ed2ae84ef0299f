pub mod pretty;
pub mod rewrite;

// Re-export common types
pub use rewrite::{LinkRewriter, RewriteError, CONTENT_SELECTOR};
