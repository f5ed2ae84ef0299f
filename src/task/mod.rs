pub mod cache;
pub mod key;

// Re-export common types
pub use cache::TaskCache;
pub use key::{SystemDate, TaskKey};
