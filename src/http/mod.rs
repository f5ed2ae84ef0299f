pub mod fetcher;
pub mod probe;

// Re-export common types
pub use fetcher::{FetchError, PageFetcher};
pub use probe::UrlProbe;
