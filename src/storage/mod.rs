pub mod local;

// Re-export common types
pub use local::{DocumentStore, FilesystemStore, StorageError};

#[cfg(test)]
pub use local::MockDocumentStore;
