use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::cli::config::ScraperConfig;
use crate::storage::FilesystemStore;
use crate::task::{TaskCache, TaskKey};

/// Fetch and cache a single task.
///
/// Only setup problems are errors; every pipeline outcome exits cleanly.
/// Failures are logged where they happen.
pub async fn scrape(key: TaskKey, config: &ScraperConfig) -> Result<()> {
    let cache = TaskCache::new(config, Arc::new(FilesystemStore))
        .context("Failed to set up the task cache")?;

    let outcome = cache.run(key).await;
    debug!("Task {}: {}", key, outcome);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_failed_fetch_exits_cleanly_without_writing() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/2023/day/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2023/day/1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = ScraperConfig::default();
        config.site.base_url = server.uri();
        config.output.root = dir.path().to_path_buf();

        let key = TaskKey::new(2023, 1);
        scrape(key, &config).await.unwrap();

        assert!(!key.local_path(dir.path(), "md").exists());
    }

    #[tokio::test]
    async fn test_bad_base_url_is_an_error() {
        let mut config = ScraperConfig::default();
        config.site.base_url = "not a url".to_string();

        assert!(scrape(TaskKey::new(2023, 1), &config).await.is_err());
    }
}
