use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::cli::config::ScraperConfig;
use crate::html::{LinkRewriter, RewriteError};
use crate::http::{FetchError, PageFetcher, UrlProbe};
use crate::storage::{DocumentStore, StorageError};
use crate::task::key::TaskKey;

const QUITTING: &str = "No need to start, quitting.";

/// How a single run ended
#[derive(Debug)]
pub enum Outcome {
    /// A local copy already exists
    Cached { path: PathBuf },

    /// The remote page did not answer the probe
    Unreachable { url: String },

    FetchFailed { url: String, error: FetchError },

    /// The page came back without a content region
    NoContent { url: String, error: RewriteError },

    PersistFailed { path: PathBuf, error: StorageError },

    Saved { path: PathBuf },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Cached { path } => write!(f, "already cached at {}", path.display()),
            Outcome::Unreachable { url } => write!(f, "{} is not available", url),
            Outcome::FetchFailed { url, error } => write!(f, "fetching {} failed: {}", url, error),
            Outcome::NoContent { url, error } => write!(f, "{}: {}", url, error),
            Outcome::PersistFailed { path, error } => {
                write!(f, "saving {} failed: {}", path.display(), error)
            }
            Outcome::Saved { path } => write!(f, "saved to {}", path.display()),
        }
    }
}

/// Fetches a task page once and keeps the rewritten copy on disk
pub struct TaskCache {
    base_url: String,
    origin: String,
    output_root: PathBuf,
    extension: String,
    probe: UrlProbe,
    fetcher: PageFetcher,
    rewriter: LinkRewriter,
    store: Arc<dyn DocumentStore>,
}

impl TaskCache {
    pub fn new(config: &ScraperConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let probe = UrlProbe::new(&config.http.user_agent, config.http.probe_timeout())?;
        let fetcher = PageFetcher::new(&config.http.user_agent, config.http.fetch_timeout())?;
        let rewriter = LinkRewriter::new(&config.site.content_selector)?;

        Ok(Self {
            base_url: config.site.base_url.clone(),
            origin: config.site_origin()?,
            output_root: config.output.root.clone(),
            extension: config.output.extension.clone(),
            probe,
            fetcher,
            rewriter,
            store,
        })
    }

    /// Run the fetch, rewrite and persist pipeline for `key`.
    ///
    /// Never fails: every way the run can end is an [`Outcome`].
    pub async fn run(&self, key: TaskKey) -> Outcome {
        let location = key.location(&self.base_url, &self.output_root, &self.extension);
        let path = location.local_path;
        let url = location.remote_url;

        if self.store.exists(&path).await {
            debug!("Task {} already cached at {}", key, path.display());
            info!("{}", QUITTING);
            return Outcome::Cached { path };
        }

        if !self.probe.probe(&url).await {
            debug!("Task {} is not available at {}", key, url);
            info!("{}", QUITTING);
            return Outcome::Unreachable { url };
        }

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(error) => return Outcome::FetchFailed { url, error },
        };

        let document = match self.rewriter.rewrite(&html, &self.origin) {
            Ok(document) => document,
            Err(error) => {
                error!("An error occurred: {}", error);
                return Outcome::NoContent { url, error };
            }
        };

        match self.store.save(&path, &document).await {
            Ok(()) => {
                info!("Saved to {}.", path.display());
                Outcome::Saved { path }
            }
            Err(error) => {
                error!("{}", error);
                Outcome::PersistFailed { path, error }
            }
        }
    }
}
