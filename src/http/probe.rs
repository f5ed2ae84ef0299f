use anyhow::{Context, Result};
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::debug;

/// HEAD-only reachability check
pub struct UrlProbe {
    client: Client,
}

impl UrlProbe {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        // Redirects are reported, not followed
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to create probe HTTP client")?;

        Ok(Self { client })
    }

    /// True when `url` answers a HEAD request with a 2xx or 3xx status.
    ///
    /// Every failure, including timeouts and refused connections, is
    /// reported as `false`.
    pub async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                let status = response.status();
                debug!("HEAD {} -> {}", url, status);
                status.is_success() || status.is_redirection()
            }
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn probe() -> UrlProbe {
        UrlProbe::new("aoc-scraper-test", Duration::from_secs(5)).unwrap()
    }

    async fn server_answering(status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/2023/day/1"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_success_and_redirect_are_valid() {
        for status in [200, 204, 301, 302] {
            let server = server_answering(status).await;
            let url = format!("{}/2023/day/1", server.uri());
            assert!(probe().probe(&url).await, "status {} should be valid", status);
        }
    }

    #[tokio::test]
    async fn test_client_and_server_errors_are_invalid() {
        for status in [400, 404, 500, 503] {
            let server = server_answering(status).await;
            let url = format!("{}/2023/day/1", server.uri());
            assert!(!probe().probe(&url).await, "status {} should be invalid", status);
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_invalid() {
        // Grab a free port, then close it again
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{}/2023/day/1", port);
        assert!(!probe().probe(&url).await);
    }

    #[tokio::test]
    async fn test_timeout_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let probe = UrlProbe::new("aoc-scraper-test", Duration::from_millis(50)).unwrap();
        let url = format!("{}/2023/day/1", server.uri());
        assert!(!probe.probe(&url).await);
    }

    #[tokio::test]
    async fn test_malformed_url_is_invalid() {
        assert!(!probe().probe("not a url").await);
    }
}
