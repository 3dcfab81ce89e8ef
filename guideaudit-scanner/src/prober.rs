use crate::error::Result;
use crate::result::ProbeResult;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Issues live GET requests and records where they end up after redirects
pub struct Prober {
    client: Client,
    timeout_secs: u64,
}

impl Prober {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS, DEFAULT_MAX_REDIRECTS)
    }

    pub fn with_timeout(timeout_secs: u64, max_redirects: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("guideaudit/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// GET `url`, following redirects.
    ///
    /// Transport failures (refused, timed out, too many redirects) are
    /// returned as a `ProbeResult` carrying the error text, never dropped.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        debug!("Probing {}", url);

        let start = Instant::now();
        match self.client.get(url).send().await {
            Ok(response) => {
                let mut result = ProbeResult::new(url.to_string());
                result.final_url = Some(response.url().to_string());
                result.status_code = response.status().as_u16();
                result.response_time = start.elapsed();
                debug!(
                    "{} -> {} ({}) in {:?}",
                    url,
                    response.url(),
                    result.status_code,
                    result.response_time
                );
                result
            }
            Err(e) => {
                warn!("Probe failed for {}: {}", url, e);
                let mut result = ProbeResult::with_error(url.to_string(), e.to_string());
                result.response_time = start.elapsed();
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    #[tokio::test]
    async fn test_probe_unchanged_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/biology"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let prober = Prober::new().unwrap();
        let url = format!("{}/biology", mock_server.uri());
        let result = prober.probe(&url).await;

        assert_eq!(result.status_code, 200);
        assert_eq!(result.final_url.as_deref(), Some(url.as_str()));
        assert_eq!(result.redirected_to(), None);
        assert!(!result.is_failure());
    }

    #[tokio::test]
    async fn test_probe_follows_redirect() {
        let mock_server = MockServer::start().await;
        let target = format!("{}/subjects/biology", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/biology"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/subjects/biology"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let prober = Prober::new().unwrap();
        let result = prober.probe(&format!("{}/biology", mock_server.uri())).await;

        assert_eq!(result.status_code, 200);
        assert_eq!(result.redirected_to(), Some(target.as_str()));
    }

    #[tokio::test]
    async fn test_probe_keeps_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let prober = Prober::new().unwrap();
        let result = prober.probe(&format!("{}/gone", mock_server.uri())).await;

        assert_eq!(result.status_code, 404);
        assert!(!result.is_failure());
    }

    #[tokio::test]
    async fn test_probe_timeout_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let prober = Prober::with_timeout(1, DEFAULT_MAX_REDIRECTS).unwrap();
        let result = prober.probe(&format!("{}/slow", mock_server.uri())).await;

        assert!(result.is_failure());
        assert_eq!(result.status_code, 0);
        assert!(result.final_url.is_none());
    }

    #[tokio::test]
    async fn test_probe_unreachable_host() {
        let prober = Prober::with_timeout(2, DEFAULT_MAX_REDIRECTS).unwrap();
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let result = prober.probe("http://127.0.0.1:9/nothing").await;

        assert!(result.is_failure());
        assert!(result.error.is_some());
    }
}
