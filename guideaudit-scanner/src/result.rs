use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Outcome of one live GET with redirects followed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    pub final_url: Option<String>,
    pub status_code: u16,
    pub response_time: Duration,
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn new(url: String) -> Self {
        Self {
            url,
            final_url: None,
            status_code: 0,
            response_time: Duration::from_secs(0),
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            url,
            final_url: None,
            status_code: 0,
            response_time: Duration::from_secs(0),
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// The final URL when it differs from the requested one.
    ///
    /// Both sides are compared as parsed URLs, so `https://host` and
    /// `https://host/` are the same location.
    pub fn redirected_to(&self) -> Option<&str> {
        let final_url = self.final_url.as_deref()?;
        let same = match (Url::parse(&self.url), Url::parse(final_url)) {
            (Ok(requested), Ok(landed)) => requested == landed,
            _ => self.url == final_url,
        };
        if same { None } else { Some(final_url) }
    }
}
