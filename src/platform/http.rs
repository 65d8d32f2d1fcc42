//! HTTP endpoint probing.
//!
//! # Graceful Degradation
//!
//! - Non-2xx/3xx statuses are returned as a normal [`HttpResponse`]; the
//!   caller decides what counts as healthy
//! - Connection refused / DNS / timeout: returns PreflightError::HttpError
//! - Redirects are not followed, so a 3xx is reported as-is

use crate::PreflightError;
use std::time::{Duration, Instant};
use tracing::debug;

/// HTTP endpoint result
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub latency_ms: u64,
}

impl HttpResponse {
    /// 2xx and 3xx count as a response from a live application.
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }
}

/// Issues GET requests.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, PreflightError>;
}

/// Blocking client backed by ureq.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .redirects(0)
            .build();
        UreqClient { agent }
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<HttpResponse, PreflightError> {
        let start = Instant::now();
        let status_code = match self.agent.get(url).call() {
            Ok(response) => response.status(),
            Err(ureq::Error::Status(code, _)) => code,
            Err(ureq::Error::Transport(e)) => {
                return Err(PreflightError::HttpError {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        };
        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(url, status_code, latency_ms, "http request");
        Ok(HttpResponse {
            status_code,
            latency_ms,
        })
    }
}
