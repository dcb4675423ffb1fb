//! Retrying network fetcher.
//!
//! The HTTP call itself sits behind the [`HttpGet`] trait so the retry loop
//! can be exercised against scripted responses in tests; production code
//! uses [`HttpFetchClient`] over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Default attempt budget for one resource.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default spacing between attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Minimal view of an HTTP response: status plus text body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Result of one transport-level GET.
pub type TransportResult =
    std::result::Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>>;

/// One HTTP GET. Implementations must not retry; retry policy lives in
/// [`Fetcher`].
#[async_trait]
pub trait HttpGet: Send + Sync {
    /// Issue a single GET. A transport failure (timeout, refused
    /// connection) is an `Err`; the fetcher treats it the same as a non-200
    /// status.
    async fn get(&self, url: &str) -> TransportResult;
}

/// Production [`HttpGet`] over a shared `reqwest` client.
pub struct HttpFetchClient {
    client: reqwest::Client,
}

impl Default for HttpFetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetchClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Use a pre-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpGet for HttpFetchClient {
    async fn get(&self, url: &str) -> TransportResult {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Fetches one resource, retrying every non-success identically.
///
/// The policy is deliberately undifferentiated: 403, 429, 5xx and transport
/// errors all consume one attempt and wait the same fixed interval: no
/// exponential backoff, no jitter. After the attempt budget is spent the
/// fetch fails with [`FetchError::Exhausted`].
pub struct Fetcher<C: HttpGet> {
    client: C,
    max_attempts: u32,
    retry_interval: Duration,
}

impl<C: HttpGet> Fetcher<C> {
    /// Create a fetcher with the default budget (5 attempts, 1s apart).
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Override the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Override the spacing between attempts. Tests use millisecond spacing.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Fetch `url`, returning the first successful body.
    ///
    /// Suspends only the owning task between attempts; sibling fetches are
    /// unaffected.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        for attempt in 1..=self.max_attempts {
            match self.client.get(url).await {
                Ok(response) if response.is_success() => {
                    debug!(url = %url, attempt, "fetch succeeded");
                    return Ok(response.body);
                }
                Ok(response) => {
                    debug!(url = %url, attempt, status = response.status, "non-success response");
                }
                Err(e) => {
                    debug!(url = %url, attempt, error = %e, "transport error");
                }
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.retry_interval).await;
            }
        }
        warn!(url = %url, attempts = self.max_attempts, "fetch exhausted");
        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedHttp;

    fn fast_fetcher(http: ScriptedHttp) -> Fetcher<ScriptedHttp> {
        Fetcher::new(http).with_retry_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn returns_body_on_first_success() {
        let http = ScriptedHttp::new().with_response("http://x/a", 200, "payload");
        let fetcher = fast_fetcher(http.clone());

        let body = fetcher.fetch("http://x/a").await.unwrap();

        assert_eq!(body, "payload");
        assert_eq!(http.attempts("http://x/a"), 1);
    }

    #[tokio::test]
    async fn retries_until_success_within_budget() {
        let http = ScriptedHttp::new()
            .with_response("http://x/a", 429, "throttled")
            .with_response("http://x/a", 429, "throttled")
            .with_response("http://x/a", 403, "forbidden")
            .with_response("http://x/a", 200, "payload");
        let fetcher = fast_fetcher(http.clone());

        let body = fetcher.fetch("http://x/a").await.unwrap();

        assert_eq!(body, "payload");
        assert_eq!(http.attempts("http://x/a"), 4);
    }

    #[tokio::test]
    async fn exhausts_after_exactly_five_attempts() {
        let http = ScriptedHttp::new().with_default(429, "throttled");
        let fetcher = fast_fetcher(http.clone());

        let err = fetcher.fetch("http://x/a").await.unwrap_err();

        match err {
            FetchError::Exhausted { url, attempts } => {
                assert_eq!(url, "http://x/a");
                assert_eq!(attempts, 5);
            }
        }
        assert_eq!(http.attempts("http://x/a"), 5);
    }

    #[tokio::test]
    async fn transport_errors_consume_attempts_like_bad_statuses() {
        // No scripted response at all: every get reports a transport error.
        let http = ScriptedHttp::new();
        let fetcher = fast_fetcher(http.clone());

        let err = fetcher.fetch("http://x/gone").await.unwrap_err();

        assert!(matches!(err, FetchError::Exhausted { attempts: 5, .. }));
        assert_eq!(http.attempts("http://x/gone"), 5);
    }

    #[tokio::test]
    async fn success_on_final_attempt_is_still_success() {
        let http = ScriptedHttp::new()
            .with_response("http://x/a", 429, "")
            .with_response("http://x/a", 429, "")
            .with_response("http://x/a", 429, "")
            .with_response("http://x/a", 429, "")
            .with_response("http://x/a", 200, "late");
        let fetcher = fast_fetcher(http.clone());

        assert_eq!(fetcher.fetch("http://x/a").await.unwrap(), "late");
        assert_eq!(http.attempts("http://x/a"), 5);
    }
}
