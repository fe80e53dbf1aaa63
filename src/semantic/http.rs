//! HTTP adapter for a contextual-analysis provider.
//!
//! Wire request/response shapes live entirely inside this adapter; the
//! orchestrator only ever sees the [`SemanticAugmenter`] trait. All failure
//! modes (timeout, malformed response, missing credentials) degrade to an
//! empty result and a `tracing::warn!`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::core::errors::{Result, RunelintError};
use crate::core::findings::{Finding, Severity, SourceTag};
use crate::semantic::provider::{context_window, line_column, SemanticAugmenter};

/// Configuration for [`HttpSemanticProvider`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpProviderConfig {
    /// Endpoint receiving context-analysis requests
    pub endpoint: String,

    /// Bearer token; requests without one fail locally, never on the wire
    pub api_key: Option<String>,

    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Outbound concurrency budget
    pub max_concurrent_requests: usize,

    /// Characters of code included on each side of the token
    pub window_radius: usize,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            request_timeout_ms: 2_000,
            max_concurrent_requests: 3,
            window_radius: 200,
        }
    }
}

/// Uniform request shape sent to the provider.
#[derive(Debug, Serialize)]
struct ContextRequest<'a> {
    code_window: &'a str,
    token: &'a str,
    line: usize,
    column: usize,
}

/// Uniform response shape returned by the provider.
#[derive(Debug, Deserialize)]
struct ContextResponse {
    #[serde(default)]
    findings: Vec<WireFinding>,
    #[serde(default)]
    latency_ms: u64,
}

/// Finding-shaped data as the provider reports it, with offsets relative
/// to the submitted code window.
#[derive(Debug, Deserialize)]
struct WireFinding {
    original: String,
    #[serde(default)]
    suggestion: Option<String>,
    start: usize,
    end: usize,
    #[serde(default)]
    severity: Severity,
    #[serde(default)]
    rule_id: Option<String>,
}

/// Suggestion-only response for [`SemanticAugmenter::suggest`] calls.
#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestion: Option<String>,
}

/// [`SemanticAugmenter`] adapter speaking the uniform HTTP contract.
pub struct HttpSemanticProvider {
    config: HttpProviderConfig,
    client: reqwest::Client,
    budget: Semaphore,
}

impl HttpSemanticProvider {
    /// Create a provider with its own outbound concurrency budget.
    pub fn new(config: HttpProviderConfig) -> Self {
        let budget = Semaphore::new(config.max_concurrent_requests.max(1));
        Self {
            config,
            client: reqwest::Client::new(),
            budget,
        }
    }

    fn provider_host(&self) -> &str {
        if self.config.endpoint.is_empty() {
            "semantic-provider"
        } else {
            &self.config.endpoint
        }
    }

    async fn post<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: for<'de> Deserialize<'de>,
    {
        if self.config.endpoint.is_empty() {
            return Err(RunelintError::external_service(
                self.provider_host(),
                "No endpoint configured",
            ));
        }
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            RunelintError::external_service(self.provider_host(), "Missing credentials")
        })?;

        // Outbound rate limiting: the budget caps in-flight requests.
        let _permit = self
            .budget
            .acquire()
            .await
            .map_err(|_| RunelintError::external_service(self.provider_host(), "Budget closed"))?;

        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), path);

        // The deadline covers the whole exchange, body decode included; a
        // provider that stalls mid-body must not hang the caller.
        let exchange = async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .json(request)
                .send()
                .await?;
            response.error_for_status()?.json::<Resp>().await
        };

        let response = tokio::time::timeout(
            Duration::from_millis(self.config.request_timeout_ms),
            exchange,
        )
        .await
        .map_err(|_| RunelintError::external_service(self.provider_host(), "Request timed out"))?;
        Ok(response?)
    }
}

#[async_trait]
impl SemanticAugmenter for HttpSemanticProvider {
    async fn analyze_context(&self, source: &str, position: usize, token: &str) -> Vec<Finding> {
        let (window, window_start) = context_window(source, position, self.config.window_radius);
        let (line, column) = line_column(source, position);
        let request = ContextRequest {
            code_window: &window,
            token,
            line,
            column,
        };

        let response: ContextResponse = match self.post("analyze", &request).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "semantic context analysis failed");
                return Vec::new();
            }
        };
        debug!(
            findings = response.findings.len(),
            latency_ms = response.latency_ms,
            "semantic context analysis returned"
        );

        let window_chars = window.chars().count();
        let source_chars = source.chars().count();
        response
            .findings
            .into_iter()
            .filter(|wire| wire.start <= wire.end && wire.end <= window_chars)
            .map(|wire| {
                // Shift window-relative offsets back into the snapshot.
                let mut finding = Finding::new(
                    wire.original,
                    window_start + wire.start,
                    window_start + wire.end,
                    wire.severity,
                    SourceTag::Semantic,
                );
                finding.suggestion = wire.suggestion;
                finding.rule_id = wire.rule_id;
                finding
            })
            .filter(|finding| finding.is_in_range(source_chars))
            .collect()
    }

    async fn suggest(&self, token: &str, context_window: &str) -> Option<String> {
        let (line, column) = (0, 0);
        let request = ContextRequest {
            code_window: context_window,
            token,
            line,
            column,
        };

        match self.post::<_, SuggestResponse>("suggest", &request).await {
            Ok(response) => response
                .suggestion
                .filter(|suggestion| !suggestion.trim().is_empty()),
            Err(err) => {
                warn!(error = %err, token, "semantic suggestion failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_degrade_to_none() {
        let provider = HttpSemanticProvider::new(HttpProviderConfig {
            endpoint: "http://localhost:1".to_string(),
            api_key: None,
            ..HttpProviderConfig::default()
        });

        assert!(provider.suggest("funtion", "funtion main()").await.is_none());
        assert!(provider.analyze_context("funtion main()", 0, "funtion").await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_endpoint_degrades_to_none() {
        let provider = HttpSemanticProvider::new(HttpProviderConfig {
            api_key: Some("key".to_string()),
            ..HttpProviderConfig::default()
        });
        assert!(provider.suggest("funtion", "funtion main()").await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty() {
        // Nothing listens on this port; the request fails fast and degrades.
        let provider = HttpSemanticProvider::new(HttpProviderConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            api_key: Some("key".to_string()),
            request_timeout_ms: 500,
            ..HttpProviderConfig::default()
        });

        assert!(provider.suggest("funtion", "window").await.is_none());
        assert!(provider.analyze_context("source", 0, "tok").await.is_empty());
    }

    #[tokio::test]
    async fn test_stalled_response_body_hits_deadline() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Serve valid headers, a truncated body, then stall forever.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          content-type: application/json\r\n\
                          content-length: 1024\r\n\r\n{\"sug",
                    )
                    .await;
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
        });

        let provider = HttpSemanticProvider::new(HttpProviderConfig {
            endpoint: format!("http://{addr}"),
            api_key: Some("key".to_string()),
            request_timeout_ms: 200,
            ..HttpProviderConfig::default()
        });

        let started = std::time::Instant::now();
        assert!(provider.suggest("funtion", "window").await.is_none());
        assert!(provider.analyze_context("source", 0, "tok").await.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_wire_finding_deserialization_defaults() {
        let wire: WireFinding = serde_json::from_str(
            r#"{"original": "consle", "start": 2, "end": 8}"#,
        )
        .unwrap();
        assert_eq!(wire.original, "consle");
        assert!(wire.suggestion.is_none());
        assert_eq!(wire.severity, Severity::Warning);
    }
}
