//! HTTP client for the agentic-rag Edge Function

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::PdragError;
use crate::errors::Result;
use crate::models::QueryResult;
use crate::models::TestCase;
use crate::rag::AnswerClient;

/// Per-invocation options, one set per batch run.
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    pub session_id: Uuid,
    pub model: Option<String>,
    pub bypass_cache: bool,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            model: None,
            bypass_cache: false,
        }
    }
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Retry policy for rate-limited invocations. Nothing else is retried:
/// automatic retries against a degraded provider only amplify load.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after a rate-limit error
    pub max_attempts: u32,
    /// Cooldown before each retry
    pub cooldown: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.retry.max_attempts,
            cooldown: config.retry_cooldown(),
        }
    }

    /// Provider throttling is only visible as text; match the usual shapes
    pub fn is_rate_limit(error: &str) -> bool {
        let lower = error.to_lowercase();
        lower.contains("rate limit")
            || lower.contains("too many requests")
            || lower.contains("429")
    }
}

/// Client for the hosted answering endpoint.
pub struct RagClient {
    endpoint: String,
    service_key: String,
    client: Client,
    retry: RetryPolicy,
}

impl RagClient {
    /// Build a client with the per-request timeout from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| PdragError::Http(e.to_string()))?;

        Ok(Self {
            endpoint: format!(
                "{}/functions/v1/agentic-rag",
                config.endpoint_url().trim_end_matches('/')
            ),
            service_key: config.service_key().to_string(),
            client,
            retry: RetryPolicy::from_config(config),
        })
    }

    async fn send_once(&self, case: &TestCase, options: &InvokeOptions) -> QueryResult {
        #[derive(Serialize)]
        struct AgenticRagRequest<'a> {
            query: &'a str,
            #[serde(rename = "sessionId")]
            session_id: String,
            #[serde(rename = "bypassCache", skip_serializing_if = "Option::is_none")]
            bypass_cache: Option<bool>,
            #[serde(skip_serializing_if = "Option::is_none")]
            model: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct AgenticRagResponse {
            response: String,
            confidence: Option<f64>,
            sources: Option<BTreeMap<String, i64>>,
            #[serde(rename = "executionTime")]
            #[allow(dead_code)]
            execution_time: Option<u64>,
        }

        let request = AgenticRagRequest {
            query: &case.question,
            session_id: options.session_id.to_string(),
            bypass_cache: options.bypass_cache.then_some(true),
            model: options.model.as_deref(),
        };

        debug!("Invoking answering endpoint for case {}", case.id);
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.service_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return QueryResult::from_error(case.id, "timeout", elapsed_ms);
            }
            Err(e) => {
                return QueryResult::from_error(
                    case.id,
                    format!("transport error: {e}"),
                    elapsed_ms,
                );
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return QueryResult::from_error(
                case.id,
                format!("HTTP {status}: {error_text}"),
                elapsed_ms,
            );
        }

        let parsed: AgenticRagResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                return QueryResult::from_error(
                    case.id,
                    format!("invalid response body: {e}"),
                    elapsed_ms,
                );
            }
        };

        QueryResult {
            test_case_id: case.id,
            response_text: parsed.response,
            confidence: parsed.confidence,
            sources: parsed.sources,
            response_time_ms: elapsed_ms,
            error: None,
        }
    }
}

impl AnswerClient for RagClient {
    /// Ask one question, normalizing every failure into `QueryResult.error`.
    /// A rate-limit error sleeps the configured cooldown and retries the
    /// same case, up to `retry.max_attempts` further times.
    async fn invoke(&self, case: &TestCase, options: &InvokeOptions) -> QueryResult {
        let mut attempt = 0;
        loop {
            let result = self.send_once(case, options).await;
            match &result.error {
                Some(error)
                    if RetryPolicy::is_rate_limit(error) && attempt < self.retry.max_attempts =>
                {
                    attempt += 1;
                    warn!(
                        "Rate limited on case {} (attempt {}), cooling down for {:?}",
                        case.id, attempt, self.retry.cooldown
                    );
                    tokio::time::sleep(self.retry.cooldown).await;
                }
                _ => return result,
            }
        }
    }
}
