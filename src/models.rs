//! Core data types: test cases, query results, evaluations and reports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Informational priority of a test case. Aggregation never weights by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        match value {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A single question to put to the answering endpoint, with the textual
/// expectations used to grade the reply. Immutable during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub question: String,
    pub category: String,
    /// Keywords expected (case-insensitive substring match) in the answer
    #[serde(default)]
    pub expected_keywords: Vec<String>,
    /// Longer content fragments, graded with the same substring test
    #[serde(default)]
    pub expected_content: Vec<String>,
    /// Forbidden terms; any hit fails the case regardless of keyword score
    #[serde(default)]
    pub must_not_include: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl TestCase {
    /// Expected keywords and content fragments, graded as one pool
    pub fn expectation_pool(&self) -> Vec<&str> {
        self.expected_keywords
            .iter()
            .chain(self.expected_content.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Normalized reply of one endpoint invocation. Never mutated after
/// construction; transport failures land in `error` instead of aborting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub test_case_id: i64,
    pub response_text: String,
    pub confidence: Option<f64>,
    /// Source document hit counts as reported by the endpoint
    pub sources: Option<BTreeMap<String, i64>>,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

impl QueryResult {
    /// A result carrying only an error (timeout, HTTP failure, transport)
    pub fn from_error(test_case_id: i64, error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            test_case_id,
            response_text: String::new(),
            confidence: None,
            sources: None,
            response_time_ms: elapsed_ms,
            error: Some(error.into()),
        }
    }
}

/// How a case was graded, so readers never conflate keyword-verified passes
/// with the weak length heuristic or plain invocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMethod {
    Keywords,
    LengthFallback,
    Error,
}

/// Deterministic grade of one `TestCase` against its `QueryResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub test_case_id: i64,
    pub category: String,
    pub passed: bool,
    /// 0..=100; exactly `100 * matched / expected` when keywords are present
    pub score: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// Forbidden terms found in the response; non-empty forces `passed = false`
    pub forbidden_hits: Vec<String>,
    pub scoring_method: ScoringMethod,
    /// The answer carried the ungrounded-data sentinel
    pub beta_response: bool,
    pub response_time_ms: u64,
    pub error: Option<String>,
}

/// Per-category tally over a run's evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: usize,
    pub passed: usize,
    pub avg_score: f64,
    pub avg_response_time_ms: f64,
}

impl CategoryAggregate {
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.passed as f64 / self.total as f64
        }
    }
}

/// Whole-run totals, including the counters the console summary surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunTotals {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub avg_score: f64,
    pub avg_response_time_ms: f64,
    /// Cases graded by the length heuristic instead of keywords
    pub length_fallback_cases: usize,
    /// Cases whose answer carried the ungrounded-data sentinel
    pub beta_responses: usize,
    /// Cases that never produced an answer (timeout, HTTP, transport)
    pub error_cases: usize,
}

/// Durable artifact of one batch run; a new timestamped file per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: DateTime<Utc>,
    pub pass_threshold: f64,
    /// Confidence floor active during the run, if any; recorded so accuracy
    /// numbers from different configurations are never silently compared
    pub confidence_floor: Option<f64>,
    pub overall: RunTotals,
    pub by_category: Vec<CategoryAggregate>,
    pub raw_results: Vec<Evaluation>,
}
