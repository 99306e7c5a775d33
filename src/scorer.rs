//! Keyword-match scorer: the deterministic grading rule applied to every
//! endpoint reply.
//!
//! Grading is intentionally a case-insensitive substring heuristic, not NLP:
//! the keyword pool decides the score, forbidden terms veto the pass, and
//! a weak length heuristic covers cases that declare no expectations.

use crate::models::Evaluation;
use crate::models::QueryResult;
use crate::models::ScoringMethod;
use crate::models::TestCase;

/// Sentinel the answering service emits when it lacks grounding data.
pub const BETA_RESPONSE_MARKER: &str = "BETA_RESPONSE";

/// Responses longer than this many characters score 70 under the length
/// fallback; shorter ones score 30.
const LENGTH_FALLBACK_BOUNDARY: usize = 50;
const LENGTH_FALLBACK_LONG_SCORE: f64 = 70.0;
const LENGTH_FALLBACK_SHORT_SCORE: f64 = 30.0;

/// Pass/fail policy for a run.
#[derive(Debug, Clone)]
pub struct ScoringRules {
    /// Minimum score (0..=100) for a pass
    pub pass_threshold: f64,
    /// When set, `confidence >= floor` also passes a case. Off by default;
    /// see the run report, which records the active value.
    pub confidence_floor: Option<f64>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            pass_threshold: crate::DEFAULT_PASS_THRESHOLD,
            confidence_floor: None,
        }
    }
}

/// Grade one test case against its query result. Pure: same inputs, same
/// `Evaluation`, no hidden state.
pub fn score_response(case: &TestCase, result: &QueryResult, rules: &ScoringRules) -> Evaluation {
    let pool = case.expectation_pool();

    // An invocation that never produced an answer is a plain failure; the
    // expectations are reported as missing in full.
    if let Some(error) = &result.error {
        return Evaluation {
            test_case_id: case.id,
            category: case.category.clone(),
            passed: false,
            score: 0.0,
            matched_keywords: Vec::new(),
            missing_keywords: pool.iter().map(ToString::to_string).collect(),
            forbidden_hits: Vec::new(),
            scoring_method: ScoringMethod::Error,
            beta_response: false,
            response_time_ms: result.response_time_ms,
            error: Some(error.clone()),
        };
    }

    let response = &result.response_text;
    let response_lower = response.to_lowercase();
    let beta_response = response.contains(BETA_RESPONSE_MARKER);

    let forbidden_hits: Vec<String> = case
        .must_not_include
        .iter()
        .filter(|term| response_lower.contains(&term.to_lowercase()))
        .cloned()
        .collect();

    let (score, matched, missing, method) = if response.is_empty() {
        // An empty answer scores zero no matter what was expected
        let method = if pool.is_empty() {
            ScoringMethod::LengthFallback
        } else {
            ScoringMethod::Keywords
        };
        let missing = pool.iter().map(ToString::to_string).collect();
        (0.0, Vec::new(), missing, method)
    } else if pool.is_empty() {
        let score = if response.chars().count() > LENGTH_FALLBACK_BOUNDARY {
            LENGTH_FALLBACK_LONG_SCORE
        } else {
            LENGTH_FALLBACK_SHORT_SCORE
        };
        (score, Vec::new(), Vec::new(), ScoringMethod::LengthFallback)
    } else {
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for term in &pool {
            if response_lower.contains(&term.to_lowercase()) {
                matched.push((*term).to_string());
            } else {
                missing.push((*term).to_string());
            }
        }
        let score = 100.0 * matched.len() as f64 / pool.len() as f64;
        (score, matched, missing, ScoringMethod::Keywords)
    };

    let mut passed = score >= rules.pass_threshold;
    if let (Some(floor), Some(confidence)) = (rules.confidence_floor, result.confidence) {
        passed = passed || confidence >= floor;
    }
    // Hard constraints dominate: an empty answer or any forbidden term fails
    // the case regardless of score or confidence
    if response.is_empty() || !forbidden_hits.is_empty() {
        passed = false;
    }

    Evaluation {
        test_case_id: case.id,
        category: case.category.clone(),
        passed,
        score,
        matched_keywords: matched,
        missing_keywords: missing,
        forbidden_hits,
        scoring_method: method,
        beta_response,
        response_time_ms: result.response_time_ms,
        error: None,
    }
}
