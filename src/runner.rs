//! Batch execution of a test suite with bounded concurrency
//!
//! Cases run in fixed-size chunks; each chunk's invocations are awaited
//! together and a fixed delay separates chunks so the external service is
//! never flooded. Result order always matches input order.

use std::time::Duration;

use futures::future::join_all;
use tracing::info;

use crate::models::Evaluation;
use crate::models::TestCase;
use crate::rag::AnswerClient;
use crate::rag::InvokeOptions;
use crate::scorer::score_response;
use crate::scorer::ScoringRules;

/// Chunking knobs for one run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Cases invoked concurrently per chunk
    pub chunk_size: usize,
    /// Pause between chunks
    pub chunk_delay: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 5,
            chunk_delay: Duration::from_secs(1),
        }
    }
}

/// Drives the invoker and scorer over a whole suite.
pub struct BatchRunner<'a, C: AnswerClient> {
    client: &'a C,
    rules: ScoringRules,
    config: RunnerConfig,
}

impl<'a, C: AnswerClient> BatchRunner<'a, C> {
    pub fn new(client: &'a C, rules: ScoringRules, config: RunnerConfig) -> Self {
        Self {
            client,
            rules,
            config,
        }
    }

    /// Run every case. A single case's failure becomes a failed
    /// `Evaluation`; the batch always completes with one result per case,
    /// in input order.
    pub async fn run(&self, cases: &[TestCase], options: &InvokeOptions) -> Vec<Evaluation> {
        let chunk_size = self.config.chunk_size.max(1);
        let total_chunks = cases.len().div_ceil(chunk_size);
        let mut evaluations = Vec::with_capacity(cases.len());

        for (chunk_idx, chunk) in cases.chunks(chunk_size).enumerate() {
            info!(
                "Processing chunk {}/{} ({} cases)",
                chunk_idx + 1,
                total_chunks,
                chunk.len()
            );

            // join_all preserves input order regardless of completion order
            let graded = join_all(chunk.iter().map(|case| async {
                let result = self.client.invoke(case, options).await;
                score_response(case, &result, &self.rules)
            }))
            .await;
            evaluations.extend(graded);

            // Fixed delay between chunks to respect external rate limits
            if chunk_idx + 1 < total_chunks {
                tokio::time::sleep(self.config.chunk_delay).await;
            }
        }

        let passed = evaluations.iter().filter(|e| e.passed).count();
        info!(
            "Batch complete: {}/{} cases passed",
            passed,
            evaluations.len()
        );

        evaluations
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::models::Priority;
    use crate::models::QueryResult;
    use crate::models::ScoringMethod;

    /// Answers from a canned map; cases without an entry time out.
    struct CannedClient {
        answers: Vec<(i64, &'static str)>,
        invocations: AtomicUsize,
    }

    impl CannedClient {
        fn new(answers: Vec<(i64, &'static str)>) -> Self {
            Self {
                answers,
                invocations: AtomicUsize::new(0),
            }
        }
    }

    impl AnswerClient for CannedClient {
        async fn invoke(&self, case: &TestCase, _options: &InvokeOptions) -> QueryResult {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            // Later cases answer faster than earlier ones, so completion
            // order is the reverse of start order within a chunk
            tokio::time::sleep(Duration::from_millis(
                50u64.saturating_sub(case.id as u64 * 10),
            ))
            .await;
            match self.answers.iter().find(|(id, _)| *id == case.id) {
                Some((_, text)) => QueryResult {
                    test_case_id: case.id,
                    response_text: (*text).to_string(),
                    confidence: None,
                    sources: None,
                    response_time_ms: 10,
                    error: None,
                },
                None => QueryResult::from_error(case.id, "timeout", 30_000),
            }
        }
    }

    fn suite(n: i64) -> Vec<TestCase> {
        (1..=n)
            .map(|id| TestCase {
                id,
                question: format!("Pergunta {id}"),
                category: if id % 2 == 0 { "pares" } else { "impares" }.to_string(),
                expected_keywords: vec!["ZOT".to_string()],
                expected_content: vec![],
                must_not_include: vec![],
                priority: Priority::Medium,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        let cases = suite(5);
        let client = CannedClient::new(
            (1..=5).map(|id| (id, "A ZOT define o regime.")).collect(),
        );
        let runner = BatchRunner::new(
            &client,
            ScoringRules::default(),
            RunnerConfig {
                chunk_size: 5,
                chunk_delay: Duration::from_millis(0),
            },
        );

        let evaluations = runner.run(&cases, &InvokeOptions::new()).await;
        let ids: Vec<i64> = evaluations.iter().map(|e| e.test_case_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(client.invocations.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_failed_case_does_not_abort_the_batch() {
        let cases = suite(4);
        // Case 3 has no canned answer and times out
        let client = CannedClient::new(vec![
            (1, "ZOT-01"),
            (2, "ZOT-02"),
            (4, "ZOT-04"),
        ]);
        let runner = BatchRunner::new(
            &client,
            ScoringRules::default(),
            RunnerConfig {
                chunk_size: 2,
                chunk_delay: Duration::from_millis(1),
            },
        );

        let evaluations = runner.run(&cases, &InvokeOptions::new()).await;
        assert_eq!(evaluations.len(), 4);
        assert!(evaluations[0].passed);
        assert!(!evaluations[2].passed);
        assert_eq!(evaluations[2].scoring_method, ScoringMethod::Error);
        assert_eq!(evaluations[2].error.as_deref(), Some("timeout"));
        assert!(evaluations[3].passed);
    }

    #[tokio::test]
    async fn test_chunking_covers_every_case() {
        let cases = suite(7);
        let client = CannedClient::new((1..=7).map(|id| (id, "ZOT")).collect());
        let runner = BatchRunner::new(
            &client,
            ScoringRules::default(),
            RunnerConfig {
                chunk_size: 3,
                chunk_delay: Duration::from_millis(1),
            },
        );

        let evaluations = runner.run(&cases, &InvokeOptions::new()).await;
        assert_eq!(evaluations.len(), 7);
        assert_eq!(client.invocations.load(Ordering::SeqCst), 7);
    }
}
