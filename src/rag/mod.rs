//! Remote query invocation against the hosted answering endpoint
//!
//! The endpoint (`agentic-rag` Edge Function) is a black box: one POST in,
//! free text plus optional metadata out. Everything here is normalization
//! around that call.

pub mod client;

pub use client::InvokeOptions;
pub use client::RagClient;
pub use client::RetryPolicy;

use crate::models::QueryResult;
use crate::models::TestCase;

/// Anything that can answer a test case. The batch runner is generic over
/// this so it can be exercised without a network.
pub trait AnswerClient {
    /// Ask one question. Failures are carried inside the returned
    /// `QueryResult`, never thrown, so batch processing continues.
    fn invoke(
        &self,
        case: &TestCase,
        options: &InvokeOptions,
    ) -> impl std::future::Future<Output = QueryResult> + Send;
}
