//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - run: batch evaluation against the answering endpoint
//! - score: offline grading of a saved response
//! - cases: test case store maintenance
//! - cache: answer cache administration
//! - info: configuration display

pub mod cache;
pub mod cases;
pub mod info;
pub mod run;
pub mod score;

// Re-export all public handlers
pub use cache::*;
pub use cases::*;
pub use info::*;
pub use run::*;
pub use score::*;
