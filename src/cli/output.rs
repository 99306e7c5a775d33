//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the pdrag CLI

use crate::models::TestCase;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// Questions and responses carry multi-byte UTF-8 (accented Portuguese),
/// so truncation must count characters, not bytes.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print a test case list
pub fn print_case_list(cases: &[TestCase]) {
    println!("Found {} test cases:", cases.len());
    for case in cases {
        println!(
            "  - #{} [{}] ({}) {}",
            case.id,
            case.category,
            case.priority.as_str(),
            truncate_str(&case.question, 70)
        );
        if !case.expected_keywords.is_empty() {
            println!("      expects: {}", case.expected_keywords.join(", "));
        }
        if !case.must_not_include.is_empty() {
            println!("      forbids: {}", case.must_not_include.join(", "));
        }
    }
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 pdrag Configuration:");
    println!();

    println!("🌐 Answering endpoint:");
    println!("  Base URL: {}", config.endpoint_url());
    println!("  Service key: {}", mask_secret(config.service_key()));
    println!("  Request timeout: {}s", config.endpoint.timeout_secs);
    if let Some(model) = &config.endpoint.model {
        println!("  Model hint: {model}");
    }
    println!();

    println!("🗄️  Database:");
    println!("  URL: {}", mask_database_url(config.database_url()));
    println!("  Max connections: {}", config.max_connections());
    println!("  Min connections: {}", config.min_connections());
    println!("  Connection timeout: {}s", config.connection_timeout());
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🧪 Evaluation:");
    println!("  Pass threshold: {:.0}%", config.pass_threshold());
    println!("  Chunk size: {}", config.chunk_size());
    println!("  Chunk delay: {:?}", config.chunk_delay());
    match config.eval.confidence_floor {
        Some(floor) => println!("  Confidence floor: {floor:.2} (blended into pass/fail)"),
        None => println!("  Confidence floor: off (confidence ignored)"),
    }
    println!("  Reports dir: {}", config.reports_dir());
    println!();

    println!("🔁 Retry:");
    println!("  Max rate-limit retries: {}", config.retry.max_attempts);
    println!("  Cooldown: {:?}", config.retry_cooldown());
}

/// Mask all but the edges of a secret for display
fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else if secret.len() <= 8 {
        "***".to_string()
    } else {
        format!("{}...{}", &secret[..4], &secret[secret.len() - 4..])
    }
}

/// Mask database URL for logging (hide password)
fn mask_database_url(url: &str) -> String {
    if url.is_empty() {
        return "(not set)".to_string();
    }
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            format!(
                "{}://{}@{}:{}",
                parsed.scheme(),
                parsed.username(),
                host,
                parsed.port().unwrap_or(5432)
            )
        } else {
            "***masked***".to_string()
        }
    } else {
        "***invalid***".to_string()
    }
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    print!("{msg}");
    std::io::Write::flush(&mut std::io::stdout()).unwrap();
}
