//! Offline scoring handler: grade a saved response without network calls

use std::path::PathBuf;

use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::models::Priority;
use crate::models::QueryResult;
use crate::models::ScoringMethod;
use crate::models::TestCase;
use crate::scorer::score_response;
use crate::scorer::ScoringRules;
use crate::AppConfig;
use crate::Result;

fn split_terms(input: Option<String>) -> Vec<String> {
    input
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub async fn handle_score_command(
    config: &AppConfig,
    question: String,
    response_file: PathBuf,
    keywords: Option<String>,
    forbidden: Option<String>,
    threshold: Option<f64>,
) -> Result<()> {
    let response_text = std::fs::read_to_string(&response_file)?;

    let case = TestCase {
        id: 0,
        question,
        category: "ad-hoc".to_string(),
        expected_keywords: split_terms(keywords),
        expected_content: vec![],
        must_not_include: split_terms(forbidden),
        priority: Priority::Medium,
    };
    let result = QueryResult {
        test_case_id: 0,
        response_text,
        confidence: None,
        sources: None,
        response_time_ms: 0,
        error: None,
    };
    let rules = ScoringRules {
        pass_threshold: threshold.unwrap_or_else(|| config.pass_threshold()),
        confidence_floor: None,
    };

    let eval = score_response(&case, &result, &rules);

    print_info(&format!("Question: {}", case.question));
    if eval.scoring_method == ScoringMethod::LengthFallback {
        print_info("No keywords given: graded by the length heuristic");
    }
    println!("  Score: {:.1}% (threshold {:.0}%)", eval.score, rules.pass_threshold);
    if !eval.matched_keywords.is_empty() {
        println!("  Matched: {}", eval.matched_keywords.join(", "));
    }
    if !eval.missing_keywords.is_empty() {
        println!("  Missing: {}", eval.missing_keywords.join(", "));
    }
    if !eval.forbidden_hits.is_empty() {
        println!("  Forbidden terms found: {}", eval.forbidden_hits.join(", "));
    }
    if eval.beta_response {
        println!("  Response carries the BETA_RESPONSE marker");
    }
    if eval.passed {
        print_success("PASS");
    } else {
        print_error("FAIL");
    }

    Ok(())
}
