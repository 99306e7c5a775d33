//! Run report assembly, console summary and JSON artifact
//!
//! The JSON artifact is the durable output contract of a run: one
//! timestamped file per run, never overwritten, stable enough for external
//! dashboards to parse.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::cli::output::truncate_str;
use crate::models::CategoryAggregate;
use crate::models::Evaluation;
use crate::models::RunReport;
use crate::models::RunTotals;
use crate::models::ScoringMethod;
use crate::models::TestCase;
use crate::Result;

impl RunReport {
    /// Fold a batch's evaluations into the report structure. Aggregates are
    /// plain arithmetic means; priority never weighs in.
    pub fn build(
        raw_results: Vec<Evaluation>,
        pass_threshold: f64,
        confidence_floor: Option<f64>,
    ) -> Self {
        let overall = build_totals(&raw_results);
        let by_category = build_category_aggregates(&raw_results);

        Self {
            timestamp: Utc::now(),
            pass_threshold,
            confidence_floor,
            overall,
            by_category,
            raw_results,
        }
    }

    /// Filesystem-safe artifact name derived from the run timestamp
    pub fn file_name(&self) -> String {
        format!(
            "eval-report-{}.json",
            self.timestamp.format("%Y-%m-%dT%H-%M-%S%.3fZ")
        )
    }

    /// Write the JSON artifact under `dir`, creating the directory on
    /// demand. Returns the path written.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!("Report written to {}", path.display());
        Ok(path)
    }
}

fn build_totals(evaluations: &[Evaluation]) -> RunTotals {
    let total = evaluations.len();
    let passed = evaluations.iter().filter(|e| e.passed).count();
    let avg = |f: fn(&Evaluation) -> f64| {
        if total == 0 {
            0.0
        } else {
            evaluations.iter().map(f).sum::<f64>() / total as f64
        }
    };

    RunTotals {
        total,
        passed,
        failed: total - passed,
        pass_rate: if total == 0 {
            0.0
        } else {
            100.0 * passed as f64 / total as f64
        },
        avg_score: avg(|e| e.score),
        avg_response_time_ms: avg(|e| e.response_time_ms as f64),
        length_fallback_cases: evaluations
            .iter()
            .filter(|e| e.scoring_method == ScoringMethod::LengthFallback)
            .count(),
        beta_responses: evaluations.iter().filter(|e| e.beta_response).count(),
        error_cases: evaluations.iter().filter(|e| e.error.is_some()).count(),
    }
}

fn build_category_aggregates(evaluations: &[Evaluation]) -> Vec<CategoryAggregate> {
    let mut groups: BTreeMap<&str, Vec<&Evaluation>> = BTreeMap::new();
    for eval in evaluations {
        groups.entry(eval.category.as_str()).or_default().push(eval);
    }

    groups
        .into_iter()
        .map(|(category, group)| {
            let total = group.len();
            CategoryAggregate {
                category: category.to_string(),
                total,
                passed: group.iter().filter(|e| e.passed).count(),
                avg_score: group.iter().map(|e| e.score).sum::<f64>() / total as f64,
                avg_response_time_ms: group
                    .iter()
                    .map(|e| e.response_time_ms as f64)
                    .sum::<f64>()
                    / total as f64,
            }
        })
        .collect()
}

/// Plain-language verdict for the end of the console summary
pub fn verdict(pass_rate: f64) -> &'static str {
    if pass_rate >= 90.0 {
        "excellent"
    } else if pass_rate >= 75.0 {
        "healthy"
    } else if pass_rate >= 60.0 {
        "acceptable"
    } else {
        "needs improvement"
    }
}

/// Missing keywords ranked by how many failed cases missed them
pub fn top_missing_keywords(evaluations: &[Evaluation], limit: usize) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for eval in evaluations.iter().filter(|e| !e.passed) {
        for keyword in &eval.missing_keywords {
            *counts.entry(keyword.as_str()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, n)| (k.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Print the human-readable summary of a run
pub fn print_summary(report: &RunReport, cases: &[TestCase]) {
    println!();
    println!("📊 Evaluation Report");
    println!("====================");

    println!();
    println!("📝 Cases:");
    for eval in &report.raw_results {
        let glyph = if eval.passed { "✅" } else { "❌" };
        let question = cases
            .iter()
            .find(|c| c.id == eval.test_case_id)
            .map_or_else(|| format!("case {}", eval.test_case_id), |c| {
                truncate_str(&c.question, 60)
            });
        let note = match (&eval.error, eval.scoring_method) {
            (Some(error), _) => format!(" [{error}]"),
            (None, ScoringMethod::LengthFallback) => " [length-fallback]".to_string(),
            _ => String::new(),
        };
        println!(
            "  {} [{}] {} | {:.0}% ({} ms){}",
            glyph, eval.category, question, eval.score, eval.response_time_ms, note
        );
    }

    println!();
    println!("📂 By category:");
    for agg in &report.by_category {
        println!(
            "  {}: {}/{} passed ({:.1}%) | avg score {:.1} | avg time {:.0} ms",
            agg.category,
            agg.passed,
            agg.total,
            agg.pass_rate(),
            agg.avg_score,
            agg.avg_response_time_ms
        );
    }

    let missing = top_missing_keywords(&report.raw_results, 5);
    if !missing.is_empty() {
        println!();
        println!("🔎 Top missing keywords:");
        for (keyword, count) in missing {
            println!("  - \"{keyword}\" missed in {count} failed case(s)");
        }
    }

    let overall = &report.overall;
    println!();
    println!("🎯 Overall:");
    println!(
        "  {}/{} passed ({:.1}%) | avg score {:.1} | avg time {:.0} ms",
        overall.passed,
        overall.total,
        overall.pass_rate,
        overall.avg_score,
        overall.avg_response_time_ms
    );
    if overall.length_fallback_cases > 0 {
        println!(
            "  ⚠️  {} case(s) graded by the length heuristic, not keywords",
            overall.length_fallback_cases
        );
    }
    if overall.beta_responses > 0 {
        println!(
            "  ⚠️  {} answer(s) carried the BETA_RESPONSE marker",
            overall.beta_responses
        );
    }
    if overall.error_cases > 0 {
        println!("  ⚠️  {} case(s) failed to produce an answer", overall.error_cases);
    }
    println!(
        "  Verdict: {} (pass threshold {:.0}%)",
        verdict(overall.pass_rate),
        report.pass_threshold
    );
    if let Some(floor) = report.confidence_floor {
        println!("  Note: confidence floor {floor:.2} was active for this run");
    }
}
