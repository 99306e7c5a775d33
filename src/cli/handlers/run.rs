//! Batch evaluation handler

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::cli::commands::CaseSourceArg;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::rag::InvokeOptions;
use crate::rag::RagClient;
use crate::report;
use crate::runner::BatchRunner;
use crate::runner::RunnerConfig;
use crate::scorer::ScoringRules;
use crate::suite;
use crate::suite::JsonFileSuite;
use crate::suite::TableSuite;
use crate::AppConfig;
use crate::PdragError;
use crate::Result;

#[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
pub async fn handle_run_command(
    config: &AppConfig,
    source: CaseSourceArg,
    file: Option<PathBuf>,
    category: Option<String>,
    limit: Option<usize>,
    bypass_cache: bool,
    model: Option<String>,
    threshold: Option<f64>,
    chunk_size: Option<usize>,
    no_report: bool,
) -> Result<()> {
    let cases = match source {
        CaseSourceArg::Inline => suite::ensure_not_empty(suite::inline_suite(), "inline suite")?,
        CaseSourceArg::File => {
            let path = file.ok_or_else(|| {
                PdragError::Config("--file is required with --source file".to_string())
            })?;
            JsonFileSuite::new(path).load()?
        }
        CaseSourceArg::Store => {
            let db = Arc::new(Database::from_config(config).await?);
            TableSuite::new(db).load().await?
        }
    };

    let cases = suite::ensure_not_empty(
        suite::filter_cases(cases, category.as_deref(), limit),
        "suite after filters",
    )?;

    let rules = ScoringRules {
        pass_threshold: threshold.unwrap_or_else(|| config.pass_threshold()),
        confidence_floor: config.eval.confidence_floor,
    };
    let runner_config = RunnerConfig {
        chunk_size: chunk_size.unwrap_or_else(|| config.chunk_size()),
        chunk_delay: config.chunk_delay(),
    };

    let options = InvokeOptions {
        session_id: uuid::Uuid::new_v4(),
        model: model.or_else(|| config.endpoint.model.clone()),
        bypass_cache,
    };

    print_info(&format!(
        "Running {} cases against {} (session {}, chunk size {}, threshold {:.0}%)",
        cases.len(),
        config.endpoint_url(),
        options.session_id,
        runner_config.chunk_size,
        rules.pass_threshold
    ));
    if bypass_cache {
        print_info("Cache bypass requested: every answer will be generated fresh");
    }

    let client = RagClient::from_config(config)?;
    let runner = BatchRunner::new(&client, rules.clone(), runner_config);
    let evaluations = runner.run(&cases, &options).await;

    let run_report =
        crate::models::RunReport::build(evaluations, rules.pass_threshold, rules.confidence_floor);
    report::print_summary(&run_report, &cases);

    if no_report {
        print_warning("Skipping JSON report (--no-report)");
    } else {
        let path = run_report.write_to_dir(config.reports_dir())?;
        print_success(&format!("Report saved to {}", path.display()));
    }

    info!(
        "Run finished: {}/{} passed, avg answer time {:.0} ms",
        run_report.overall.passed, run_report.overall.total, run_report.overall.avg_response_time_ms
    );

    Ok(())
}
