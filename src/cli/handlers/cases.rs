//! Test case store handlers

use crate::cli::output::print_case_list;
use crate::cli::output::print_prompt;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::suite::inline_suite;
use crate::AppConfig;
use crate::Result;

pub async fn handle_cases_list_command(
    config: &AppConfig,
    category: Option<String>,
    limit: i64,
) -> Result<()> {
    let db = Database::from_config(config).await?;
    let cases = db.list_test_cases(category.as_deref(), Some(limit)).await?;
    if cases.is_empty() {
        print_warning("No test cases in the store. Run: pdrag cases seed");
        return Ok(());
    }
    print_case_list(&cases);
    Ok(())
}

pub async fn handle_cases_seed_command(config: &AppConfig, force: bool) -> Result<()> {
    let db = Database::from_config(config).await?;
    db.init_schema().await?;

    let existing = db.count_test_cases().await?;
    if existing > 0 && !force {
        print_warning(&format!(
            "Store already holds {existing} cases; seeding would duplicate them."
        ));
        if !confirm("Seed anyway? [y/N] ")? {
            print_warning("Aborted");
            return Ok(());
        }
    }

    let inserted = db.seed_test_cases(&inline_suite()).await?;
    print_success(&format!("Seeded {inserted} test cases"));
    Ok(())
}

pub async fn handle_cases_clear_command(config: &AppConfig, force: bool) -> Result<()> {
    if !force && !confirm("Delete ALL test cases from the store? [y/N] ")? {
        print_warning("Aborted");
        return Ok(());
    }
    let db = Database::from_config(config).await?;
    let deleted = db.clear_test_cases().await?;
    print_success(&format!("Deleted {deleted} test cases"));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print_prompt(prompt);
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
