//! Answer cache administration handlers

use crate::cli::output::print_info;
use crate::cli::output::print_prompt;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::AppConfig;
use crate::Result;

pub async fn handle_cache_stats_command(config: &AppConfig) -> Result<()> {
    let db = Database::from_config(config).await?;
    let stats = db.cache_stats().await?;

    println!("🗃️  Answer cache:");
    println!("  Entries: {}", stats.entries);
    match (stats.oldest, stats.newest) {
        (Some(oldest), Some(newest)) => {
            println!("  Oldest: {}", oldest.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("  Newest: {}", newest.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        _ => print_info("Cache is empty"),
    }
    Ok(())
}

pub async fn handle_cache_clear_command(
    config: &AppConfig,
    older_than_hours: Option<i64>,
    force: bool,
) -> Result<()> {
    let scope = older_than_hours.map_or_else(
        || "ALL cached answers".to_string(),
        |hours| format!("cached answers older than {hours}h"),
    );
    if !force {
        print_prompt(&format!("Delete {scope}? [y/N] "));
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            print_warning("Aborted");
            return Ok(());
        }
    }

    let db = Database::from_config(config).await?;
    let deleted = db.clear_cache(older_than_hours).await?;
    print_success(&format!("Cleared {deleted} cached answers"));
    Ok(())
}
