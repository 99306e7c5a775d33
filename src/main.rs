use clap::Parser;
use pdrag::cli::commands::CacheCommands;
use pdrag::cli::commands::CasesCommands;
use pdrag::cli::commands::Cli;
use pdrag::cli::commands::Commands;
use pdrag::cli::handlers::handle_cache_clear_command;
use pdrag::cli::handlers::handle_cache_stats_command;
use pdrag::cli::handlers::handle_cases_clear_command;
use pdrag::cli::handlers::handle_cases_list_command;
use pdrag::cli::handlers::handle_cases_seed_command;
use pdrag::cli::handlers::handle_config_command;
use pdrag::cli::handlers::handle_run_command;
use pdrag::cli::handlers::handle_score_command;
use pdrag::config::AppConfig;
use pdrag::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        pdrag::logging::init_logging_with_level("debug")?;
    } else {
        pdrag::logging::init_logging(None)?;
    }

    // Load configuration; a missing endpoint or credential aborts here,
    // before any invocation
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Run {
            source,
            file,
            category,
            limit,
            bypass_cache,
            model,
            threshold,
            chunk_size,
            no_report,
        } => {
            handle_run_command(
                &config,
                source,
                file,
                category,
                limit,
                bypass_cache,
                model,
                threshold,
                chunk_size,
                no_report,
            )
            .await?;
        }
        Commands::Score {
            question,
            response_file,
            keywords,
            forbidden,
            threshold,
        } => {
            handle_score_command(&config, question, response_file, keywords, forbidden, threshold)
                .await?;
        }
        Commands::Cases(cases_command) => match cases_command {
            CasesCommands::List { category, limit } => {
                handle_cases_list_command(&config, category, limit).await?;
            }
            CasesCommands::Seed { force } => {
                handle_cases_seed_command(&config, force).await?;
            }
            CasesCommands::Clear { force } => {
                handle_cases_clear_command(&config, force).await?;
            }
        },
        Commands::Cache(cache_command) => match cache_command {
            CacheCommands::Stats => {
                handle_cache_stats_command(&config).await?;
            }
            CacheCommands::Clear {
                older_than_hours,
                force,
            } => {
                handle_cache_clear_command(&config, older_than_hours, force).await?;
            }
        },
        Commands::Config => {
            handle_config_command(&config).await?;
        }
    }

    Ok(())
}
