//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(name = "pdrag")]
#[command(about = "Evaluation harness for the Plano Diretor RAG chatbot")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the evaluation suite against the answering endpoint
    Run {
        /// Where to load test cases from
        #[arg(long, value_enum, default_value = "inline")]
        source: CaseSourceArg,
        /// Path to a JSON suite (required with --source file)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Only run cases of this category
        #[arg(short, long)]
        category: Option<String>,
        /// Run at most N cases
        #[arg(short, long)]
        limit: Option<usize>,
        /// Ask the endpoint to skip its answer cache
        #[arg(long)]
        bypass_cache: bool,
        /// Model hint forwarded to the endpoint
        #[arg(long)]
        model: Option<String>,
        /// Override the configured pass threshold (0..=100)
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Override the configured chunk size
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Print the summary but skip writing the JSON report
        #[arg(long)]
        no_report: bool,
    },
    /// Grade a saved response against keywords, without calling the endpoint
    Score {
        /// The question the response answers
        #[arg(short, long)]
        question: String,
        /// File holding the response text
        #[arg(short, long)]
        response_file: PathBuf,
        /// Comma-separated expected keywords
        #[arg(short, long)]
        keywords: Option<String>,
        /// Comma-separated forbidden terms
        #[arg(long)]
        forbidden: Option<String>,
        /// Override the configured pass threshold (0..=100)
        #[arg(short, long)]
        threshold: Option<f64>,
    },
    /// Test case store commands
    #[command(subcommand)]
    Cases(CasesCommands),
    /// Answer cache commands
    #[command(subcommand)]
    Cache(CacheCommands),
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
pub enum CasesCommands {
    /// List test cases from the store
    List {
        /// Only list cases of this category
        #[arg(short, long)]
        category: Option<String>,
        /// Maximum number of cases to return
        #[arg(short, long, default_value = "100")]
        limit: i64,
    },
    /// Push the built-in suite into the test_cases table
    Seed {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Delete every test case from the store
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show answer cache statistics
    Stats,
    /// Clear cached answers
    Clear {
        /// Only clear entries older than this many hours
        #[arg(long)]
        older_than_hours: Option<i64>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CaseSourceArg {
    /// Built-in Plano Diretor suite
    Inline,
    /// JSON file given with --file
    File,
    /// test_cases table
    Store,
}
