// betflow/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup Logging (Tracing)
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_dir } => commands::validate::execute(project_dir),
        Commands::Compile {
            project_dir,
            select,
        } => commands::compile::execute(project_dir, select),
        Commands::Seed { project_dir } => commands::seed::execute(project_dir).await,
        Commands::Test {
            project_dir,
            select,
            no_seed,
        } => commands::data_tests::execute(project_dir, select, no_seed).await,
        Commands::Inspect {
            project_dir,
            disabled,
        } => commands::inspect::execute(project_dir, disabled),
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}
