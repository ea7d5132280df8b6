// betflow/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "betflow")]
#[command(about = "Schema-driven data tests for staged odds tables", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔎 Loads every schema document and checks names, versions and tests
    Validate {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🛠️  Writes the SQL of every enabled test under the target path
    Compile {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Compile only a specific model (ex: "stg_nba_odds")
        #[arg(long, short)]
        select: Option<String>,
    },

    /// 🌱 Loads CSV seeds into the project database
    Seed {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧪 Runs the data tests against the project database
    Test {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Test only a specific model (ex: "stg_nba_odds")
        #[arg(long, short)]
        select: Option<String>,

        /// Use the relations already in the database instead of loading seeds
        #[arg(long)]
        no_seed: bool,
    },

    /// 📋 Lists models, columns and tests
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// List the commented-out tests instead
        #[arg(long)]
        disabled: bool,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
