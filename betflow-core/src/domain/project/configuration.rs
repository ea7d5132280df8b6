// src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate, Clone)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,
    pub version: String,
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(rename = "model-paths", default = "default_model_paths")]
    pub model_paths: Vec<String>,

    #[serde(rename = "seed-paths", default = "default_seed_paths")]
    pub seed_paths: Vec<String>,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(rename = "clean-targets", default = "default_clean_targets")]
    pub clean_targets: Vec<String>,

    /// DuckDB file, relative to the project root, or `:memory:`.
    #[serde(default = "default_database")]
    pub database: String,

    /// Maximum number of data tests in flight.
    #[validate(range(min = 1, max = 64, message = "threads must be between 1 and 64"))]
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Adds the odds feed checks (league key, h2h market, American prices,
    /// snapshot grid) to every `stg_<league>_odds` model.
    #[serde(rename = "odds-contract", default = "default_odds_contract")]
    pub odds_contract: bool,

    /// Values exposed to test arguments through `{{ var('name') }}`.
    #[serde(default)]
    pub vars: BTreeMap<String, serde_json::Value>,
}

fn default_model_paths() -> Vec<String> {
    vec!["models".to_string()]
}
fn default_seed_paths() -> Vec<String> {
    vec!["seeds".to_string()]
}
fn default_clean_targets() -> Vec<String> {
    vec!["target".to_string()]
}
fn default_target_path() -> String {
    "target".to_string()
}
fn default_profile() -> String {
    "dev".to_string()
}
fn default_database() -> String {
    "target/betflow.duckdb".to_string()
}
fn default_threads() -> usize {
    4
}
fn default_odds_contract() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: ProjectConfig =
            serde_yaml::from_str("name: odds\nversion: \"1.0.0\"\n").unwrap();
        assert_eq!(config.profile, "dev");
        assert_eq!(config.model_paths, vec!["models"]);
        assert_eq!(config.seed_paths, vec!["seeds"]);
        assert_eq!(config.database, "target/betflow.duckdb");
        assert_eq!(config.threads, 4);
        assert!(config.odds_contract);
        assert!(config.vars.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_threads() {
        let config: ProjectConfig =
            serde_yaml::from_str("name: odds\nversion: \"1\"\nthreads: 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_name() {
        let config: ProjectConfig = serde_yaml::from_str("name: \"\"\nversion: \"1\"\n").unwrap();
        assert!(config.validate().is_err());
    }
}
