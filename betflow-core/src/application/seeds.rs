// betflow-core/src/application/seeds.rs

use std::path::Path;
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::domain::project::ProjectConfig;
use crate::error::BetflowError;
use crate::ports::connector::Connector;

/// Registers every CSV under the seed paths as a relation named after its file stem.
/// Returns the loaded relation names, sorted.
#[instrument(skip(config, connector))]
pub async fn load_seeds(
    project_dir: &Path,
    config: &ProjectConfig,
    connector: &dyn Connector,
) -> Result<Vec<String>, BetflowError> {
    let mut loaded = Vec::new();

    for seed_path in &config.seed_paths {
        let root = project_dir.join(seed_path);
        if !root.exists() {
            warn!(path = ?root, "Seed path does not exist");
            continue;
        }

        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "csv") {
                continue;
            }
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };

            connector
                .register_seed(&name, &path.display().to_string())
                .await?;
            info!(seed = %name, engine = connector.engine_name(), "Seed registered");
            loaded.push(name);
        }
    }

    loaded.sort();
    Ok(loaded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::DuckDBConnector;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_seeds_registers_views() {
        let dir = tempdir().unwrap();
        let seeds = dir.path().join("seeds");
        fs::create_dir_all(&seeds).unwrap();
        fs::write(seeds.join("stg_nfl_odds.csv"), "game_id\nnfl1\n").unwrap();
        fs::write(seeds.join("stg_nba_odds.csv"), "game_id\nnba1\nnba2\n").unwrap();
        fs::write(seeds.join("README.md"), "not a seed").unwrap();

        let config: ProjectConfig =
            serde_yaml::from_str("name: odds\nversion: \"1\"\n").unwrap();
        let connector = DuckDBConnector::new(":memory:").unwrap();

        let loaded = load_seeds(dir.path(), &config, &connector).await.unwrap();
        assert_eq!(loaded, vec!["stg_nba_odds", "stg_nfl_odds"]);

        let rows = connector
            .query_count("SELECT COUNT(*) FROM stg_nba_odds")
            .await
            .unwrap();
        assert_eq!(rows, 2);
    }

    #[tokio::test]
    async fn test_missing_seed_dir_is_not_an_error() {
        let dir = tempdir().unwrap();
        let config: ProjectConfig =
            serde_yaml::from_str("name: odds\nversion: \"1\"\n").unwrap();
        let connector = DuckDBConnector::new(":memory:").unwrap();
        assert!(load_seeds(dir.path(), &config, &connector)
            .await
            .unwrap()
            .is_empty());
    }
}
