// betflow-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["betflow_project.yaml", "betflow.yaml"];

#[instrument]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)
        .map_err(|e| InfrastructureError::yaml(config_path.display(), e))?;

    // Layering: BETFLOW_TARGET_PATH=/tmp/build betflow test
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

fn apply_env_overrides<F>(config: &mut ProjectConfig, lookup: F) -> Result<(), InfrastructureError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("BETFLOW_TARGET_PATH") {
        info!(old = ?config.target_path, new = ?val, "Overriding target path via ENV");
        config.target_path = val;
    }
    if let Some(val) = lookup("BETFLOW_PROFILE") {
        info!(old = ?config.profile, new = ?val, "Overriding profile via ENV");
        config.profile = val;
    }
    if let Some(val) = lookup("BETFLOW_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
    if let Some(val) = lookup("BETFLOW_THREADS") {
        config.threads = val.parse().map_err(|_| {
            InfrastructureError::ConfigError(format!("BETFLOW_THREADS is not a number: {}", val))
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    const MINIMAL: &str = "name: betflow_odds\nversion: \"1.0.0\"\nthreads: 2\n";

    #[test]
    fn test_load_from_primary_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("betflow_project.yaml"), MINIMAL).unwrap();

        let config = load_project_config(dir.path()).unwrap();
        assert_eq!(config.name, "betflow_odds");
        assert_eq!(config.threads, 2);
    }

    #[test]
    fn test_load_from_fallback_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("betflow.yaml"), MINIMAL).unwrap();
        assert!(load_project_config(dir.path()).is_ok());
    }

    #[test]
    fn test_missing_config() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("betflow_project.yaml"),
            "name: odds\nversion: \"1\"\nthreads: 500\n",
        )
        .unwrap();
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::ConfigError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config: ProjectConfig = serde_yaml::from_str(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("BETFLOW_TARGET_PATH", "/tmp/build"),
            ("BETFLOW_DATABASE", ":memory:"),
            ("BETFLOW_THREADS", "8"),
        ]);

        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.target_path, "/tmp/build");
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.threads, 8);
        assert_eq!(config.profile, "dev");
    }

    #[test]
    fn test_env_threads_must_be_numeric() {
        let mut config: ProjectConfig = serde_yaml::from_str(MINIMAL).unwrap();
        let result = apply_env_overrides(&mut config, |k| {
            (k == "BETFLOW_THREADS").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }
}
