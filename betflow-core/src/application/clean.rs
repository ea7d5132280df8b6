// betflow-core/src/application/clean.rs

use crate::error::BetflowError;
use crate::infrastructure::config::project::load_project_config;
use std::fs;
use std::path::{Component, Path};

/// Removes every `clean-targets` entry of the project. Entries that would
/// leave the project directory are refused.
pub fn clean_project(project_dir: &Path) -> Result<Vec<String>, BetflowError> {
    tracing::info!("🧹 Cleaning build artifacts...");

    let config = load_project_config(project_dir)?;

    // Every target is checked before anything is removed.
    for target_rel_path in &config.clean_targets {
        check_target(target_rel_path)?;
    }

    let mut removed = Vec::new();
    for target_rel_path in config.clean_targets {
        let full_path = project_dir.join(&target_rel_path);
        if full_path.is_dir() {
            fs::remove_dir_all(&full_path)?;
        } else if full_path.exists() {
            fs::remove_file(&full_path)?;
        } else {
            continue;
        }
        println!("   🗑️  Artifact removed: {}", target_rel_path);
        removed.push(target_rel_path);
    }

    Ok(removed)
}

/// A target must name something strictly inside the project directory.
fn check_target(target_rel_path: &str) -> Result<(), BetflowError> {
    let rel = Path::new(target_rel_path);
    let escapes = rel.is_absolute()
        || rel
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
    let is_root = rel.components().all(|c| matches!(c, Component::CurDir));

    if escapes || is_root {
        return Err(BetflowError::UnsafePath(target_rel_path.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_clean_removes_target() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("betflow_project.yaml"),
            "name: odds\nversion: \"1\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("target/compiled")).unwrap();

        let removed = clean_project(dir.path()).unwrap();
        assert_eq!(removed, vec!["target"]);
        assert!(!dir.path().join("target").exists());
    }

    #[test]
    fn test_clean_refuses_traversal() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("betflow_project.yaml"),
            "name: odds\nversion: \"1\"\nclean-targets: [\"../outside\"]\n",
        )
        .unwrap();

        let result = clean_project(dir.path());
        assert!(matches!(result, Err(BetflowError::UnsafePath(_))));
    }

    #[test]
    fn test_clean_refuses_project_root() {
        for target in [".", "", "./", "./."] {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("betflow_project.yaml"),
                format!("name: odds\nversion: \"1\"\nclean-targets: [\"{}\"]\n", target),
            )
            .unwrap();
            fs::create_dir_all(dir.path().join("models")).unwrap();
            fs::write(dir.path().join("models/schema.yml"), "version: 2\n").unwrap();

            let result = clean_project(dir.path());
            assert!(
                matches!(result, Err(BetflowError::UnsafePath(_))),
                "target {:?} was accepted",
                target
            );
            assert!(dir.path().join("models/schema.yml").exists());
            assert!(dir.path().join("betflow_project.yaml").exists());
        }
    }

    #[test]
    fn test_clean_checks_every_target_first() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("betflow_project.yaml"),
            "name: odds\nversion: \"1\"\nclean-targets: [\"target\", \"../outside\"]\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("target/compiled")).unwrap();

        let result = clean_project(dir.path());
        assert!(matches!(result, Err(BetflowError::UnsafePath(_))));
        assert!(dir.path().join("target/compiled").exists());
    }
}
