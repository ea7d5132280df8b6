// betflow-core/src/infrastructure/compiler/discovery.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::domain::error::DomainError;
use crate::domain::ports::ManifestLoader;
use crate::domain::project::{ColumnInterner, ColumnNode, Manifest, ModelNode, ProjectConfig};
use crate::domain::quality::{DataTest, TestConfigError};
use crate::error::BetflowError;
use crate::infrastructure::config::schema::{
    ColumnSchema, ModelSchema, SUPPORTED_VERSION, SchemaFile, parse_schema_str,
};
use crate::infrastructure::error::InfrastructureError;

/// A schema document found under one of the model paths.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Path relative to the project root.
    pub path: PathBuf,
    pub content: String,
}

pub struct SchemaDiscovery;

impl ManifestLoader for SchemaDiscovery {
    fn load(&self, root: &Path, config: &ProjectConfig) -> Result<Manifest, DomainError> {
        Self::discover(root, config).map_err(|e| match e {
            BetflowError::Domain(domain) => domain,
            other => DomainError::ManifestError(other.to_string()),
        })
    }
}

impl SchemaDiscovery {
    #[instrument(skip(config))]
    pub fn discover(project_dir: &Path, config: &ProjectConfig) -> Result<Manifest, BetflowError> {
        let mut manifest = Manifest::new(config.name.clone());
        let mut interner = ColumnInterner::default();

        for doc in Self::documents(project_dir, config)? {
            let schema = parse_schema_str(&doc.content, &doc.path.display().to_string())?;
            Self::add_schema(&mut manifest, &mut interner, schema, &doc.path)?;
        }

        let (enabled, disabled) = manifest.test_counts();
        info!(
            models = manifest.models.len(),
            enabled, disabled, "Manifest resolved"
        );
        Ok(manifest)
    }

    /// Every YAML file under the model paths that declares `models:`, sorted by path.
    pub fn documents(
        project_dir: &Path,
        config: &ProjectConfig,
    ) -> Result<Vec<SchemaDocument>, InfrastructureError> {
        let mut docs = Vec::new();

        for model_path in &config.model_paths {
            let root = project_dir.join(model_path);
            if !root.exists() {
                debug!(path = ?root, "Model path does not exist, skipping");
                continue;
            }

            let walker = WalkDir::new(&root)
                .follow_links(true)
                .sort_by_file_name();

            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                let is_yaml = path
                    .extension()
                    .is_some_and(|ext| ext == "yml" || ext == "yaml");
                if !is_yaml || !path.is_file() {
                    continue;
                }

                let content = fs::read_to_string(path)?;
                let value: serde_yaml::Value = serde_yaml::from_str(&content)
                    .map_err(|e| InfrastructureError::yaml(path.display(), e))?;
                if value.get("models").is_none() {
                    debug!(path = ?path, "No models declared, skipping");
                    continue;
                }

                docs.push(SchemaDocument {
                    path: path.strip_prefix(project_dir).unwrap_or(path).to_path_buf(),
                    content,
                });
            }
        }

        Ok(docs)
    }

    /// Resolves one parsed document into the manifest, checking every schema rule.
    pub fn add_schema(
        manifest: &mut Manifest,
        interner: &mut ColumnInterner,
        schema: SchemaFile,
        path: &Path,
    ) -> Result<(), DomainError> {
        if schema.version != SUPPORTED_VERSION {
            return Err(DomainError::UnsupportedVersion {
                path: path.display().to_string(),
                found: schema.version,
                expected: SUPPORTED_VERSION,
            });
        }

        for ModelSchema {
            name,
            description,
            columns,
        } in schema.models
        {
            let columns = columns
                .into_iter()
                .map(|col| resolve_column(&name, col))
                .collect::<Result<Vec<_>, _>>()?;

            let node = ModelNode::new(
                name,
                description,
                path.to_path_buf(),
                interner.intern(columns),
            )?;
            manifest.push_model(node)?;
        }

        Ok(())
    }
}

fn resolve_column(model: &str, col: ColumnSchema) -> Result<ColumnNode, DomainError> {
    let mut tests = Vec::with_capacity(col.tests.len());

    for def in &col.tests {
        let Some(test_name) = def.name() else {
            return Err(DomainError::InvalidTestConfig {
                model: model.to_string(),
                column: col.name.clone(),
                test: "<mapping>".to_string(),
                reason: "a test entry must name exactly one test".to_string(),
            });
        };

        let test = DataTest::parse(test_name, def.params()).map_err(|e| match e {
            TestConfigError::Unknown(test) => DomainError::UnknownTest {
                model: model.to_string(),
                column: col.name.clone(),
                test,
            },
            TestConfigError::Invalid(reason) => DomainError::InvalidTestConfig {
                model: model.to_string(),
                column: col.name.clone(),
                test: test_name.to_string(),
                reason,
            },
        })?;
        tests.push(test);
    }

    Ok(ColumnNode {
        name: col.name,
        description: col.description,
        tests,
    })
}
