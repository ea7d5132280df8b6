// src/infrastructure/config/schema.rs
//
// The schema document exactly as written on disk. Anchors and aliases are
// resolved by the YAML parser, so an aliased `columns` list arrives here as a
// plain copy of the anchored one.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use crate::infrastructure::error::InfrastructureError;

/// Schema version this engine understands.
pub const SUPPORTED_VERSION: u32 = 2;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SchemaFile {
    pub version: u32,

    #[serde(default)]
    pub models: Vec<ModelSchema>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelSchema {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestDefinition>,
}

/// `- not_null` or `- accepted_values: { values: [...] }`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum TestDefinition {
    Name(String),
    Configured(BTreeMap<String, Value>),
}

impl TestDefinition {
    /// The test name, or `None` for a mapping that does not hold exactly one key.
    pub fn name(&self) -> Option<&str> {
        match self {
            TestDefinition::Name(name) => Some(name),
            TestDefinition::Configured(map) if map.len() == 1 => {
                map.keys().next().map(String::as_str)
            }
            TestDefinition::Configured(_) => None,
        }
    }

    /// Arguments of the test; `Null` for the bare form.
    pub fn params(&self) -> &Value {
        static NULL: Value = Value::Null;
        match self {
            TestDefinition::Name(_) => &NULL,
            TestDefinition::Configured(map) => map.values().next().unwrap_or(&NULL),
        }
    }
}

impl SchemaFile {
    pub fn to_yaml(&self) -> Result<String, InfrastructureError> {
        serde_yaml::to_string(self).map_err(|e| InfrastructureError::yaml("<serialize>", e))
    }
}

pub fn parse_schema_str(content: &str, origin: &str) -> Result<SchemaFile, InfrastructureError> {
    serde_yaml::from_str(content).map_err(|e| InfrastructureError::yaml(origin, e))
}

#[instrument]
pub fn load_schema_file(path: &Path) -> Result<SchemaFile, InfrastructureError> {
    let content = fs::read_to_string(path)?;
    let schema = parse_schema_str(&content, &path.display().to_string())?;
    debug!(models = schema.models.len(), "Schema file parsed");
    Ok(schema)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const STAGING_SCHEMA: &str =
        include_str!("../../../../demos/odds_project/models/staging/schema.yml");

    fn staging() -> SchemaFile {
        parse_schema_str(STAGING_SCHEMA, "schema.yml").unwrap()
    }

    #[test]
    fn test_staging_models_in_order() {
        let schema = staging();
        assert_eq!(schema.version, SUPPORTED_VERSION);
        let names: Vec<&str> = schema.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["stg_nba_odds", "stg_nfl_odds", "stg_nhl_odds", "stg_cfb_odds"]
        );
    }

    #[test]
    fn test_aliased_columns_resolve_to_nfl_list() {
        let schema = staging();
        let nfl = &schema.models[1].columns;
        assert!(!nfl.is_empty());
        assert_eq!(&schema.models[2].columns, nfl);
        assert_eq!(&schema.models[3].columns, nfl);
        assert_ne!(&schema.models[0].columns, nfl);
    }

    #[test]
    fn test_names_unique() {
        let schema = staging();
        let models: HashSet<&str> = schema.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(models.len(), schema.models.len());

        for model in &schema.models {
            let cols: HashSet<&str> = model.columns.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(cols.len(), model.columns.len(), "in {}", model.name);
        }
    }

    #[test]
    fn test_only_not_null_is_active() {
        let schema = staging();
        let active: Vec<&str> = schema
            .models
            .iter()
            .flat_map(|m| m.columns.iter())
            .flat_map(|c| c.tests.iter())
            .filter_map(TestDefinition::name)
            .collect();
        assert!(!active.is_empty());
        assert!(active.iter().all(|t| *t == "not_null"));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let schema = staging();
        let yaml = schema.to_yaml().unwrap();
        let reparsed = parse_schema_str(&yaml, "roundtrip").unwrap();
        assert_eq!(schema, reparsed);
    }

    #[test]
    fn test_configured_definition() {
        let schema = parse_schema_str(
            r#"
version: 2
models:
  - name: stg_nba_odds
    columns:
      - name: market_key
        tests:
          - not_null
          - accepted_values:
              values: ['h2h', 'spreads']
"#,
            "inline",
        )
        .unwrap();
        let tests = &schema.models[0].columns[0].tests;
        assert_eq!(tests[0], TestDefinition::Name("not_null".into()));
        assert_eq!(tests[1].name(), Some("accepted_values"));
        assert_eq!(tests[1].params()["values"][1].as_str(), Some("spreads"));
        assert!(tests[0].params().is_null());
    }

    #[test]
    fn test_multi_key_mapping_has_no_name() {
        let def: TestDefinition = serde_yaml::from_str("{not_null: null, unique: null}").unwrap();
        assert_eq!(def.name(), None);
    }

    #[test]
    fn test_load_schema_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("schema.yml");
        std::fs::write(&good, STAGING_SCHEMA).unwrap();
        assert_eq!(load_schema_file(&good).unwrap().models.len(), 4);

        let bad = dir.path().join("broken.yml");
        std::fs::write(&bad, "version: two\n").unwrap();
        match load_schema_file(&bad) {
            Err(InfrastructureError::YamlError { path, .. }) => assert!(path.ends_with("broken.yml")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_missing_version_is_an_error() {
        let result = parse_schema_str("models: []", "inline");
        assert!(matches!(
            result,
            Err(InfrastructureError::YamlError { .. })
        ));
    }
}
