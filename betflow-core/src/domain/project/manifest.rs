// betflow-core/src/domain/project/manifest.rs

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::error::DomainError;
use crate::domain::quality::DataTest;

/// The resolved state of every schema document of a project.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Manifest {
    pub project_name: String,

    /// Models in discovery order (files sorted by path, then declaration order).
    pub models: Vec<ModelNode>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// YAML file the model was declared in.
    pub schema_path: PathBuf,
    /// Immutable once loaded; equal column lists share one allocation.
    pub columns: Arc<[ColumnNode]>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ColumnNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tests: Vec<DataTest>,
}

impl ModelNode {
    pub fn new(
        name: String,
        description: Option<String>,
        schema_path: PathBuf,
        columns: Arc<[ColumnNode]>,
    ) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for col in columns.iter() {
            if !seen.insert(col.name.as_str()) {
                return Err(DomainError::DuplicateColumn {
                    model: name,
                    column: col.name.clone(),
                });
            }
        }

        Ok(Self {
            name,
            description,
            schema_path,
            columns,
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnNode> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl Manifest {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            models: Vec::new(),
        }
    }

    /// Adds a model, enforcing project-wide name uniqueness.
    pub fn push_model(&mut self, model: ModelNode) -> Result<(), DomainError> {
        if let Some(existing) = self.model(&model.name) {
            return Err(DomainError::DuplicateModel {
                name: model.name.clone(),
                first: existing.schema_path.display().to_string(),
                second: model.schema_path.display().to_string(),
            });
        }
        self.models.push(model);
        Ok(())
    }

    pub fn model(&self, name: &str) -> Option<&ModelNode> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Restricts the manifest to a single model.
    pub fn select(&self, name: &str) -> Result<Manifest, DomainError> {
        let model = self
            .model(name)
            .cloned()
            .ok_or_else(|| DomainError::ModelNotFound(name.to_string()))?;
        Ok(Manifest {
            project_name: self.project_name.clone(),
            models: vec![model],
        })
    }

    /// Every declared test with its owning model and column.
    pub fn tests(&self) -> impl Iterator<Item = (&ModelNode, &ColumnNode, &DataTest)> {
        self.models.iter().flat_map(|m| {
            m.columns
                .iter()
                .flat_map(move |c| c.tests.iter().map(move |t| (m, c, t)))
        })
    }

    /// (enabled, disabled) test counts.
    pub fn test_counts(&self) -> (usize, usize) {
        self.tests().fold((0, 0), |(on, off), (_, _, t)| {
            if t.enabled { (on + 1, off) } else { (on, off + 1) }
        })
    }
}

/// Hands out shared column lists: a list equal to one already seen reuses it.
#[derive(Default)]
pub struct ColumnInterner {
    lists: Vec<Arc<[ColumnNode]>>,
}

impl ColumnInterner {
    pub fn intern(&mut self, columns: Vec<ColumnNode>) -> Arc<[ColumnNode]> {
        if let Some(shared) = self.lists.iter().find(|l| l[..] == columns[..]) {
            return Arc::clone(shared);
        }
        let list: Arc<[ColumnNode]> = columns.into();
        self.lists.push(Arc::clone(&list));
        list
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn column(name: &str, tests: &[&str]) -> ColumnNode {
        ColumnNode {
            name: name.into(),
            description: None,
            tests: tests
                .iter()
                .map(|t| DataTest::parse(t, &Value::Null).unwrap())
                .collect(),
        }
    }

    fn model(name: &str, columns: Vec<ColumnNode>) -> ModelNode {
        ModelNode::new(
            name.into(),
            None,
            PathBuf::from("models/schema.yml"),
            columns.into(),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = ModelNode::new(
            "stg_nba_odds".into(),
            None,
            PathBuf::from("schema.yml"),
            vec![column("game_id", &[]), column("game_id", &["not_null"])].into(),
        );
        assert!(matches!(
            result,
            Err(DomainError::DuplicateColumn { ref column, .. }) if column == "game_id"
        ));
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let mut manifest = Manifest::new("odds");
        manifest
            .push_model(model("stg_nba_odds", vec![column("game_id", &[])]))
            .unwrap();
        let err = manifest
            .push_model(model("stg_nba_odds", vec![]))
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateModel { .. }));
    }

    #[test]
    fn test_select_unknown_model() {
        let manifest = Manifest::new("odds");
        assert!(matches!(
            manifest.select("stg_mlb_odds"),
            Err(DomainError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_tests_iterates_in_declaration_order() {
        let mut manifest = Manifest::new("odds");
        manifest
            .push_model(model(
                "stg_nfl_odds",
                vec![
                    column("game_id", &["not_null", "unique"]),
                    column("home_team", &["not_null"]),
                ],
            ))
            .unwrap();

        let seen: Vec<(String, String)> = manifest
            .tests()
            .map(|(_, c, t)| (c.name.clone(), t.name.clone()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("game_id".into(), "not_null".into()),
                ("game_id".into(), "unique".into()),
                ("home_team".into(), "not_null".into()),
            ]
        );
        assert_eq!(manifest.test_counts(), (3, 0));
    }

    #[test]
    fn test_interner_shares_equal_lists() {
        let mut interner = ColumnInterner::default();
        let a = interner.intern(vec![column("game_id", &["not_null"])]);
        let b = interner.intern(vec![column("game_id", &["not_null"])]);
        let c = interner.intern(vec![column("game_id", &[])]);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
