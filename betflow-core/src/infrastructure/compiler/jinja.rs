// betflow-core/src/infrastructure/compiler/jinja.rs

// Test arguments may carry Jinja (`{{ var('odds_history_start') }}`); this
// renders them before they are inlined into the generated SQL.

use minijinja::{Environment, Error, ErrorKind, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::compiler::quote_identifier;
use crate::domain::error::DomainError;
use crate::domain::ports::TemplateEngine;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    pub fn new(vars: BTreeMap<String, serde_json::Value>) -> Self {
        let mut env = Environment::new();
        let vars = Arc::new(vars);

        env.add_function(
            "var",
            move |name: String, default: Option<Value>| -> Result<Value, Error> {
                match vars.get(&name) {
                    Some(value) => Ok(Value::from_serialize(value)),
                    None => default.ok_or_else(|| {
                        Error::new(
                            ErrorKind::InvalidOperation,
                            format!("Required var '{}' is not defined in the project config", name),
                        )
                    }),
                }
            },
        );

        env.add_function("ref", |model_name: String| -> String {
            quote_identifier(&model_name)
        });

        Self { env }
    }

    pub fn render_str(&self, template: &str) -> Result<String, InfrastructureError> {
        self.env
            .render_str(template, ())
            .map_err(InfrastructureError::TemplateError)
    }
}

impl Default for JinjaRenderer {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl TemplateEngine for JinjaRenderer {
    fn render(&self, template: &str) -> Result<String, DomainError> {
        self.render_str(template)
            .map_err(|e| DomainError::TemplateError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn renderer() -> JinjaRenderer {
        JinjaRenderer::new(BTreeMap::from([(
            "odds_history_start".to_string(),
            serde_json::Value::String("'2020-01-01'".to_string()),
        )]))
    }

    #[test]
    fn test_var_resolves_project_value() -> Result<()> {
        let out = renderer().render_str("{{ var('odds_history_start') }}")?;
        assert_eq!(out, "'2020-01-01'");
        Ok(())
    }

    #[test]
    fn test_var_default() -> Result<()> {
        let out = renderer().render_str("{{ var('season_end', 'current_timestamp') }}")?;
        assert_eq!(out, "current_timestamp");
        Ok(())
    }

    #[test]
    fn test_missing_var_is_an_error() {
        let result = renderer().render("{{ var('season_end') }}");
        assert!(matches!(result, Err(DomainError::TemplateError(_))));
    }

    #[test]
    fn test_ref_quotes_model() -> Result<()> {
        let out = renderer().render_str("SELECT * FROM {{ ref('stg_nba_odds') }}")?;
        assert_eq!(out, "SELECT * FROM \"stg_nba_odds\"");
        Ok(())
    }
}
