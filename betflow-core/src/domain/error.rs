// betflow-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unsupported schema version {found} in {path} (expected {expected})")]
    #[diagnostic(
        code(betflow::domain::version),
        help("Set `version: {expected}` at the top of the schema file.")
    )]
    UnsupportedVersion {
        path: String,
        found: u32,
        expected: u32,
    },

    #[error("Model '{name}' is declared more than once ({first} and {second})")]
    #[diagnostic(code(betflow::domain::duplicate_model))]
    DuplicateModel {
        name: String,
        first: String,
        second: String,
    },

    #[error("Column '{column}' is declared more than once in model '{model}'")]
    #[diagnostic(code(betflow::domain::duplicate_column))]
    DuplicateColumn { model: String, column: String },

    #[error("Unknown test '{test}' on {model}.{column}")]
    #[diagnostic(
        code(betflow::domain::unknown_test),
        help(
            "Supported tests: not_null, unique, accepted_values, relationships, dbt_expectations.expect_column_values_to_be_between, odds_sport_key, odds_american_price, odds_snapshot_grid"
        )
    )]
    UnknownTest {
        model: String,
        column: String,
        test: String,
    },

    #[error("Invalid configuration for test '{test}' on {model}.{column}: {reason}")]
    #[diagnostic(code(betflow::domain::test_config))]
    InvalidTestConfig {
        model: String,
        column: String,
        test: String,
        reason: String,
    },

    #[error("Bound `{expression}` of '{test}' is not a valid SQL expression: {reason}")]
    #[diagnostic(
        code(betflow::domain::bound),
        help("Range bounds are inlined into SQL; quote string literals, e.g. \"'2020-01-01'\".")
    )]
    InvalidBound {
        test: String,
        expression: String,
        reason: String,
    },

    #[error("Unquoted value `{value}` of '{test}' is not a valid SQL expression: {reason}")]
    #[diagnostic(
        code(betflow::domain::value),
        help("Drop `quote: false` to compare the values as strings.")
    )]
    InvalidValue {
        test: String,
        value: String,
        reason: String,
    },

    #[error("Template Error: {0}")]
    #[diagnostic(code(betflow::domain::template))]
    TemplateError(String),

    #[error("Model '{0}' not found in manifest")]
    #[diagnostic(code(betflow::domain::model_not_found))]
    ModelNotFound(String),

    #[error("Manifest loading Error: {0}")]
    #[diagnostic(code(betflow::domain::manifest))]
    ManifestError(String),
}
