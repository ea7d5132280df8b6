pub mod disabled;
pub mod project;
pub mod schema;

pub use disabled::{DisabledTest, scan_disabled_tests};
pub use project::load_project_config;
pub use schema::{ColumnSchema, ModelSchema, SchemaFile, TestDefinition, load_schema_file};
