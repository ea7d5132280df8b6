pub mod test_sql;

pub use test_sql::{
    CompiledTest, compile_manifest, compile_test, compile_with_contract, quote_identifier,
    quote_literal,
};
