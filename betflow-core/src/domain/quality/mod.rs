// betflow-core/src/domain/quality/mod.rs

pub mod odds;

pub use data_test::{Bound, DataTest, Severity, TestConfigError, TestKind};
pub use odds::{ContractCheck, Sport, contract_checks};
