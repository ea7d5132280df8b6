// betflow-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports: what the engine needs from a warehouse, without knowing which one.
pub mod ports;

// 2. Domain: schema vocabulary, data tests, SQL generation.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure: YAML documents, project config, DuckDB, templating.
pub mod infrastructure;

// 4. Application: use cases (compile, seed, test, clean).
pub mod application;

pub mod error;

pub use error::BetflowError;
