// betflow-core/src/application/testing.rs
//
// Executes compiled data tests. A failing or broken test is recorded and the
// run carries on with the remaining ones.

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::compiler::CompiledTest;
use crate::domain::project::Manifest;
use crate::domain::quality::Severity;
use crate::error::BetflowError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::connector::Connector;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Pass,
    Fail { failures: u64 },
    Warn { failures: u64 },
    Error { message: String },
}

impl TestOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TestOutcome::Pass => "PASS",
            TestOutcome::Fail { .. } => "FAIL",
            TestOutcome::Warn { .. } => "WARN",
            TestOutcome::Error { .. } => "ERROR",
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct TestResult {
    pub unique_id: String,
    pub model: String,
    pub column: String,
    pub test_name: String,
    #[serde(flatten)]
    pub outcome: TestOutcome,
    pub execution_time: f64,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warned: usize,
    pub errored: usize,
}

/// Difference between the documented columns of a model and its relation.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StructureDrift {
    pub model: String,
    /// Documented, but absent from the relation.
    pub missing: Vec<String>,
    /// Present in the relation, but not documented.
    pub undocumented: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct RunResults {
    pub generated_at: DateTime<Utc>,
    pub elapsed_time: f64,
    pub engine: String,
    pub summary: RunSummary,
    pub results: Vec<TestResult>,
    pub drift: Vec<StructureDrift>,
}

impl RunResults {
    /// False when any error-severity test failed or any test could not run.
    pub fn success(&self) -> bool {
        self.summary.failed == 0 && self.summary.errored == 0
    }
}

impl RunSummary {
    fn from_results(results: &[TestResult]) -> Self {
        let mut summary = RunSummary {
            total: results.len(),
            ..Default::default()
        };
        for r in results {
            match r.outcome {
                TestOutcome::Pass => summary.passed += 1,
                TestOutcome::Fail { .. } => summary.failed += 1,
                TestOutcome::Warn { .. } => summary.warned += 1,
                TestOutcome::Error { .. } => summary.errored += 1,
            }
        }
        summary
    }
}

/// Runs every compiled test with at most `threads` queries in flight.
/// Results keep the order of `tests`.
#[instrument(skip_all, fields(tests = tests.len(), threads = threads))]
pub async fn run_tests(
    manifest: &Manifest,
    tests: &[CompiledTest],
    connector: &dyn Connector,
    threads: usize,
) -> RunResults {
    let start = Instant::now();

    let drift = check_structure(manifest, connector).await;

    let results: Vec<TestResult> = futures::stream::iter(tests)
        .map(|test| run_one(test, connector))
        .buffered(threads.max(1))
        .collect()
        .await;

    let summary = RunSummary::from_results(&results);
    info!(
        passed = summary.passed,
        failed = summary.failed,
        warned = summary.warned,
        errored = summary.errored,
        "Test run finished"
    );

    RunResults {
        generated_at: Utc::now(),
        elapsed_time: start.elapsed().as_secs_f64(),
        engine: connector.engine_name().to_string(),
        summary,
        results,
        drift,
    }
}

async fn run_one(test: &CompiledTest, connector: &dyn Connector) -> TestResult {
    let start = Instant::now();
    debug!(test = %test.unique_id, "⚡ Executing test query");

    let outcome = match connector.query_count(&test.sql).await {
        Ok(0) => TestOutcome::Pass,
        Ok(failures) => match test.severity {
            Severity::Error => TestOutcome::Fail { failures },
            Severity::Warn => TestOutcome::Warn { failures },
        },
        Err(e) => {
            error!(test = %test.unique_id, "❌ Test query failed: {}", e);
            TestOutcome::Error {
                message: e.to_string(),
            }
        }
    };

    TestResult {
        unique_id: test.unique_id.clone(),
        model: test.model.clone(),
        column: test.column.clone(),
        test_name: test.test_name.clone(),
        outcome,
        execution_time: start.elapsed().as_secs_f64(),
    }
}

/// Compares documented columns with the relation. Relations that cannot be
/// described are skipped; their tests will report the error.
async fn check_structure(manifest: &Manifest, connector: &dyn Connector) -> Vec<StructureDrift> {
    let mut drift = Vec::new();

    for model in &manifest.models {
        let actual = match connector.fetch_columns(&model.name).await {
            Ok(cols) if !cols.is_empty() => cols,
            Ok(_) => continue,
            Err(e) => {
                warn!(model = %model.name, "Could not describe relation: {}", e);
                continue;
            }
        };

        let actual: HashSet<String> = actual.into_iter().map(|c| c.name.to_lowercase()).collect();
        let expected: HashSet<String> =
            model.columns.iter().map(|c| c.name.to_lowercase()).collect();

        let mut missing: Vec<String> = expected.difference(&actual).cloned().collect();
        let mut undocumented: Vec<String> = actual.difference(&expected).cloned().collect();
        if missing.is_empty() && undocumented.is_empty() {
            continue;
        }
        missing.sort();
        undocumented.sort();

        warn!(
            model = %model.name,
            ?missing,
            ?undocumented,
            "⚠️  Documented columns and relation differ"
        );
        drift.push(StructureDrift {
            model: model.name.clone(),
            missing,
            undocumented,
        });
    }

    drift
}

pub fn write_run_results(results: &RunResults, target_dir: &Path) -> Result<PathBuf, BetflowError> {
    let path = target_dir.join("run_results.json");
    let json = serde_json::to_string_pretty(results).map_err(InfrastructureError::JsonError)?;
    atomic_write(&path, json)?;
    Ok(path)
}
