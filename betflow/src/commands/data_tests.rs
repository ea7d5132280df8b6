// betflow/src/commands/data_tests.rs
//
// USE CASE: Seed, compile and run the data tests.

use std::path::PathBuf;

use betflow_core::application::{
    TestOutcome, compile_project, load_seeds, run_tests, write_run_results,
};
use betflow_core::infrastructure::compiler::JinjaRenderer;

use super::{load_project, open_connector};

pub async fn execute(
    project_dir: PathBuf,
    select: Option<String>,
    no_seed: bool,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();

    let (config, manifest) = load_project(&project_dir)?;
    let manifest = match select {
        Some(name) => manifest.select(&name)?,
        None => manifest,
    };

    let connector = open_connector(&project_dir, &config)?;
    if !no_seed {
        let loaded = load_seeds(&project_dir, &config, &connector).await?;
        println!("🌱 {} seeds loaded.", loaded.len());
    }

    let renderer = JinjaRenderer::new(config.vars.clone());
    let target_dir = project_dir.join(&config.target_path);
    let compiled =
        compile_project(&manifest, &renderer, &target_dir, config.odds_contract)?;

    println!("🧪 Running {} data tests...", compiled.tests.len());
    let results = run_tests(&manifest, &compiled.tests, &connector, config.threads).await;

    for result in &results.results {
        let label = result.outcome.label();
        match &result.outcome {
            TestOutcome::Pass => println!("   ✅ {:<5} {}", label, result.unique_id),
            TestOutcome::Warn { failures } => println!(
                "   ⚠️  {:<5} {} ({} failing rows)",
                label, result.unique_id, failures
            ),
            TestOutcome::Fail { failures } => eprintln!(
                "   ❌ {:<5} {} ({} failing rows)",
                label, result.unique_id, failures
            ),
            TestOutcome::Error { message } => {
                eprintln!("   💥 {:<5} {}: {}", label, result.unique_id, message)
            }
        }
    }
    for drift in &results.drift {
        if !drift.missing.is_empty() {
            println!(
                "   ⚠️  {}: documented but missing {:?}",
                drift.model, drift.missing
            );
        }
        if !drift.undocumented.is_empty() {
            println!(
                "   ⚠️  {}: undocumented columns {:?}",
                drift.model, drift.undocumented
            );
        }
    }

    let results_path = write_run_results(&results, &target_dir)?;
    tracing::debug!(path = %results_path.display(), "Run results written");
    let s = &results.summary;
    println!(
        "\nDone. PASS={} WARN={} FAIL={} ERROR={} TOTAL={} ({})",
        s.passed,
        s.warned,
        s.failed,
        s.errored,
        s.total,
        results_path.display()
    );

    if results.success() {
        println!("✨ SUCCESS! Tests finished in {:.2?}", start.elapsed());
    } else {
        eprintln!(
            "\n❌ FAILURE. {} failing, {} erroring tests.",
            s.failed, s.errored
        );
        std::process::exit(1);
    }

    Ok(())
}
