//! Generate a dataset.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use docwarp_common::config::AppConfig;
use docwarp_dataset::{spawn_dataset_job, DatasetJob, DatasetPipeline};
use docwarp_effect_catalog::EffectGroup;

pub async fn run(
    config: &AppConfig,
    image: PathBuf,
    output: Option<PathBuf>,
    effects: Vec<String>,
    groups: Vec<String>,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let dataset_dir = output.unwrap_or_else(|| config.dataset_dir.clone());
    let groups = groups
        .iter()
        .map(|g| g.parse::<EffectGroup>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut job = DatasetJob::new(&image, &dataset_dir).with_groups(groups);
    if !effects.is_empty() {
        job = job.with_effects(effects);
    }

    println!("Generating dataset from: {}", image.display());
    println!("  Output: {}", dataset_dir.display());

    let handle = spawn_dataset_job(super::orchestrator(config), DatasetPipeline::new(), job);
    let cancel = handle.cancel_flag();

    let mut worker = tokio::task::spawn_blocking(move || {
        for p in handle.progress().iter() {
            println!("  [{}/{}] {}", p.index + 1, p.total, p.effect_id);
        }
        handle.join()
    });

    let joined = tokio::select! {
        res = &mut worker => res,
        _ = tokio::signal::ctrl_c() => {
            println!("Interrupted: stopping after the current effect...");
            cancel.store(true, Ordering::SeqCst);
            worker.await
        }
    };
    let (report, _orchestrator) = joined??;

    println!();
    println!("Dataset: {}", report.summary());
    for failure in &report.failures {
        println!(
            "  [FAIL] {} ({}): {}",
            failure.effect_id, failure.kind, failure.message
        );
    }

    if let Some(path) = report_path {
        report.write_json(&path)?;
        println!("Report written: {}", path.display());
    }

    Ok(())
}
