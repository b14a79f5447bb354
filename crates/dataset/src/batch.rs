//! Batch dataset generation.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use docwarp_common::clock::{epoch_to_rfc3339, EpochClock, SystemClock};
use docwarp_common::error::{DocwarpError, DocwarpResult, ErrorKind};
use docwarp_effect_catalog::{EffectCatalog, EffectGroup};
use serde::{Deserialize, Serialize};

use crate::files::{move_file, reserve_dataset_path};
use crate::orchestrator::EffectOrchestrator;

/// What to render in one batch run.
///
/// Each job carries its own cancel flag, so cancelling one run never affects
/// another. Cloning a job yields a fresh, uncancelled flag.
#[derive(Debug)]
pub struct DatasetJob {
    /// Document image every effect is applied to.
    pub source_image: PathBuf,

    /// Output directory, created if absent.
    pub dataset_dir: PathBuf,

    /// Explicit effects, rendered first and in this order.
    pub effect_ids: Option<Vec<String>>,

    /// Groups whose effects are rendered (in catalog order).
    pub groups: Vec<EffectGroup>,

    cancel: Arc<AtomicBool>,
}

impl Clone for DatasetJob {
    fn clone(&self) -> Self {
        Self {
            source_image: self.source_image.clone(),
            dataset_dir: self.dataset_dir.clone(),
            effect_ids: self.effect_ids.clone(),
            groups: self.groups.clone(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl DatasetJob {
    /// A job covering the whole catalog.
    pub fn new(source_image: impl Into<PathBuf>, dataset_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_image: source_image.into(),
            dataset_dir: dataset_dir.into(),
            effect_ids: None,
            groups: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops this job before its next effect when set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    pub fn with_effects(mut self, effect_ids: Vec<String>) -> Self {
        self.effect_ids = Some(effect_ids);
        self
    }

    pub fn with_groups(mut self, groups: Vec<EffectGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// The ordered effect list this job renders.
    ///
    /// With neither explicit effects nor groups this is the full catalog
    /// order. Explicit effects come first as given (unknown identifiers are
    /// kept so they surface as item failures), followed by the selected
    /// groups' effects not already listed.
    pub fn effect_sequence(&self, catalog: &EffectCatalog) -> Vec<String> {
        if self.effect_ids.is_none() && self.groups.is_empty() {
            return catalog.all_effect_ids().to_vec();
        }

        let mut sequence: Vec<String> = self.effect_ids.clone().unwrap_or_default();
        for id in catalog.all_effect_ids() {
            let in_group = catalog
                .descriptor(id)
                .is_some_and(|d| self.groups.contains(&d.group));
            if in_group && !sequence.contains(id) {
                sequence.push(id.clone());
            }
        }
        sequence
    }
}

/// Emitted once per effect, before its render starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetProgress {
    /// Zero-based position in the batch.
    pub index: usize,

    /// Number of effects in the batch.
    pub total: usize,

    /// Effect about to render.
    pub effect_id: String,
}

/// Progress callback for dataset generation.
pub type ProgressCallback = Box<dyn Fn(DatasetProgress) + Send>;

/// A successfully written dataset image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetItem {
    pub effect_id: String,

    /// Epoch seconds embedded in the file name.
    pub timestamp: i64,

    pub output_path: PathBuf,

    /// False when the preset lacked the target object.
    pub texture_attached: bool,
}

/// An effect that could not be rendered or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetFailure {
    pub effect_id: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl DatasetFailure {
    pub fn from_error(effect_id: &str, error: &DocwarpError) -> Self {
        Self {
            effect_id: effect_id.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReport {
    pub source_image: PathBuf,
    pub dataset_dir: PathBuf,

    /// Effects the batch was asked to render.
    pub requested: usize,

    pub items: Vec<DatasetItem>,
    pub failures: Vec<DatasetFailure>,

    /// True when the run stopped early on request.
    pub cancelled: bool,
}

impl DatasetReport {
    pub fn succeeded(&self) -> usize {
        self.items.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn attempted(&self) -> usize {
        self.items.len() + self.failures.len()
    }

    /// One-line summary, e.g. `48/50 succeeded, 2 failed`.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}/{} succeeded, {} failed",
            self.succeeded(),
            self.requested,
            self.failed()
        );
        if self.cancelled {
            line.push_str(&format!(
                " (cancelled after {} of {})",
                self.attempted(),
                self.requested
            ));
        }
        line
    }

    pub fn write_json(&self, path: &Path) -> DocwarpResult<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Runs batches: one sequential pass over the requested effects.
///
/// Holds nothing but the clock, so one pipeline can serve any number of runs.
#[derive(Clone)]
pub struct DatasetPipeline {
    clock: Arc<dyn EpochClock>,
}

impl Default for DatasetPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetPipeline {
    /// A pipeline stamping items with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn EpochClock>) -> Self {
        Self { clock }
    }

    /// Render every effect of `job` into its dataset directory.
    ///
    /// Only a dataset directory that cannot be created fails the whole run;
    /// every other error is recorded against its effect and the batch moves
    /// on.
    pub fn generate_dataset(
        &self,
        orchestrator: &mut EffectOrchestrator,
        job: &DatasetJob,
        progress: Option<ProgressCallback>,
    ) -> DocwarpResult<DatasetReport> {
        let started = std::time::Instant::now();

        std::fs::create_dir_all(&job.dataset_dir).map_err(|source| {
            DocwarpError::DirectoryCreate {
                path: job.dataset_dir.clone(),
                source,
            }
        })?;

        let effects = job.effect_sequence(orchestrator.catalog());
        let total = effects.len();

        tracing::info!(
            source = %job.source_image.display(),
            dataset = %job.dataset_dir.display(),
            effects = total,
            "Starting dataset generation"
        );

        let mut report = DatasetReport {
            source_image: job.source_image.clone(),
            dataset_dir: job.dataset_dir.clone(),
            requested: total,
            items: Vec::with_capacity(total),
            failures: Vec::new(),
            cancelled: false,
        };

        for (index, effect_id) in effects.iter().enumerate() {
            if job.is_cancelled() {
                tracing::warn!(
                    completed = index,
                    remaining = total - index,
                    "Dataset generation cancelled"
                );
                report.cancelled = true;
                break;
            }

            if let Some(cb) = &progress {
                cb(DatasetProgress {
                    index,
                    total,
                    effect_id: effect_id.clone(),
                });
            }

            match self.produce_item(orchestrator, job, effect_id) {
                Ok(item) => {
                    tracing::info!(
                        effect = %effect_id,
                        output = %item.output_path.display(),
                        written_at = %epoch_to_rfc3339(item.timestamp),
                        "Dataset item written"
                    );
                    report.items.push(item);
                }
                Err(err) => {
                    tracing::warn!(
                        effect = %effect_id,
                        kind = %err.kind(),
                        error = %err,
                        "Dataset item failed; continuing"
                    );
                    report.failures.push(DatasetFailure::from_error(effect_id, &err));
                }
            }
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Dataset generation finished"
        );

        Ok(report)
    }

    fn produce_item(
        &self,
        orchestrator: &mut EffectOrchestrator,
        job: &DatasetJob,
        effect_id: &str,
    ) -> DocwarpResult<DatasetItem> {
        let output = orchestrator.render_effect(effect_id, &job.source_image)?;

        let now = self.clock.now_epoch_secs();
        let (timestamp, output_path) = reserve_dataset_path(&job.dataset_dir, effect_id, now);
        move_file(&output.path, &output_path)?;

        Ok(DatasetItem {
            effect_id: effect_id.to_string(),
            timestamp,
            output_path,
            texture_attached: output.texture_attached,
        })
    }
}
