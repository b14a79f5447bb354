//! Background dataset jobs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use docwarp_common::error::{DocwarpError, DocwarpResult};

use crate::batch::{DatasetJob, DatasetPipeline, DatasetProgress, DatasetReport};
use crate::orchestrator::EffectOrchestrator;

type WorkerResult = (DocwarpResult<DatasetReport>, EffectOrchestrator);

/// A batch running on its own thread.
///
/// The orchestrator moves into the worker for the duration of the run and is
/// handed back by [`join`](Self::join), so nothing else can render meanwhile.
pub struct DatasetJobHandle {
    progress: Receiver<DatasetProgress>,
    cancel: Arc<AtomicBool>,
    worker: JoinHandle<WorkerResult>,
}

/// Start `job` on a worker thread.
pub fn spawn_dataset_job(
    mut orchestrator: EffectOrchestrator,
    pipeline: DatasetPipeline,
    job: DatasetJob,
) -> DatasetJobHandle {
    let (tx, rx) = mpsc::channel::<DatasetProgress>();
    let cancel = job.cancel_flag();

    let worker = std::thread::spawn(move || {
        let progress_cb: Box<dyn Fn(DatasetProgress) + Send> = Box::new(move |p| {
            let _ = tx.send(p);
        });
        let result = pipeline.generate_dataset(&mut orchestrator, &job, Some(progress_cb));
        (result, orchestrator)
    });

    DatasetJobHandle {
        progress: rx,
        cancel,
        worker,
    }
}

impl DatasetJobHandle {
    /// Ask the worker to stop before its next effect.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Progress events in batch order. The channel closes when the worker
    /// finishes.
    pub fn progress(&self) -> &Receiver<DatasetProgress> {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the worker and take back the orchestrator.
    pub fn join(self) -> DocwarpResult<(DatasetReport, EffectOrchestrator)> {
        let (result, orchestrator) = self
            .worker
            .join()
            .map_err(|_| DocwarpError::Other(anyhow::anyhow!("Dataset worker panicked")))?;
        Ok((result?, orchestrator))
    }
}

impl std::fmt::Debug for DatasetJobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetJobHandle")
            .field("cancelled", &self.cancel.load(Ordering::SeqCst))
            .field("finished", &self.worker.is_finished())
            .finish()
    }
}
