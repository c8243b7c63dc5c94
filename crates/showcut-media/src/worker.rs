// crates/showcut-media/src/worker.rs
//
// ShowcaseWorker: owns the single active run and the event channel.
// All public API the front-end calls lives here.
//
// One run at a time. `start` supersedes: the previous run is cancelled and
// joined (its encoders finished, its Finished event sent) before the new
// thread is spawned. `cancel` blocks until Draining has completed, so files
// are closed when it returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use uuid::Uuid;

use showcut_core::{PhaseCell, RunError, RunEvent, RunOutcome, RunPhase, RunStatus, TaskParameters};

use crate::pipeline::{run_showcase, RunContext};
use crate::source::{open_source, FrameSource};

struct ActiveRun {
    id:     Uuid,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

pub struct ShowcaseWorker {
    /// Status and Finished events for every run, in order.
    pub rx: Receiver<RunEvent>,
    tx:     Sender<RunEvent>,
    active: Mutex<Option<ActiveRun>>,
    phase:  PhaseCell,
}

impl Default for ShowcaseWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowcaseWorker {
    pub fn new() -> Self {
        // Unbounded: the run thread must never block on a slow consumer.
        let (tx, rx) = unbounded();
        Self { rx, tx, active: Mutex::new(None), phase: PhaseCell::new() }
    }

    /// Start a run over `params.source`, opened by extension.
    pub fn start(&self, params: TaskParameters) -> Uuid {
        self.start_with(params, |p: &TaskParameters| open_source(&p.source))
    }

    /// Start a run with a caller-supplied source. The opener runs on the
    /// worker thread, so the source itself need not be `Send`.
    pub fn start_with<F>(&self, params: TaskParameters, opener: F) -> Uuid
    where
        F: FnOnce(&TaskParameters) -> Result<Box<dyn FrameSource>, RunError> + Send + 'static,
    {
        let mut active = self.active.lock();
        if let Some(prev) = active.take() {
            tracing::info!(run = %prev.id, "superseded by new run");
            stop_run(prev);
        }

        let run_id = Uuid::new_v4();
        let cancel = Arc::new(AtomicBool::new(false));
        let ctx = RunContext {
            run_id,
            tx:     self.tx.clone(),
            cancel: Arc::clone(&cancel),
            phase:  self.phase.clone(),
        };

        // Visible as busy before the thread gets scheduled.
        self.phase.set(RunPhase::Initializing);

        let handle = thread::Builder::new()
            .name(format!("showcut-run-{}", &run_id.simple().to_string()[..8]))
            .spawn(move || {
                let outcome = run_showcase(&params, &ctx, opener);
                tracing::info!(run = %run_id, status = ?outcome.status, kept = outcome.kept_frames, "run finished");
                ctx.phase.set(RunPhase::Finished);
                let _ = ctx.tx.send(RunEvent::Finished { run_id, outcome });
            });

        match handle {
            Ok(handle) => {
                *active = Some(ActiveRun { id: run_id, cancel, handle });
            }
            Err(e) => {
                // No thread, no pipeline: report the run as failed right away.
                tracing::warn!(run = %run_id, error = %e, "could not spawn run thread");
                let err = RunError::io(format!("spawn worker thread: {e}"));
                let line = err.status_line();
                self.phase.set(RunPhase::Finished);
                let _ = self.tx.send(RunEvent::Status { run_id, message: line.clone() });
                let _ = self.tx.send(RunEvent::Finished {
                    run_id,
                    outcome: RunOutcome {
                        run_id,
                        status:       RunStatus::Failed,
                        outputs:      Vec::new(),
                        kept_frames:  0,
                        last_message: line,
                    },
                });
            }
        }
        run_id
    }

    /// Request cancellation of the active run and wait for it to drain.
    /// No-op when idle.
    pub fn cancel(&self) {
        let prev = self.active.lock().take();
        if let Some(prev) = prev {
            tracing::info!(run = %prev.id, "cancel requested");
            stop_run(prev);
        }
    }

    /// Id of the run started last, while its thread is still owned here.
    pub fn active_run(&self) -> Option<Uuid> {
        self.active.lock().as_ref().map(|r| r.id)
    }

    pub fn phase(&self) -> RunPhase {
        self.phase.get()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.get().is_busy()
    }
}

impl Drop for ShowcaseWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn stop_run(run: ActiveRun) {
    run.cancel.store(true, Ordering::Release);
    if run.handle.join().is_err() {
        tracing::warn!(run = %run.id, "run thread panicked");
    }
}
