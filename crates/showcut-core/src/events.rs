// crates/showcut-core/src/events.rs
//
// Types that flow from the background worker to the front-end.
// No ffmpeg, no threads: plain data plus the atomic phase cell.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

/// Sent from the worker thread over the event channel. Every run produces
/// zero or more `Status` events followed by exactly one `Finished`.
#[derive(Debug, Clone)]
pub enum RunEvent {
    Status   { run_id: Uuid, message: String },
    Finished { run_id: Uuid, outcome: RunOutcome },
}

impl RunEvent {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::Status { run_id, .. } | Self::Finished { run_id, .. } => *run_id,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Every kept frame encoded and every output patched.
    Success,
    /// Cancelled, or the source produced no kept frame. Outputs are valid
    /// GIFs but were not patched.
    Partial,
    /// A run-terminal error; see `last_message`.
    Failed,
}

/// Summary of one finished run.
#[derive(Clone, Debug, Serialize)]
pub struct RunOutcome {
    pub run_id:       Uuid,
    pub status:       RunStatus,
    /// Files that exist on disk after the run, in slice order.
    pub outputs:      Vec<PathBuf>,
    pub kept_frames:  u64,
    pub last_message: String,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

/// Orchestrator lifecycle, readable from any thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RunPhase {
    Idle         = 0,
    Initializing = 1,
    Running      = 2,
    Draining     = 3,
    Finished     = 4,
}

impl RunPhase {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Initializing,
            2 => Self::Running,
            3 => Self::Draining,
            4 => Self::Finished,
            _ => Self::Idle,
        }
    }

    /// True from `Initializing` through `Draining`.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Initializing | Self::Running | Self::Draining)
    }
}

/// Shared, eventually-consistent view of the current phase. Written by the
/// run thread while a run is live, and by `ShowcaseWorker::start_with` on the
/// caller's thread (`Initializing` before the spawn, `Finished` if the spawn
/// fails). A store is a plain overwrite; the last writer wins.
#[derive(Clone, Debug, Default)]
pub struct PhaseCell(Arc<AtomicU8>);

impl PhaseCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> RunPhase {
        RunPhase::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, phase: RunPhase) {
        self.0.store(phase as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_cell_round_trips() {
        let cell = PhaseCell::new();
        assert_eq!(cell.get(), RunPhase::Idle);
        for p in [RunPhase::Initializing, RunPhase::Running, RunPhase::Draining, RunPhase::Finished] {
            cell.clone().set(p);
            assert_eq!(cell.get(), p);
        }
    }

    #[test]
    fn every_event_carries_its_run_id() {
        let id = Uuid::new_v4();
        let status = RunEvent::Status { run_id: id, message: "x".into() };
        let finished = RunEvent::Finished {
            run_id:  id,
            outcome: RunOutcome {
                run_id:       id,
                status:       RunStatus::Partial,
                outputs:      Vec::new(),
                kept_frames:  0,
                last_message: String::new(),
            },
        };
        assert_eq!(status.run_id(), id);
        assert_eq!(finished.run_id(), id);
    }

    #[test]
    fn only_active_phases_are_busy() {
        assert!(!RunPhase::Idle.is_busy());
        assert!(RunPhase::Running.is_busy());
        assert!(RunPhase::Draining.is_busy());
        assert!(!RunPhase::Finished.is_busy());
    }
}
