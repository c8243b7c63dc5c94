// crates/showcut-media/src/pipeline.rs
//
// The slice-and-encode run: one source in, up to five GIFs out.
//
// Design:
//   • `RunContext`  : run id, event sender, cancel flag and phase cell. Owned
//     by the worker thread; the pipeline only borrows it.
//   • `run_showcase()`: blocking; walks Initializing → Running → Draining and
//     returns the outcome. The caller publishes `Finished` and the final phase.
//
// Phases:
//   Initializing: open the source, size the strip, create the output
//     directory, open one `SliceEncoder` per valid slice in index order. If an
//     encoder fails to open, the ones already open are finished (trailer
//     written, files kept) and the run fails without pulling a frame.
//   Running: the cancel flag is read before every pull, so nothing past the
//     cancel point is decoded or counted. Kept frames are resized once to the
//     strip, cropped per slice and pushed in slice order.
//   Draining: every encoder is finished in index order, on every exit path.
//
// Still images skip the encoder sessions entirely: one resize, one static
// GIF per slice.
//
// The trailer patch runs only when the run was not cancelled and at least
// one frame was kept. Anything else ends as `Partial` with valid, unpatched
// GIFs on disk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use uuid::Uuid;

use showcut_core::geometry::{target_height, SliceGeometry, STRIP_WIDTH};
use showcut_core::patch::apply_hex_patch;
use showcut_core::text;
use showcut_core::{PhaseCell, RunError, RunEvent, RunOutcome, RunPhase, RunStatus, TaskParameters};

use crate::resize::Resizer;
use crate::slice_encoder::SliceEncoder;
use crate::source::{FrameSource, SourceKind};
use crate::still::write_still_gif;

/// Send an `Encoding…` status every N kept frames.
pub const STATUS_INTERVAL: u64 = 10;

pub struct RunContext {
    pub run_id: Uuid,
    pub tx:     Sender<RunEvent>,
    pub cancel: Arc<AtomicBool>,
    pub phase:  PhaseCell,
}

impl RunContext {
    fn status(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(run = %self.run_id, "{message}");
        // The receiver may be gone (front-end shut down); the run still tears
        // down normally.
        let _ = self.tx.send(RunEvent::Status { run_id: self.run_id, message });
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn outcome(&self, status: RunStatus, outputs: Vec<PathBuf>, kept_frames: u64, last_message: String) -> RunOutcome {
        RunOutcome { run_id: self.run_id, status, outputs, kept_frames, last_message }
    }

    fn fail(&self, err: RunError, outputs: Vec<PathBuf>) -> RunOutcome {
        tracing::warn!(run = %self.run_id, error = %err, "run failed");
        let line = err.status_line();
        self.status(line.clone());
        self.outcome(RunStatus::Failed, outputs, 0, line)
    }

    fn stop(&self, outputs: Vec<PathBuf>, kept: u64) -> RunOutcome {
        let line = text::stopped(kept);
        self.status(line.clone());
        self.outcome(RunStatus::Partial, outputs, kept, line)
    }

    fn succeed(&self, params: &TaskParameters, outputs: Vec<PathBuf>, kept: u64) -> RunOutcome {
        self.status(text::LOG_HEX_PATCH);
        let patched = outputs.iter().filter(|p| apply_hex_patch(p)).count();
        tracing::debug!(run = %self.run_id, patched, total = outputs.len(), "trailer patch done");

        let line = text::finished(&params.output_dir);
        self.status(line.clone());
        self.outcome(RunStatus::Success, outputs, kept, line)
    }
}

/// Run one task to completion on the calling thread.
///
/// `opener` turns the parameters into a frame source; production code passes
/// `source::open_source`, tests pass synthetic sources.
pub fn run_showcase<F>(params: &TaskParameters, ctx: &RunContext, opener: F) -> RunOutcome
where
    F: FnOnce(&TaskParameters) -> Result<Box<dyn FrameSource>, RunError>,
{
    ctx.phase.set(RunPhase::Initializing);
    ctx.status(text::LOG_STARTING);
    tracing::info!(
        run     = %ctx.run_id,
        source  = %params.source.display(),
        output  = %params.output_dir.display(),
        rate    = params.sampling_rate(),
        quality = params.quality().label(),
        "run started"
    );

    let source = match opener(params) {
        Ok(s)  => s,
        Err(e) => return ctx.fail(e, Vec::new()),
    };

    let (src_w, src_h) = source.native_size();
    let Some(strip_h) = target_height(src_w, src_h) else {
        return ctx.fail(RunError::open(format!("unusable source size {src_w}x{src_h}")), Vec::new());
    };

    if let Err(e) = std::fs::create_dir_all(&params.output_dir) {
        return ctx.fail(
            RunError::io(format!("{}: {e}", params.output_dir.display())),
            Vec::new(),
        );
    }

    let resizer = Resizer::new(STRIP_WIDTH, strip_h, params.quality());
    match source.kind() {
        SourceKind::Image      => run_image(params, ctx, source, resizer),
        SourceKind::Video { fps } => run_video(params, ctx, source, resizer, fps),
    }
}

// ── Still image ───────────────────────────────────────────────────────────────

fn run_image(
    params:      &TaskParameters,
    ctx:         &RunContext,
    mut source:  Box<dyn FrameSource>,
    mut resizer: Resizer,
) -> RunOutcome {
    ctx.phase.set(RunPhase::Running);
    let geometry = SliceGeometry::showcase();

    if ctx.cancelled() {
        ctx.phase.set(RunPhase::Draining);
        return ctx.stop(Vec::new(), 0);
    }
    let Some(frame) = source.next_frame() else {
        ctx.phase.set(RunPhase::Draining);
        return ctx.stop(Vec::new(), 0);
    };
    let strip = match resizer.resize(&frame) {
        Ok(s)  => s,
        Err(e) => {
            tracing::warn!(run = %ctx.run_id, error = format!("{e:#}"), "resize failed");
            ctx.phase.set(RunPhase::Draining);
            return ctx.stop(Vec::new(), 0);
        }
    };

    let mut outputs = Vec::new();
    for (index, x) in geometry.valid_slices(strip.width) {
        let Some(slice) = strip.crop(x, geometry.slice_width) else { break };
        let path = params.slice_path(index);
        if let Err(e) = write_still_gif(&path, &slice, params.quality()) {
            ctx.phase.set(RunPhase::Draining);
            return ctx.fail(e, outputs);
        }
        outputs.push(path);
    }

    ctx.phase.set(RunPhase::Draining);
    ctx.succeed(params, outputs, 1)
}

// ── Video ─────────────────────────────────────────────────────────────────────

fn run_video(
    params:      &TaskParameters,
    ctx:         &RunContext,
    mut source:  Box<dyn FrameSource>,
    mut resizer: Resizer,
    fps:         f64,
) -> RunOutcome {
    let geometry = SliceGeometry::showcase();
    let cadence  = params.cadence();
    let out_fps  = cadence.target_fps(fps);
    let (strip_w, strip_h) = resizer.output_size();
    let slices   = geometry.valid_slices(strip_w);

    tracing::debug!(run = %ctx.run_id, fps, out_fps, divisor = cadence.divisor(),
        strip_w, strip_h, slices = slices.len(), "video geometry");

    // ── Open encoders in slice order ─────────────────────────────────────────
    let mut encoders: Vec<SliceEncoder> = Vec::with_capacity(slices.len());
    for &(index, _) in &slices {
        let path = params.slice_path(index);
        match SliceEncoder::open(index, &path, geometry.slice_width, strip_h, out_fps, params.quality()) {
            Ok(enc) => encoders.push(enc),
            Err(e)  => {
                ctx.phase.set(RunPhase::Draining);
                let outputs = finish_all(&mut encoders);
                return ctx.fail(e, outputs);
            }
        }
    }

    // ── Pull / sample / slice / push ─────────────────────────────────────────
    ctx.phase.set(RunPhase::Running);
    let mut frame_idx: u64 = 0;
    let mut kept:      u64 = 0;
    let mut cancelled      = false;

    loop {
        if ctx.cancelled() {
            cancelled = true;
            break;
        }
        let Some(frame) = source.next_frame() else { break };

        let idx = frame_idx;
        frame_idx += 1;
        if !cadence.keeps(idx) {
            continue;
        }

        let strip = match resizer.resize(&frame) {
            Ok(s)  => s,
            Err(e) => {
                tracing::warn!(run = %ctx.run_id, frame = idx, error = format!("{e:#}"),
                    "resize failed, ending stream");
                break;
            }
        };

        for (enc, &(_, x)) in encoders.iter_mut().zip(&slices) {
            if let Some(slice) = strip.crop(x, geometry.slice_width) {
                enc.push(&slice);
            }
        }

        kept += 1;
        if kept % STATUS_INTERVAL == 0 {
            ctx.status(text::encoding(kept));
        }
    }

    tracing::info!(run = %ctx.run_id, decoded = frame_idx, kept, cancelled, "frame loop ended");

    // ── Drain ────────────────────────────────────────────────────────────────
    ctx.phase.set(RunPhase::Draining);
    let outputs = finish_all(&mut encoders);

    if !cancelled && kept > 0 {
        ctx.succeed(params, outputs, kept)
    } else {
        ctx.stop(outputs, kept)
    }
}

/// Finish every encoder in slice order and return their output paths.
fn finish_all(encoders: &mut [SliceEncoder]) -> Vec<PathBuf> {
    encoders
        .iter_mut()
        .map(|enc| {
            enc.finish();
            enc.path().to_path_buf()
        })
        .collect()
}
