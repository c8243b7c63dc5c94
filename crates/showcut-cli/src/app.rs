// crates/showcut-cli/src/app.rs
//
// Front-end glue: resolve the source file, drive one run, print what the
// worker reports. Everything user-facing comes from showcut_core::text.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use crossbeam_channel::RecvTimeoutError;
use uuid::Uuid;

use showcut_core::config::AppConfig;
use showcut_core::scan::scan_sources;
use showcut_core::{text, RunEvent, RunOutcome};
use showcut_media::ShowcaseWorker;

/// How often the event loop wakes up to look at the interrupt flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// `wanted` by file name when set, otherwise the first scanned file.
pub fn pick_source(files: &[PathBuf], wanted: Option<&str>) -> Option<PathBuf> {
    match wanted {
        Some(name) => files
            .iter()
            .find(|p| p.file_name().is_some_and(|n| n == name))
            .cloned(),
        None => files.first().cloned(),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Scan `config.source_dir`, print the listing and return the file to
/// process. `None` after the matching error line has been printed.
pub fn resolve_source(config: &AppConfig) -> Option<PathBuf> {
    println!("{}", text::LOG_SCANNING);
    let files = match scan_sources(&config.source_dir) {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(dir = %config.source_dir.display(), error = %e, "scan failed");
            println!("  {}", text::TAG_INVALID_DIR);
            println!("{}", text::ERR_DIR_INVALID);
            return None;
        }
    };

    println!("{}", text::scan_done(files.len()));
    if files.is_empty() {
        println!("  {}", text::TAG_NO_FILE);
    }
    for f in &files {
        println!("  {}", display_name(f));
    }

    let picked = pick_source(&files, config.source_file.as_deref());
    if picked.is_none() {
        println!("{}", text::ERR_NO_FILE);
    }
    picked
}

/// Print every status line of `run_id` until it finishes. Each time the
/// interrupt flag is raised the run is cancelled.
pub fn drive(worker: &ShowcaseWorker, run_id: Uuid, interrupted: &AtomicBool) -> Result<RunOutcome> {
    loop {
        if interrupted.swap(false, Ordering::AcqRel) {
            tracing::info!(run = %run_id, "interrupt received, cancelling");
            worker.cancel();
        }
        match worker.rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) if event.run_id() != run_id => {}
            Ok(RunEvent::Status { message, .. })   => println!("{message}"),
            Ok(RunEvent::Finished { outcome, .. }) => return Ok(outcome),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => bail!("worker event channel closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<PathBuf> {
        vec![PathBuf::from("in/a.png"), PathBuf::from("in/b.mp4")]
    }

    #[test]
    fn first_file_when_nothing_configured() {
        assert_eq!(pick_source(&files(), None), Some(PathBuf::from("in/a.png")));
        assert_eq!(pick_source(&[], None), None);
    }

    #[test]
    fn configured_name_must_exist() {
        assert_eq!(pick_source(&files(), Some("b.mp4")), Some(PathBuf::from("in/b.mp4")));
        assert_eq!(pick_source(&files(), Some("c.mkv")), None);
    }

    #[test]
    fn resolve_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig { source_dir: dir.path().join("nope"), ..AppConfig::default() };
        assert_eq!(resolve_source(&config), None);
    }

    #[test]
    fn resolve_picks_from_scan() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("z.webp"), b"x").unwrap();
        std::fs::write(dir.path().join("clip.mov"), b"x").unwrap();
        let config = AppConfig { source_dir: dir.path().to_path_buf(), ..AppConfig::default() };
        assert_eq!(resolve_source(&config), Some(dir.path().join("clip.mov")));
    }
}
