// crates/showcut-cli/src/main.rs
//
// `showcut` binary: load showcut.json, set up logging and ffmpeg, run one
// showcase over the configured source and exit non-zero on failure.

mod app;
mod desktop;

use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use showcut_core::config::{AppConfig, CONFIG_FILE};
use showcut_core::logging::init_logging;
use showcut_core::{text, RunStatus};
use showcut_media::ShowcaseWorker;

fn main() -> ExitCode {
    match run() {
        Ok(status) if status != RunStatus::Failed => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("showcut: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<RunStatus> {
    let config = AppConfig::load(Path::new(CONFIG_FILE))?;
    let _log_guard = init_logging(&config.logging);
    showcut_media::init().context("FFmpeg init failed")?;

    for dir in [&config.source_dir, &config.output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create directory '{}'", dir.display()))?;
    }
    println!("{}", text::LOG_READY);

    let Some(source) = app::resolve_source(&config) else {
        return Ok(RunStatus::Failed);
    };
    let params = config.task_for(source)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::Release))
            .context("install Ctrl-C handler")?;
    }

    let worker = ShowcaseWorker::new();
    let run_id = worker.start(params);
    let outcome = app::drive(&worker, run_id, &interrupted)?;

    if outcome.is_success() {
        println!();
        println!("{}", text::guide());
        desktop::after_success(&config, &mut desktop::SystemDesktop);
    }
    Ok(outcome.status)
}
