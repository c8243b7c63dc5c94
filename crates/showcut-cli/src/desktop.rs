// crates/showcut-cli/src/desktop.rs
//
// Post-run conveniences: copy the console snippet to the clipboard and open
// the output folder. Each is gated by its `AppConfig` switch. A failure is
// logged at warn and never changes the run's exit status.

use std::path::Path;

use anyhow::{Context as _, Result};

use showcut_core::config::AppConfig;
use showcut_core::text;

/// The two desktop actions, split out so tests can record calls instead of
/// touching the real clipboard or file browser.
pub trait Desktop {
    fn copy_text(&mut self, text: &str) -> Result<()>;
    fn open_dir(&mut self, dir: &Path) -> Result<()>;
}

/// System clipboard via arboard, file browser via opener.
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("open clipboard")?;
        clipboard.set_text(text).context("set clipboard text")?;
        Ok(())
    }

    fn open_dir(&mut self, dir: &Path) -> Result<()> {
        opener::open(dir).with_context(|| format!("open '{}'", dir.display()))
    }
}

/// Run the enabled actions after a successful run.
pub fn after_success(config: &AppConfig, desktop: &mut impl Desktop) {
    if config.copy_snippet {
        match desktop.copy_text(text::GUIDE_SNIPPET) {
            Ok(()) => tracing::info!("console snippet copied to clipboard"),
            Err(e) => tracing::warn!(error = format!("{e:#}"), "clipboard copy failed"),
        }
    }
    if config.open_output_dir {
        if let Err(e) = desktop.open_dir(&config.output_dir) {
            tracing::warn!(dir = %config.output_dir.display(), error = format!("{e:#}"),
                "could not open output folder");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        copied: Vec<String>,
        opened: Vec<PathBuf>,
        fail:   bool,
    }

    impl Desktop for Recorder {
        fn copy_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                bail!("no clipboard");
            }
            self.copied.push(text.to_string());
            Ok(())
        }

        fn open_dir(&mut self, dir: &Path) -> Result<()> {
            if self.fail {
                bail!("no file browser");
            }
            self.opened.push(dir.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn defaults_copy_snippet_and_open_output() {
        let config = AppConfig::default();
        let mut rec = Recorder::default();
        after_success(&config, &mut rec);
        assert_eq!(rec.copied, vec![text::GUIDE_SNIPPET.to_string()]);
        assert_eq!(rec.opened, vec![config.output_dir.clone()]);
    }

    #[test]
    fn switches_off_means_no_calls() {
        let config = AppConfig { copy_snippet: false, open_output_dir: false, ..AppConfig::default() };
        let mut rec = Recorder::default();
        after_success(&config, &mut rec);
        assert!(rec.copied.is_empty());
        assert!(rec.opened.is_empty());
    }

    #[test]
    fn each_switch_is_independent() {
        let config = AppConfig { copy_snippet: false, ..AppConfig::default() };
        let mut rec = Recorder::default();
        after_success(&config, &mut rec);
        assert!(rec.copied.is_empty());
        assert_eq!(rec.opened.len(), 1);
    }

    #[test]
    fn failures_do_not_panic() {
        let mut rec = Recorder { fail: true, ..Recorder::default() };
        after_success(&AppConfig::default(), &mut rec);
        assert!(rec.copied.is_empty());
        assert!(rec.opened.is_empty());
    }
}
