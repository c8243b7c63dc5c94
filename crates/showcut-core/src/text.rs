// crates/showcut-core/src/text.rs
//
// Every user-facing string in one place. The worker composes status lines
// from these; the front-end prints them verbatim.

pub const LOG_READY:     &str = "Ready";
pub const LOG_SCANNING:  &str = "Scanning...";
pub const LOG_STARTING:  &str = "Starting task...";
/// Followed by the cumulative kept-frame count.
pub const LOG_ENCODING:  &str = "Encoding... frames processed: ";
/// Followed by the output directory.
pub const LOG_FINISHED:  &str = "Done! Output directory: ";
/// Followed by the kept-frame count.
pub const LOG_STOPPED:   &str = "Stopped early, frames written: ";
pub const LOG_HEX_PATCH: &str = "Applying trailer patch...";

pub const ERR_NO_FILE:      &str = "Error: no supported file selected";
pub const ERR_DIR_INVALID:  &str = "Error: directory does not exist";
pub const ERR_OPEN_FAILED:  &str = "Error: cannot open file";
pub const ERR_ENCODER_INIT: &str = "Error: cannot start GIF encoder";
pub const ERR_IO_FAILED:    &str = "Error: cannot write output";

pub const TAG_NO_FILE:      &str = "<no file>";
pub const TAG_INVALID_DIR:  &str = "<invalid directory>";

/// `"Scan complete, found N files"`.
pub fn scan_done(count: usize) -> String {
    format!("Scan complete, found {count} files")
}

pub fn encoding(kept: u64) -> String {
    format!("{LOG_ENCODING}{kept}")
}

pub fn finished(output_dir: &std::path::Path) -> String {
    format!("{LOG_FINISHED}{}", output_dir.display())
}

pub fn stopped(kept: u64) -> String {
    format!("{LOG_STOPPED}{kept}")
}

// ── Upload guide ──────────────────────────────────────────────────────────────

pub const GUIDE_STEP_1: &str = "Pick an image or video -> run showcut -> collect slice_1..5.gif";
pub const GUIDE_STEP_2: &str = "Open the artwork upload page: ";
pub const GUIDE_URL:    &str = "steamcommunity.com/sharedfiles/edititem/767/3/";
pub const GUIDE_STEP_3: &str = "Upload one slice -> press F12 to open the console -> paste the snippet -> press Enter";
pub const GUIDE_STEP_4: &str = "Back on the page click [Save and Continue]; repeat until every slice is uploaded";

/// Console snippet that unlocks the artwork upload form.
pub const GUIDE_SNIPPET: &str =
    "$J('#ConsumerAppID').val(480),$J('[name=file_type]').val(0),$J('[name=visibility]').val(0);";

/// The four guide steps, numbered, one per line.
pub fn guide() -> String {
    format!(
        "1. {GUIDE_STEP_1}\n2. {GUIDE_STEP_2}https://{GUIDE_URL}\n3. {GUIDE_STEP_3}\n   {GUIDE_SNIPPET}\n4. {GUIDE_STEP_4}"
    )
}
