// crates/showcut-core/src/patch.rs
//
// The "hex hack": rewrite the GIF trailer byte 0x3B to 0x21.
//
// The showcase upload pipeline re-compresses any GIF whose stream ends with a
// proper trailer. Replacing the final byte with an extension introducer
// leaves every decoder able to show the frames while skipping that step.
//
// Only the last byte is read and, when it matches, overwritten in place.
// The rest of the file is never read, rewritten or truncated.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// GIF trailer byte written by every conforming encoder.
pub const GIF_TRAILER: u8 = 0x3B;
/// Replacement byte.
pub const PATCHED_TRAILER: u8 = 0x21;

/// Patch `path` in place. Returns `true` only if the final byte was
/// `0x3B` and has been rewritten to `0x21`.
///
/// A second call on the same file sees `0x21` and returns `false`, so the
/// operation is idempotent. Open/read/write failures are logged and reported
/// as `false`; the GIF is still valid without the patch.
pub fn apply_hex_patch(path: &Path) -> bool {
    match try_patch(path) {
        Ok(patched) => {
            if patched {
                tracing::debug!(path = %path.display(), "trailer patched 3B -> 21");
            } else {
                tracing::debug!(path = %path.display(), "trailer patch skipped: last byte is not 3B");
            }
            patched
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "trailer patch failed");
            false
        }
    }
}

fn try_patch(path: &Path) -> std::io::Result<bool> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != GIF_TRAILER {
        return Ok(false);
    }

    file.seek(SeekFrom::End(-1))?;
    file.write_all(&[PATCHED_TRAILER])?;
    file.flush()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tmp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let p = dir.path().join(name);
        std::fs::write(&p, bytes).unwrap();
        p
    }

    #[test]
    fn rewrites_only_the_final_byte() {
        let dir = tempfile::tempdir().unwrap();
        let original = b"GIF89a\x3B\x00\x3B\x3B".to_vec();
        let p = write_tmp(&dir, "a.gif", &original);

        assert!(apply_hex_patch(&p));

        let after = std::fs::read(&p).unwrap();
        assert_eq!(after.len(), original.len());
        assert_eq!(&after[..original.len() - 1], &original[..original.len() - 1]);
        assert_eq!(*after.last().unwrap(), PATCHED_TRAILER);
    }

    #[test]
    fn second_patch_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_tmp(&dir, "a.gif", b"GIF89a\x01\x3B");

        assert!(apply_hex_patch(&p));
        let once = std::fs::read(&p).unwrap();
        assert!(!apply_hex_patch(&p));
        assert_eq!(std::fs::read(&p).unwrap(), once);
    }

    #[test]
    fn other_trailing_bytes_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_tmp(&dir, "a.gif", b"GIF89a\x3B\x00");
        assert!(!apply_hex_patch(&p));
        assert_eq!(std::fs::read(&p).unwrap(), b"GIF89a\x3B\x00");
    }

    #[test]
    fn empty_and_missing_files_report_false() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_tmp(&dir, "empty.gif", b"");
        assert!(!apply_hex_patch(&empty));
        assert!(std::fs::read(&empty).unwrap().is_empty());
        assert!(!apply_hex_patch(&dir.path().join("missing.gif")));
    }
}
