// crates/showcut-media/src/helpers/mod.rs
//
// Internal helper modules for showcut-media.
// Not re-exported from lib.rs: these are ffmpeg frame plumbing details,
// not part of the public API consumed by showcut-cli.

pub mod rgb;
