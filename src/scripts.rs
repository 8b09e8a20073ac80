//! Cross-platform replacements for a pile of old shell aliases.
//!
//! These are deliberately thin: where a native tool does the job (grep,
//! rsync, robocopy, ps, taskkill) the script shells out to it rather than
//! reimplementing it.

pub mod backup;
pub mod cleanup;
pub mod history;
pub mod procs;
