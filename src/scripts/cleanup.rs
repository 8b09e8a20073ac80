//! Recursive dependency-directory cleanup.
//!
//! Replaces the `nuke-node-modules` alias: walk a tree, find every
//! directory with the target name, show what would be reclaimed, and
//! delete after confirmation. Matches are not descended into, so a
//! node_modules nested inside another node_modules is counted once.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::Result;
use crate::os::{dir_size, human_bytes};

/// A directory slated for removal and its size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTarget {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Find all directories named `name` under `root`, skipping nested matches.
pub fn find_targets(root: &Path, name: &str) -> Vec<CleanupTarget> {
    let mut targets = Vec::new();
    let mut it = WalkDir::new(root).into_iter();

    loop {
        let entry = match it.next() {
            None => break,
            Some(Err(e)) => {
                debug!("skipping unreadable entry: {}", e);
                continue;
            }
            Some(Ok(entry)) => entry,
        };
        if entry.file_type().is_dir() && entry.file_name() == name {
            targets.push(CleanupTarget {
                bytes: dir_size(entry.path()),
                path: entry.path().to_path_buf(),
            });
            it.skip_current_dir();
        }
    }
    targets
}

pub fn run(root: &Path, name: &str, assume_yes: bool) -> Result<()> {
    if !root.is_dir() {
        return Err(crate::errors::DevstrapError::Config(anyhow::anyhow!(
            "{} is not a directory",
            root.display()
        )));
    }

    println!("Scanning {} for {} directories...", root.display(), name);
    let targets = find_targets(root, name);
    if targets.is_empty() {
        println!("No {} directories found under {}.", name, root.display());
        return Ok(());
    }

    let total: u64 = targets.iter().map(|t| t.bytes).sum();
    for target in &targets {
        println!("  {} ({})", target.path.display(), human_bytes(target.bytes));
    }
    println!(
        "{} directories, {} total.",
        targets.len(),
        human_bytes(total)
    );

    if !assume_yes {
        let agreed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete all {} of them?", targets.len()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !agreed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut removed = 0usize;
    let mut freed = 0u64;
    for target in &targets {
        match fs::remove_dir_all(&target.path) {
            Ok(()) => {
                removed += 1;
                freed += target.bytes;
            }
            Err(e) => warn!("failed to remove {}: {}", target.path.display(), e),
        }
    }
    println!(
        "{}",
        format!("Removed {} directories, reclaimed {}.", removed, human_bytes(freed)).green()
    );
    Ok(())
}
