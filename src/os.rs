//! Shared OS utilities: home directory resolution and application presence
//! probes that don't go through a package manager.

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::BaseDirs;

use crate::errors::Result;

/// Resolve the current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    let dirs = BaseDirs::new().context("Failed to get base directories")?;
    Ok(dirs.home_dir().to_path_buf())
}

/// The standard macOS application bundle locations.
pub fn macos_app_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("/Applications")];
    if let Ok(home) = home_dir() {
        dirs.push(home.join("Applications"));
    }
    dirs
}

/// True if `bundle` ("Chromium.app") exists in any of `dirs`.
///
/// On macOS the bundle's existence is a stronger installed signal than any
/// package-manager query: apps installed by hand never show up in brew.
pub fn macos_app_installed_in(dirs: &[PathBuf], bundle: &str) -> bool {
    dirs.iter().any(|dir| dir.join(bundle).is_dir())
}

/// True if `bundle` exists in the standard application directories.
pub fn macos_app_installed(bundle: &str) -> bool {
    macos_app_installed_in(&macos_app_dirs(), bundle)
}

/// Format a byte count for human consumption.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// The size of a directory tree in bytes. Errors on individual entries are
/// skipped: a cleanup estimate doesn't need to be exact.
pub fn dir_size(path: &Path) -> u64 {
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_macos_app_installed_in() {
        let tmp = TempDir::new().unwrap();
        let apps = tmp.path().to_path_buf();
        fs::create_dir(apps.join("Chromium.app")).unwrap();

        assert!(macos_app_installed_in(&[apps.clone()], "Chromium.app"));
        assert!(!macos_app_installed_in(&[apps.clone()], "Firefox.app"));
        // A plain file is not a bundle.
        fs::write(apps.join("NotABundle.app"), "x").unwrap();
        assert!(!macos_app_installed_in(&[apps], "NotABundle.app"));
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(2048), "2.0 KiB");
        assert_eq!(human_bytes(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn test_dir_size_sums_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), vec![0u8; 100]).unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/b"), vec![0u8; 50]).unwrap();
        assert_eq!(dir_size(tmp.path()), 150);
    }
}
