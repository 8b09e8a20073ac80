//! Config-driven backup of selected directories.
//!
//! Each configured source is mirrored into a timestamped subdirectory of
//! the destination, using rsync on Unix and robocopy on Windows.

use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;
use tracing::{info, warn};

use crate::configuration::DevstrapConfig;
use crate::errors::{DevstrapError, Result};
use crate::exec::{quote, ShellRunner};
use crate::platform::Platform;

/// Timestamp format for backup run directories, e.g. `2026-08-30_142501`.
const RUN_STAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// The directory a backup run writes into: `<destination>/<timestamp>`.
pub fn run_dir(destination: &Path, stamp: &str) -> PathBuf {
    destination.join(stamp)
}

/// Build the mirror command for one source directory.
///
/// robocopy's /MIR matches rsync's --delete: files removed from the source
/// disappear from the mirror too. The rsync source carries a trailing slash
/// so its contents land in DEST itself rather than a DEST/<name> copy of
/// the directory, matching what robocopy does.
pub fn mirror_command(platform: &Platform, source: &Path, dest: &Path) -> String {
    if platform.is_windows() {
        format!("robocopy '{}' '{}' /MIR", source.display(), dest.display())
    } else {
        format!(
            "rsync -a --delete {} {}",
            quote(&format!("{}/", source.display())),
            quote(&dest.display().to_string())
        )
    }
}

/// robocopy uses exit codes 0-7 for success variants; 8+ means failure.
pub fn mirror_succeeded(platform: &Platform, code: i32) -> bool {
    if platform.is_windows() {
        code < 8
    } else {
        code == 0
    }
}

pub async fn run(
    runner: &dyn ShellRunner,
    platform: &Platform,
    config: &DevstrapConfig,
) -> Result<()> {
    let destination = config.backup.destination.as_ref().ok_or_else(|| {
        DevstrapError::Config(anyhow::anyhow!(
            "no backup destination configured; set backup.destination in the config"
        ))
    })?;
    if config.backup.sources.is_empty() {
        return Err(DevstrapError::Config(anyhow::anyhow!(
            "no backup sources configured; set backup.sources in the config"
        )));
    }

    let stamp = Local::now().format(RUN_STAMP_FORMAT).to_string();
    let target = run_dir(destination, &stamp);
    std::fs::create_dir_all(&target)?;
    info!("Backing up into {}", target.display());

    let mut failures = 0usize;
    for source in &config.backup.sources {
        if !source.exists() {
            warn!("skipping missing backup source {}", source.display());
            failures += 1;
            continue;
        }
        let dest = target.join(source.file_name().unwrap_or(source.as_os_str()));
        let cmd = mirror_command(platform, source, &dest);
        println!("Backing up {}...", source.display());
        let out = runner.run_long(&cmd).await?;
        if mirror_succeeded(platform, out.code) {
            info!("backed up {}", source.display());
        } else {
            warn!("backup of {} failed: {}", source.display(), out.stderr.trim());
            failures += 1;
        }
    }

    if failures == 0 {
        println!(
            "{}",
            format!(
                "Backed up {} sources to {}.",
                config.backup.sources.len(),
                target.display()
            )
            .green()
        );
        Ok(())
    } else {
        Err(DevstrapError::Config(anyhow::anyhow!(
            "{} of {} backup sources failed",
            failures,
            config.backup.sources.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::BackupConfig;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::str::contains;
    use tempfile::TempDir;

    #[test]
    fn test_mirror_command_unix_uses_rsync_delete() {
        let cmd = mirror_command(
            &Platform::Ubuntu,
            Path::new("/home/me/Documents"),
            Path::new("/backups/run/Documents"),
        );
        assert_eq!(cmd, "rsync -a --delete /home/me/Documents/ /backups/run/Documents");
    }

    #[test]
    fn test_rsync_source_trailing_slash_prevents_double_nesting() {
        // Without the slash rsync would create DEST/notes/notes; the slash
        // makes it mirror the contents into DEST, like robocopy /MIR does.
        let dest = run_dir(Path::new("/backups"), "2026-08-30_120000").join("notes");
        let cmd = mirror_command(&Platform::Ubuntu, Path::new("/home/me/notes"), &dest);
        assert_eq!(
            cmd,
            "rsync -a --delete /home/me/notes/ /backups/2026-08-30_120000/notes"
        );
    }

    #[test]
    fn test_mirror_command_windows_uses_robocopy_mir() {
        let cmd = mirror_command(
            &Platform::Windows,
            Path::new("C:\\Users\\me\\Documents"),
            Path::new("D:\\backups\\run\\Documents"),
        );
        assert!(cmd.starts_with("robocopy "));
        assert!(cmd.ends_with("/MIR"));
    }

    #[test]
    fn test_robocopy_exit_codes_below_eight_succeed() {
        // 1 = files copied, 3 = copied + extras removed
        assert!(mirror_succeeded(&Platform::Windows, 0));
        assert!(mirror_succeeded(&Platform::Windows, 1));
        assert!(mirror_succeeded(&Platform::Windows, 3));
        assert!(!mirror_succeeded(&Platform::Windows, 8));
        assert!(mirror_succeeded(&Platform::Ubuntu, 0));
        assert!(!mirror_succeeded(&Platform::Ubuntu, 1));
    }

    #[tokio::test]
    async fn test_run_mirrors_each_source() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("notes");
        std::fs::create_dir(&src).unwrap();
        let dest = tmp.path().join("backups");

        let mut config = DevstrapConfig::default();
        config.backup = BackupConfig {
            sources: vec![src.clone()],
            destination: Some(dest.clone()),
        };

        let mut runner = MockShellRunner::new();
        runner
            .expect_run_long()
            .with(contains("rsync -a --delete"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        run(&runner, &Platform::Ubuntu, &config).await.unwrap();
        // the timestamped run directory was created under the destination
        assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_run_without_destination_is_config_error() {
        let runner = MockShellRunner::new();
        let err = run(&runner, &Platform::Ubuntu, &DevstrapConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[tokio::test]
    async fn test_run_reports_missing_source() {
        let tmp = TempDir::new().unwrap();
        let mut config = DevstrapConfig::default();
        config.backup = BackupConfig {
            sources: vec![PathBuf::from("/definitely/not/here")],
            destination: Some(tmp.path().join("backups")),
        };

        // the missing source is skipped before any command runs
        let runner = MockShellRunner::new();
        let err = run(&runner, &Platform::Ubuntu, &config).await.unwrap_err();
        assert!(format!("{}", err).contains("1 of 1"));
    }
}
