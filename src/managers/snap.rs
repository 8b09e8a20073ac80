//! Snap adapter.
//!
//! Snap is the one package manager devstrap will bootstrap itself, via
//! `apt-get install snapd` on Debian-family hosts. Every other manager gets
//! remediation text instead of an automatic install.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::managers::{check_exit, quoted, PackageManager};

pub struct Snap<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> Snap<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        Snap { runner }
    }

    /// Install snapd through APT. Only meaningful on Debian-family hosts.
    pub async fn bootstrap(&self) -> Result<()> {
        info!("Bootstrapping snapd via apt-get");
        let cmd = "sudo apt-get install -y snapd";
        let out = self.runner.run_long(cmd).await?;
        check_exit(cmd, out)
    }

    /// Install a snap that requires classic confinement (IDEs, editors).
    pub async fn install_classic(&self, package: &str) -> Result<()> {
        let cmd = format!("sudo snap install --classic {}", quoted(package));
        debug!("snap install: {}", cmd);
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }
}

/// Extract the version column from `snap list <pkg>` output.
///
/// The output is a fixed header line followed by one row per snap:
/// ```text
/// Name      Version        Rev    Tracking       Publisher   Notes
/// chromium  123.0.6312.86  2805   latest/stable  canonical*  -
/// ```
pub fn parse_snap_list_version(output: &str) -> Option<String> {
    output
        .lines()
        .nth(1)?
        .split_whitespace()
        .nth(1)
        .map(|v| v.to_string())
}

#[async_trait]
impl PackageManager for Snap<'_> {
    fn name(&self) -> &'static str {
        "Snap"
    }

    fn remediation(&self) -> &'static str {
        "Install snapd first: sudo apt-get install snapd \
         (see https://snapcraft.io/docs/installing-snapd)"
    }

    async fn is_installed(&self) -> bool {
        self.runner
            .run("command -v snap")
            .await
            .map(|out| out.success())
            .unwrap_or(false)
    }

    async fn install(&self, package: &str) -> Result<()> {
        let cmd = format!("sudo snap install {}", quoted(package));
        debug!("snap install: {}", cmd);
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        // `snap list <pkg>` exits non-zero when the snap isn't installed.
        let cmd = format!("snap list {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        Ok(out.success())
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        let cmd = format!("snap list {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if !out.success() {
            return Ok(None);
        }
        Ok(parse_snap_list_version(&out.stdout))
    }
}
