//! Chocolatey adapter for Windows.

use async_trait::async_trait;

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::managers::{check_exit, quoted, PackageManager};

pub struct Choco<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> Choco<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        Choco { runner }
    }
}

/// Find `package` in `choco list` output and return its version.
///
/// Output mixes status lines with "name version" package lines:
/// ```text
/// Chocolatey v2.2.2
/// chromium 123.0.6312.86
/// 1 packages installed.
/// ```
pub fn parse_choco_list(output: &str, package: &str) -> Option<String> {
    let wanted = package.to_lowercase();
    output.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let version = parts.next()?;
        if name.to_lowercase() == wanted && version.chars().next()?.is_ascii_digit() {
            Some(version.to_string())
        } else {
            None
        }
    })
}

#[async_trait]
impl PackageManager for Choco<'_> {
    fn name(&self) -> &'static str {
        "Chocolatey"
    }

    fn remediation(&self) -> &'static str {
        "Install Chocolatey first from an elevated PowerShell prompt; \
         see https://chocolatey.org/install"
    }

    async fn is_installed(&self) -> bool {
        self.runner
            .run("choco --version")
            .await
            .map(|out| out.success())
            .unwrap_or(false)
    }

    async fn install(&self, package: &str) -> Result<()> {
        let cmd = format!("choco install -y {}", quoted(package));
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        Ok(self.package_version(package).await?.is_some())
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        // Chocolatey v2 dropped the --local-only flag; `list` only reports
        // installed packages now.
        let cmd = format!("choco list --exact {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if !out.success() {
            return Ok(None);
        }
        Ok(parse_choco_list(&out.stdout, package))
    }
}
