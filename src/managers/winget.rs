//! winget adapter for Windows.
//!
//! Packages are addressed by exact winget ID ("Mozilla.Firefox"), never by
//! fuzzy name, so probes can rely on `--id ... -e`.

use async_trait::async_trait;

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::managers::{check_exit, quoted, PackageManager};

pub struct Winget<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> Winget<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        Winget { runner }
    }
}

/// Find the version column in `winget list --id <id> -e` output.
///
/// The table has a dashed separator under the header; the match row carries
/// the id followed by the installed version:
/// ```text
/// Name     Id               Version  Source
/// ------------------------------------------
/// Firefox  Mozilla.Firefox  124.0.1  winget
/// ```
pub fn parse_winget_list(output: &str, id: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut parts = line.split_whitespace().peekable();
        while let Some(token) = parts.next() {
            if token == id {
                return parts.next().map(|v| v.to_string());
            }
        }
        None
    })
}

#[async_trait]
impl PackageManager for Winget<'_> {
    fn name(&self) -> &'static str {
        "winget"
    }

    fn remediation(&self) -> &'static str {
        "winget ships with the App Installer package on Windows 10/11; \
         install it from the Microsoft Store or see \
         https://learn.microsoft.com/windows/package-manager/winget/"
    }

    async fn is_installed(&self) -> bool {
        self.runner
            .run("winget --version")
            .await
            .map(|out| out.success())
            .unwrap_or(false)
    }

    async fn install(&self, package: &str) -> Result<()> {
        let cmd = format!(
            "winget install --id {} -e --silent \
             --accept-package-agreements --accept-source-agreements",
            quoted(package)
        );
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        // winget exits non-zero when no installed package matches the id.
        let cmd = format!("winget list --id {} -e", quoted(package));
        let out = self.runner.run(&cmd).await?;
        Ok(out.success())
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        let cmd = format!("winget list --id {} -e", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if !out.success() {
            return Ok(None);
        }
        Ok(parse_winget_list(&out.stdout, package))
    }
}
