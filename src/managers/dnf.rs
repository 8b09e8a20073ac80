//! DNF/YUM adapter for RPM-based platforms.
//!
//! Fedora and recent RHEL ship dnf; Amazon Linux 2 still ships yum. The
//! adapter probes for dnf first and falls back to yum, so installers never
//! have to care which one is present.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::managers::{check_exit, quoted, PackageManager};

pub struct Dnf<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> Dnf<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        Dnf { runner }
    }

    /// Returns "dnf" or "yum", whichever is available.
    async fn tool(&self) -> Option<&'static str> {
        for candidate in ["dnf", "yum"] {
            let probe = format!("command -v {}", candidate);
            if let Ok(out) = self.runner.run(&probe).await {
                if out.success() {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Install directly from an RPM URL. Used by installers whose product
    /// is distributed as a vendor RPM rather than from the distro repos.
    pub async fn install_from_url(&self, url: &str) -> Result<()> {
        let tool = self.tool().await.ok_or_else(|| {
            crate::errors::DevstrapError::prerequisite_missing(self.name(), self.remediation())
        })?;
        // URLs are compile-time constants from the installers, not user
        // input, and shell-escaping would mangle the scheme separator.
        let cmd = format!("sudo {} install -y {}", tool, url);
        debug!("rpm url install: {}", cmd);
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }
}

#[async_trait]
impl PackageManager for Dnf<'_> {
    fn name(&self) -> &'static str {
        "DNF/YUM"
    }

    fn remediation(&self) -> &'static str {
        "Neither dnf nor yum was found. These ship with Fedora, RHEL and \
         Amazon Linux; check `cat /etc/os-release`."
    }

    async fn is_installed(&self) -> bool {
        self.tool().await.is_some()
    }

    async fn install(&self, package: &str) -> Result<()> {
        let tool = self.tool().await.ok_or_else(|| {
            crate::errors::DevstrapError::prerequisite_missing(self.name(), self.remediation())
        })?;
        let cmd = format!("sudo {} install -y {}", tool, quoted(package));
        debug!("dnf install: {}", cmd);
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        // rpm -q works regardless of which frontend installed the package.
        let cmd = format!("rpm -q {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        Ok(out.success())
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        let cmd = format!("rpm -q --qf '%{{VERSION}}' {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if out.success() && !out.stdout.trim().is_empty() {
            Ok(Some(out.stdout.trim().to_string()))
        } else {
            Ok(None)
        }
    }
}
