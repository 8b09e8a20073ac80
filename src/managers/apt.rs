//! APT adapter for Debian-family platforms.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::managers::{check_exit, quoted, PackageManager};

pub struct Apt<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> Apt<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        Apt { runner }
    }

    /// Refresh the package index. Not called automatically: `apt-get update`
    /// is slow and most installs work against the existing index.
    pub async fn update(&self) -> Result<()> {
        let cmd = "sudo apt-get update";
        let out = self.runner.run_long(cmd).await?;
        check_exit(cmd, out)
    }
}

#[async_trait]
impl PackageManager for Apt<'_> {
    fn name(&self) -> &'static str {
        "APT"
    }

    fn remediation(&self) -> &'static str {
        "APT ships with Debian-based distributions. If apt-get is missing, \
         this is probably not a Debian-family system; check `cat /etc/os-release`."
    }

    async fn is_installed(&self) -> bool {
        self.runner
            .run("command -v apt-get")
            .await
            .map(|out| out.success())
            .unwrap_or(false)
    }

    async fn install(&self, package: &str) -> Result<()> {
        let cmd = format!("sudo apt-get install -y {}", quoted(package));
        debug!("apt install: {}", cmd);
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        // dpkg-query exits non-zero for unknown packages and reports
        // "deinstall" states for removed-but-not-purged ones.
        let cmd = format!("dpkg-query -W -f='${{Status}}' {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        Ok(out.success() && out.stdout.contains("install ok installed"))
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        let cmd = format!("dpkg-query -W -f='${{Version}}' {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if out.success() && !out.stdout.trim().is_empty() {
            Ok(Some(out.stdout.trim().to_string()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_is_package_installed_true() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .with(eq("dpkg-query -W -f='${Status}' git"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("install ok installed")));
        let apt = Apt::new(&runner);
        assert!(apt.is_package_installed("git").await.unwrap());
    }

    #[tokio::test]
    async fn test_is_package_installed_deinstalled_state() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(CommandOutput::ok("deinstall ok config-files")));
        let apt = Apt::new(&runner);
        assert!(!apt.is_package_installed("git").await.unwrap());
    }

    #[tokio::test]
    async fn test_install_failure_carries_stderr() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run_long()
            .returning(|_| Ok(CommandOutput::failed(100, "E: Unable to locate package nope")));
        let apt = Apt::new(&runner);
        let err = apt.install("nope").await.unwrap_err();
        assert!(format!("{}", err).contains("Unable to locate package"));
    }

    #[tokio::test]
    async fn test_package_version() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .returning(|_| Ok(CommandOutput::ok("1:2.39.2-1.1")));
        let apt = Apt::new(&runner);
        assert_eq!(
            apt.package_version("git").await.unwrap(),
            Some("1:2.39.2-1.1".to_string())
        );
    }

    #[tokio::test]
    async fn test_package_name_is_escaped() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run_long()
            .with(eq("sudo apt-get install -y 'git; rm -rf /'"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        let apt = Apt::new(&runner);
        apt.install("git; rm -rf /").await.unwrap();
    }
}
