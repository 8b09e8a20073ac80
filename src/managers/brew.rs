//! Homebrew adapters for macOS.
//!
//! Formulae and casks are separate namespaces with separate list commands,
//! so they get separate adapters over the same runner. GUI applications
//! install as casks; CLI tools as formulae.

use async_trait::async_trait;

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::managers::{check_exit, quoted, PackageManager};

const BREW_REMEDIATION: &str =
    "Install Homebrew first: /bin/bash -c \"$(curl -fsSL \
     https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)\" \
     (see https://brew.sh)";

pub struct Brew<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> Brew<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        Brew { runner }
    }
}

/// Parse `brew list --versions` output ("git 2.44.0") into a version.
fn parse_versions_line(output: &str) -> Option<String> {
    output
        .lines()
        .next()?
        .split_whitespace()
        .nth(1)
        .map(|v| v.to_string())
}

#[async_trait]
impl PackageManager for Brew<'_> {
    fn name(&self) -> &'static str {
        "Homebrew"
    }

    fn remediation(&self) -> &'static str {
        BREW_REMEDIATION
    }

    async fn is_installed(&self) -> bool {
        self.runner
            .run("command -v brew")
            .await
            .map(|out| out.success())
            .unwrap_or(false)
    }

    async fn install(&self, package: &str) -> Result<()> {
        let cmd = format!("brew install {}", quoted(package));
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        let cmd = format!("brew list --versions {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        Ok(out.success() && !out.stdout.trim().is_empty())
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        let cmd = format!("brew list --versions {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if !out.success() {
            return Ok(None);
        }
        Ok(parse_versions_line(&out.stdout))
    }
}

/// Cask variant: same manager binary, cask-scoped commands.
pub struct BrewCask<'r> {
    runner: &'r dyn ShellRunner,
}

impl<'r> BrewCask<'r> {
    pub fn new(runner: &'r dyn ShellRunner) -> Self {
        BrewCask { runner }
    }
}

#[async_trait]
impl PackageManager for BrewCask<'_> {
    fn name(&self) -> &'static str {
        "Homebrew"
    }

    fn remediation(&self) -> &'static str {
        BREW_REMEDIATION
    }

    async fn is_installed(&self) -> bool {
        self.runner
            .run("command -v brew")
            .await
            .map(|out| out.success())
            .unwrap_or(false)
    }

    async fn install(&self, package: &str) -> Result<()> {
        let cmd = format!("brew install --cask {}", quoted(package));
        let out = self.runner.run_long(&cmd).await?;
        check_exit(&cmd, out)
    }

    async fn is_package_installed(&self, package: &str) -> Result<bool> {
        let cmd = format!("brew list --cask --versions {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        Ok(out.success() && !out.stdout.trim().is_empty())
    }

    async fn package_version(&self, package: &str) -> Result<Option<String>> {
        let cmd = format!("brew list --cask --versions {}", quoted(package));
        let out = self.runner.run(&cmd).await?;
        if !out.success() {
            return Ok(None);
        }
        Ok(parse_versions_line(&out.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::*;

    #[test]
    fn test_parse_versions_line() {
        assert_eq!(parse_versions_line("git 2.44.0"), Some("2.44.0".to_string()));
        assert_eq!(
            parse_versions_line("firefox 124.0.1\n"),
            Some("124.0.1".to_string())
        );
        assert_eq!(parse_versions_line(""), None);
        assert_eq!(parse_versions_line("lonely"), None);
    }

    #[tokio::test]
    async fn test_cask_install_uses_cask_flag() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run_long()
            .with(eq("brew install --cask chromium"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));
        let cask = BrewCask::new(&runner);
        cask.install("chromium").await.unwrap();
    }

    #[tokio::test]
    async fn test_formula_installed_requires_output() {
        let mut runner = MockShellRunner::new();
        // brew exits 0 with empty output for some not-installed queries
        runner.expect_run().returning(|_| Ok(CommandOutput::ok("")));
        let brew = Brew::new(&runner);
        assert!(!brew.is_package_installed("git").await.unwrap());
    }
}
