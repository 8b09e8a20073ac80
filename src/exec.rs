//! Shell command execution.
//!
//! Every interaction with a package manager or native OS tool goes through
//! the [`ShellRunner`] trait so that installers can be tested against a mock
//! without spawning processes. The production implementation uses
//! `tokio::process` with a timeout, `sh -c` on Unix and PowerShell on
//! Windows.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, trace};

use crate::errors::{DevstrapError, Result};

#[cfg(test)]
use mockall::automock;

const MACHINE_KIND: &str = if cfg!(windows) {
    "windows"
} else if cfg!(unix) {
    "unix"
} else {
    "unknown"
};

/// Default timeout for package-manager probes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for install commands, which may download large packages.
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// The captured result of a shell invocation.
///
/// A non-zero `code` is not an error at this layer: presence probes like
/// `snap list chromium` signal "not installed" through their exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    #[cfg(test)]
    pub fn ok(stdout: &str) -> Self {
        CommandOutput {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failed(code: i32, stderr: &str) -> Self {
        CommandOutput {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Runs shell commands and captures their output.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Run `command` through the platform shell with the default timeout.
    async fn run(&self, command: &str) -> Result<CommandOutput>;

    /// Run `command` with an extended timeout, for installs that download.
    async fn run_long(&self, command: &str) -> Result<CommandOutput>;
}

/// Production runner backed by `tokio::process`.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner
    }

    async fn run_with_timeout(&self, command: &str, limit: Duration) -> Result<CommandOutput> {
        debug!("Running shell command: {}", command);

        let result = if MACHINE_KIND != "windows" {
            // Use sh -c for Unix systems for better shell compatibility
            timeout(limit, Command::new("sh").arg("-c").arg(command).output()).await
        } else {
            timeout(
                limit,
                Command::new("powershell.exe")
                    .args([
                        "-NonInteractive",
                        "-NoLogo",
                        "-NoProfile",
                        "-Command",
                        command,
                    ])
                    .output(),
            )
            .await
        };

        match result {
            Ok(Ok(output)) => {
                let out = CommandOutput {
                    code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };
                trace!("exit {}: {}", out.code, command);
                Ok(out)
            }
            Ok(Err(e)) => {
                error!("Process error: {}", e);
                Err(DevstrapError::process(command, e.to_string()))
            }
            Err(_) => {
                error!("Command timed out after {:?}: {}", limit, command);
                Err(DevstrapError::process(
                    command,
                    format!("timed out after {}s", limit.as_secs()),
                ))
            }
        }
    }
}

#[async_trait]
impl ShellRunner for SystemRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        self.run_with_timeout(command, DEFAULT_TIMEOUT).await
    }

    async fn run_long(&self, command: &str) -> Result<CommandOutput> {
        self.run_with_timeout(command, INSTALL_TIMEOUT).await
    }
}

/// Returns true if `name` resolves to an executable on the PATH.
pub fn command_exists(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Shell-escape an argument before splicing it into a command line.
pub fn quote(arg: &str) -> String {
    shell_escape::escape(std::borrow::Cow::Borrowed(arg)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_success() {
        assert!(CommandOutput::ok("hello").success());
        assert!(!CommandOutput::failed(1, "nope").success());
    }

    #[tokio::test]
    async fn test_system_runner_captures_stdout() {
        if MACHINE_KIND != "unix" {
            return;
        }
        let runner = SystemRunner::new();
        let out = runner.run("echo devstrap").await.unwrap();
        assert_eq!(out.code, 0);
        assert_eq!(out.stdout.trim(), "devstrap");
    }

    #[tokio::test]
    async fn test_system_runner_reports_nonzero_exit() {
        if MACHINE_KIND != "unix" {
            return;
        }
        let runner = SystemRunner::new();
        let out = runner.run("exit 3").await.unwrap();
        assert_eq!(out.code, 3);
        assert!(!out.success());
    }

    #[test]
    fn test_command_exists_for_shell() {
        if MACHINE_KIND == "unix" {
            assert!(command_exists("sh"));
        }
        assert!(!command_exists("definitely-not-a-real-binary-9f2d"));
    }
}
