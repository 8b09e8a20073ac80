//! Package manager adapters.
//!
//! One thin adapter per native package manager, each wrapping a
//! [`ShellRunner`] and exposing the same four operations: is the manager
//! itself present, install a package, query whether a package is installed,
//! and extract its version. The [`PackageManager`] trait lets the shared
//! install flow treat them uniformly.

pub mod apt;
pub mod brew;
pub mod choco;
pub mod dnf;
pub mod snap;
pub mod winget;

pub use apt::Apt;
pub use brew::{Brew, BrewCask};
pub use choco::Choco;
pub use dnf::Dnf;
pub use snap::Snap;
pub use winget::Winget;

use async_trait::async_trait;

use crate::errors::Result;
use crate::exec::CommandOutput;

/// Common surface over the native package managers.
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Display name of the manager ("Homebrew", "APT", ...).
    fn name(&self) -> &'static str;

    /// Instructions for installing the manager itself. Devstrap never
    /// bootstraps a package manager silently (snapd excepted, see
    /// [`Snap::bootstrap`]); this text is surfaced instead.
    fn remediation(&self) -> &'static str;

    /// Whether the manager binary is available on this host.
    async fn is_installed(&self) -> bool;

    /// Install `package`, surfacing captured output on non-zero exit.
    async fn install(&self, package: &str) -> Result<()>;

    /// Whether `package` is installed according to the manager's own query.
    async fn is_package_installed(&self, package: &str) -> Result<bool>;

    /// The installed version of `package`, if it can be determined.
    async fn package_version(&self, package: &str) -> Result<Option<String>>;
}

/// Shell-escape a package name before splicing it into a command line.
pub(crate) fn quoted(package: &str) -> String {
    crate::exec::quote(package)
}

/// Map a captured non-zero exit to a CommandFailed error.
pub(crate) fn check_exit(command: &str, out: CommandOutput) -> Result<()> {
    if out.success() {
        Ok(())
    } else {
        Err(crate::errors::DevstrapError::command_failed(
            command, out.code, out.stdout, out.stderr,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandOutput;

    #[test]
    fn test_quoted_escapes_metacharacters() {
        assert_eq!(quoted("git"), "git");
        let escaped = quoted("git; rm -rf /");
        assert!(escaped.starts_with('\''));
        assert!(escaped.contains("rm -rf"));
    }

    #[test]
    fn test_check_exit_surfaces_output() {
        let out = CommandOutput::failed(100, "E: Unable to locate package nope");
        let err = check_exit("sudo apt-get install -y nope", out).unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("Unable to locate package"));
        assert!(msg.contains("exit code 100"));
    }
}
