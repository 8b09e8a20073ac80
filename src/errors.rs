//! Error types for devstrap operations.
//!
//! Installer failures fall into a small set of categories that the original
//! shell-script era only distinguished by message text; here they are
//! structured so callers (and tests) can tell them apart.

use thiserror::Error;

/// The main error type for devstrap operations.
#[derive(Debug, Error)]
pub enum DevstrapError {
    /// A required package manager is not present on the host. Carries
    /// remediation text pointing at the manager's official install docs.
    #[error("{manager} is required but not installed. {remediation}")]
    PrerequisiteMissing {
        manager: String,
        remediation: String,
    },

    /// A shell command exited non-zero. Captured output is preserved so the
    /// user sees what the package manager actually said.
    #[error("command `{command}` failed with exit code {code}\nstdout: {stdout}\nstderr: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The install command reported success but the post-install presence
    /// check still can't find the application. Distinct from CommandFailed:
    /// the package manager's own success signal was not trustworthy.
    #[error("{app} install completed but {app} was not found afterwards: {detail}")]
    VerificationFailed { app: String, detail: String },

    /// Configuration-related errors (file parsing, validation, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// File I/O operation failures
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Failures spawning or timing out a child process, as opposed to the
    /// process itself exiting non-zero.
    #[error("Process error running `{command}`: {detail}")]
    Process { command: String, detail: String },
}

/// A type alias for Results that use DevstrapError.
pub type Result<T> = std::result::Result<T, DevstrapError>;

impl DevstrapError {
    /// Creates a new PrerequisiteMissing error.
    pub fn prerequisite_missing<S1, S2>(manager: S1, remediation: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        DevstrapError::PrerequisiteMissing {
            manager: manager.into(),
            remediation: remediation.into(),
        }
    }

    /// Creates a new CommandFailed error from a captured command result.
    pub fn command_failed<S: Into<String>>(
        command: S,
        code: i32,
        stdout: String,
        stderr: String,
    ) -> Self {
        DevstrapError::CommandFailed {
            command: command.into(),
            code,
            stdout,
            stderr,
        }
    }

    /// Creates a new VerificationFailed error.
    pub fn verification_failed<S1, S2>(app: S1, detail: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        DevstrapError::VerificationFailed {
            app: app.into(),
            detail: detail.into(),
        }
    }

    /// Creates a new Process error.
    pub fn process<S1, S2>(command: S1, detail: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        DevstrapError::Process {
            command: command.into(),
            detail: detail.into(),
        }
    }

    /// Returns the error category as a string for logging.
    pub fn category(&self) -> &'static str {
        match self {
            DevstrapError::PrerequisiteMissing { .. } => "prerequisite_missing",
            DevstrapError::CommandFailed { .. } => "command_failed",
            DevstrapError::VerificationFailed { .. } => "verification_failed",
            DevstrapError::Config(_) => "config",
            DevstrapError::Io(_) => "io",
            DevstrapError::Process { .. } => "process",
        }
    }
}
