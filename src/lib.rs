//! devstrap - set up a development machine from one binary
//!
//! devstrap installs a curated set of desktop and CLI applications through
//! each platform's native package manager, and bundles cross-platform
//! replacements for the shell scripts that used to do machine maintenance.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use devstrap::exec::SystemRunner;
//! use devstrap::installs::{install_app, InstallContext};
//! use devstrap::platform::Platform;
//!
//! # async fn example() -> devstrap::errors::Result<()> {
//! let runner = SystemRunner::new();
//! let ctx = InstallContext::new(Platform::detect(), &runner);
//! install_app("chromium", &ctx).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`platform`]: host classification, everything else branches on it
//! - [`exec`]: the [`exec::ShellRunner`] trait all commands go through
//! - [`managers`]: one adapter per native package manager
//! - [`installs`]: per-application installers sharing one idempotent flow
//! - [`scripts`]: history, cleanup, backup, and process-kill utilities
//!
//! # Error Handling
//!
//! Fallible operations return [`errors::Result<T>`] with
//! [`errors::DevstrapError`] as the error type; `main` prints the error and
//! exits non-zero.

pub mod commands;
pub mod configuration;
pub mod errors;
pub mod exec;
pub mod installs;
pub mod managers;
pub mod os;
pub mod platform;
pub mod scripts;

pub use configuration::DevstrapConfig;
pub use errors::{DevstrapError, Result};
pub use exec::{ShellRunner, SystemRunner};
pub use platform::Platform;
