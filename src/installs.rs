//! Per-application installers.
//!
//! Each application module exposes `install()` plus per-platform functions
//! that tests can drive directly. All of them share the same idempotent
//! flow, hoisted into [`install_via`]:
//!
//! 1. presence check via the most authoritative signal for the platform;
//! 2. already present: print and return Ok;
//! 3. required package manager missing: fail with remediation text;
//! 4. run the install command, surfacing captured output on failure;
//! 5. re-run the presence check, because package managers sometimes report
//!    success for installs that didn't land.
//!
//! Unsupported platforms are not an error: the installer prints a message
//! naming the platform and returns Ok.

pub mod bitwarden;
pub mod chromium;
pub mod discord;
pub mod firefox;
pub mod git;
pub mod openssh;
pub mod slack;
pub mod vscode;
pub mod wireguard;

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::{debug, warn};

use crate::errors::{DevstrapError, Result};
use crate::exec::ShellRunner;
use crate::managers::{Apt, Choco, PackageManager, Snap, Winget};
use crate::platform::Platform;

/// Everything an installer needs: the detected platform and the runner that
/// executes package-manager commands.
pub struct InstallContext<'r> {
    pub platform: Platform,
    pub runner: &'r dyn ShellRunner,
    /// Skip interactive confirmations (CLI --yes).
    pub assume_yes: bool,
}

impl<'r> InstallContext<'r> {
    pub fn new(platform: Platform, runner: &'r dyn ShellRunner) -> Self {
        InstallContext {
            platform,
            runner,
            assume_yes: false,
        }
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

/// A supported application.
pub struct AppInfo {
    pub name: &'static str,
    pub summary: &'static str,
}

/// All applications devstrap knows how to install.
pub fn known_apps() -> &'static [AppInfo] {
    &[
        AppInfo { name: "bitwarden", summary: "Bitwarden password manager" },
        AppInfo { name: "chromium", summary: "Chromium web browser" },
        AppInfo { name: "discord", summary: "Discord chat client" },
        AppInfo { name: "firefox", summary: "Firefox web browser" },
        AppInfo { name: "git", summary: "Git version control" },
        AppInfo { name: "openssh", summary: "OpenSSH client" },
        AppInfo { name: "slack", summary: "Slack chat client" },
        AppInfo { name: "vscode", summary: "Visual Studio Code editor" },
        AppInfo { name: "wireguard", summary: "WireGuard VPN tools" },
    ]
}

/// Dispatch an install by application name. Returns Ok(false) for names
/// devstrap doesn't know.
pub async fn install_app(name: &str, ctx: &InstallContext<'_>) -> Result<bool> {
    match name {
        "bitwarden" => bitwarden::install(ctx).await.map(|_| true),
        "chromium" => chromium::install(ctx).await.map(|_| true),
        "discord" => discord::install(ctx).await.map(|_| true),
        "firefox" => firefox::install(ctx).await.map(|_| true),
        "git" => git::install(ctx).await.map(|_| true),
        "openssh" => openssh::install(ctx).await.map(|_| true),
        "slack" => slack::install(ctx).await.map(|_| true),
        "vscode" => vscode::install(ctx).await.map(|_| true),
        "wireguard" => wireguard::install(ctx).await.map(|_| true),
        _ => Ok(false),
    }
}

/// Best-effort presence probe by application name, for the `list` table.
pub async fn app_installed(name: &str, ctx: &InstallContext<'_>) -> Result<bool> {
    match name {
        "bitwarden" => bitwarden::is_installed(ctx).await,
        "chromium" => chromium::is_installed(ctx).await,
        "discord" => discord::is_installed(ctx).await,
        "firefox" => firefox::is_installed(ctx).await,
        "git" => git::is_installed(ctx).await,
        "openssh" => openssh::is_installed(ctx).await,
        "slack" => slack::is_installed(ctx).await,
        "vscode" => vscode::is_installed(ctx).await,
        "wireguard" => wireguard::is_installed(ctx).await,
        _ => Ok(false),
    }
}

/// The shared idempotent install flow (see module docs).
pub(crate) async fn install_via(
    app: &str,
    manager: &dyn PackageManager,
    package: &str,
) -> Result<()> {
    if manager.is_package_installed(package).await? {
        println!("{} is already installed.", app);
        return Ok(());
    }

    if !manager.is_installed().await {
        return Err(DevstrapError::prerequisite_missing(
            manager.name(),
            manager.remediation(),
        ));
    }

    debug!("Installing {} via {}", package, manager.name());
    manager.install(package).await?;

    if !manager.is_package_installed(package).await? {
        return Err(DevstrapError::verification_failed(
            app,
            format!(
                "{} reported success but its package query can't find {}",
                manager.name(),
                package
            ),
        ));
    }

    println!("{}", success_message(app).green());
    Ok(())
}

/// The message printed after a verified install.
pub(crate) fn success_message(app: &str) -> String {
    format!("{} installed successfully.", app)
}

/// Print the unsupported-platform message. Deliberately not an error.
pub(crate) fn report_unsupported(app: &str, platform: &Platform) {
    println!(
        "{} install is not supported on this platform ({}).",
        app, platform
    );
}

/// Windows install path: winget if present, Chocolatey as the fallback.
pub(crate) async fn install_windows_pkg(
    ctx: &InstallContext<'_>,
    app: &str,
    winget_id: &str,
    choco_pkg: &str,
) -> Result<()> {
    let winget = Winget::new(ctx.runner);
    if winget.is_installed().await {
        return install_via(app, &winget, winget_id).await;
    }
    let choco = Choco::new(ctx.runner);
    if choco.is_installed().await {
        return install_via(app, &choco, choco_pkg).await;
    }
    Err(DevstrapError::prerequisite_missing(
        winget.name(),
        winget.remediation(),
    ))
}

/// Presence probe on Windows: winget first, then Chocolatey.
pub(crate) async fn windows_pkg_installed(
    ctx: &InstallContext<'_>,
    winget_id: &str,
    choco_pkg: &str,
) -> Result<bool> {
    let winget = Winget::new(ctx.runner);
    if winget.is_installed().await && winget.is_package_installed(winget_id).await? {
        return Ok(true);
    }
    let choco = Choco::new(ctx.runner);
    if choco.is_installed().await && choco.is_package_installed(choco_pkg).await? {
        return Ok(true);
    }
    Ok(false)
}

/// Make snap usable on an apt-based host, bootstrapping snapd if the user
/// agrees. Returns whether snap can be used afterwards.
pub(crate) async fn ensure_snap(ctx: &InstallContext<'_>) -> Result<bool> {
    let snap = Snap::new(ctx.runner);
    if snap.is_installed().await {
        return Ok(true);
    }

    let apt = Apt::new(ctx.runner);
    if !apt.is_installed().await {
        return Ok(false);
    }

    if !ctx.assume_yes {
        let agreed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("snapd is required but not installed. Install it via apt-get?")
            .default(true)
            .interact()
            .unwrap_or(false);
        if !agreed {
            return Ok(false);
        }
    }

    if let Err(e) = snap.bootstrap().await {
        warn!("snapd bootstrap failed: {}", e);
        return Ok(false);
    }
    Ok(snap.is_installed().await)
}
