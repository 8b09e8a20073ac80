//! OpenSSH client installer.
//!
//! ssh ships with macOS and nearly every Linux distribution, so the
//! presence check is a plain `command -v ssh` before any manager query. On
//! Windows the client is an optional capability managed by DISM rather
//! than a package.

use colored::Colorize;

use crate::errors::{DevstrapError, Result};
use crate::installs::{install_via, report_unsupported, success_message, InstallContext};
use crate::managers::{Apt, Brew, Dnf};
use crate::platform::Platform;

const APP: &str = "OpenSSH";
const WINDOWS_CAPABILITY: &str = "OpenSSH.Client~~~~0.0.1.0";

async fn ssh_on_path(ctx: &InstallContext<'_>) -> bool {
    ctx.runner
        .run("command -v ssh")
        .await
        .map(|out| out.success())
        .unwrap_or(false)
}

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        p if p.is_windows() => install_windows(ctx).await,
        Platform::Macos => {
            if ssh_on_path(ctx).await {
                println!("{} is already installed.", APP);
                return Ok(());
            }
            install_via(APP, &Brew::new(ctx.runner), "openssh").await
        }
        p if p.is_apt_based() => {
            if ssh_on_path(ctx).await {
                println!("{} is already installed.", APP);
                return Ok(());
            }
            install_via(APP, &Apt::new(ctx.runner), "openssh-client").await
        }
        p if p.is_rpm_based() => {
            if ssh_on_path(ctx).await {
                println!("{} is already installed.", APP);
                return Ok(());
            }
            install_via(APP, &Dnf::new(ctx.runner), "openssh-clients").await
        }
        other => {
            report_unsupported(APP, other);
            Ok(())
        }
    }
}

/// Windows optional-capability path. `Get-WindowsCapability` reports
/// `State : Installed` when present.
pub async fn install_windows(ctx: &InstallContext<'_>) -> Result<()> {
    let probe = format!("Get-WindowsCapability -Online -Name {}", WINDOWS_CAPABILITY);
    let out = ctx.runner.run(&probe).await?;
    if out.success() && capability_installed(&out.stdout) {
        println!("{} is already installed.", APP);
        return Ok(());
    }

    let cmd = format!("Add-WindowsCapability -Online -Name {}", WINDOWS_CAPABILITY);
    let out = ctx.runner.run_long(&cmd).await?;
    if !out.success() {
        return Err(DevstrapError::command_failed(
            &cmd, out.code, out.stdout, out.stderr,
        ));
    }

    let out = ctx.runner.run(&probe).await?;
    if !(out.success() && capability_installed(&out.stdout)) {
        return Err(DevstrapError::verification_failed(
            APP,
            "the OpenSSH.Client capability is still not reported as Installed",
        ));
    }
    println!("{}", success_message(APP).green());
    Ok(())
}

/// Parse the State line out of Get-WindowsCapability output.
fn capability_installed(output: &str) -> bool {
    output.lines().any(|line| {
        let mut parts = line.splitn(2, ':');
        matches!(
            (parts.next().map(str::trim), parts.next().map(str::trim)),
            (Some("State"), Some("Installed"))
        )
    })
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    if ctx.platform.is_windows() {
        let probe = format!("Get-WindowsCapability -Online -Name {}", WINDOWS_CAPABILITY);
        let out = ctx.runner.run(&probe).await?;
        return Ok(out.success() && capability_installed(&out.stdout));
    }
    Ok(ssh_on_path(ctx).await)
}
