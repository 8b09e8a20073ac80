//! Chromium installer.
//!
//! Ubuntu-family hosts prefer the snap (bootstrapping snapd when needed)
//! and fall back to the APT package. Amazon Linux has no Chromium package
//! at all, so that path installs Google Chrome from the vendor RPM. The
//! substitution is deliberate and the messages name Google Chrome.

use colored::Colorize;
use tracing::info;

use crate::errors::{DevstrapError, Result};
use crate::installs::{
    ensure_snap, install_via, install_windows_pkg, report_unsupported, success_message,
    InstallContext,
};
use crate::managers::{Apt, BrewCask, Dnf, PackageManager, Snap};
use crate::os;
use crate::platform::Platform;

const APP: &str = "Chromium";
const MACOS_BUNDLE: &str = "Chromium.app";
const CHROME_RPM_URL: &str =
    "https://dl.google.com/linux/direct/google-chrome-stable_current_x86_64.rpm";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_macos(ctx).await,
        p if p.is_apt_based() => install_apt_family(ctx).await,
        Platform::AmazonLinux => install_amazon_linux(ctx).await,
        Platform::Fedora | Platform::Rhel => {
            install_via(APP, &Dnf::new(ctx.runner), "chromium").await
        }
        p if p.is_windows() => install_windows_pkg(ctx, APP, "Hibbiki.Chromium", "chromium").await,
        other => {
            report_unsupported(APP, other);
            Ok(())
        }
    }
}

pub async fn install_macos(ctx: &InstallContext<'_>) -> Result<()> {
    if os::macos_app_installed(MACOS_BUNDLE) {
        println!("{} is already installed.", APP);
        return Ok(());
    }
    install_via(APP, &BrewCask::new(ctx.runner), "chromium").await
}

pub async fn install_apt_family(ctx: &InstallContext<'_>) -> Result<()> {
    if ensure_snap(ctx).await? {
        return install_via(APP, &Snap::new(ctx.runner), "chromium").await;
    }

    // Snap unusable: fall back to the APT package where one exists.
    let apt = Apt::new(ctx.runner);
    if apt.is_installed().await {
        info!("snap unavailable, falling back to apt for {}", APP);
        return install_via(APP, &apt, "chromium-browser").await;
    }

    let snap = Snap::new(ctx.runner);
    Err(DevstrapError::prerequisite_missing(
        snap.name(),
        snap.remediation(),
    ))
}

/// Amazon Linux does not package Chromium; install Google Chrome instead.
pub async fn install_amazon_linux(ctx: &InstallContext<'_>) -> Result<()> {
    let dnf = Dnf::new(ctx.runner);

    if dnf.is_package_installed("google-chrome-stable").await? {
        println!("Google Chrome is already installed.");
        return Ok(());
    }
    if !dnf.is_installed().await {
        return Err(DevstrapError::prerequisite_missing(
            dnf.name(),
            dnf.remediation(),
        ));
    }

    println!("Chromium is not packaged for Amazon Linux; installing Google Chrome instead.");
    dnf.install_from_url(CHROME_RPM_URL).await?;

    if !dnf.is_package_installed("google-chrome-stable").await? {
        return Err(DevstrapError::verification_failed(
            "Google Chrome",
            "rpm -q google-chrome-stable finds nothing after install",
        ));
    }
    println!("{}", success_message("Google Chrome").green());
    Ok(())
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    match &ctx.platform {
        Platform::Macos => Ok(os::macos_app_installed(MACOS_BUNDLE)
            || BrewCask::new(ctx.runner).is_package_installed("chromium").await?),
        p if p.is_apt_based() => {
            let snap = Snap::new(ctx.runner);
            if snap.is_package_installed("chromium").await? {
                return Ok(true);
            }
            Apt::new(ctx.runner).is_package_installed("chromium-browser").await
        }
        Platform::AmazonLinux => {
            Dnf::new(ctx.runner).is_package_installed("google-chrome-stable").await
        }
        Platform::Fedora | Platform::Rhel => {
            Dnf::new(ctx.runner).is_package_installed("chromium").await
        }
        p if p.is_windows() => {
            crate::installs::windows_pkg_installed(ctx, "Hibbiki.Chromium", "chromium").await
        }
        _ => Ok(false),
    }
}
