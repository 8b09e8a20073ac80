//! Slack installer.

use colored::Colorize;

use crate::errors::{DevstrapError, Result};
use crate::installs::{
    ensure_snap, install_via, install_windows_pkg, report_unsupported, success_message,
    windows_pkg_installed, InstallContext,
};
use crate::managers::{BrewCask, PackageManager, Snap};
use crate::os;
use crate::platform::Platform;

const APP: &str = "Slack";
const MACOS_BUNDLE: &str = "Slack.app";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_macos(ctx).await,
        p if p.is_apt_based() => install_apt_family(ctx).await,
        p if p.is_windows() => {
            install_windows_pkg(ctx, APP, "SlackTechnologies.Slack", "slack").await
        }
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
    install_via(APP, &BrewCask::new(ctx.runner), "slack").await
}

// The Slack snap also wants classic confinement.
pub async fn install_apt_family(ctx: &InstallContext<'_>) -> Result<()> {
    let snap = Snap::new(ctx.runner);

    if snap.is_package_installed("slack").await? {
        println!("{} is already installed.", APP);
        return Ok(());
    }
    if !ensure_snap(ctx).await? {
        return Err(DevstrapError::prerequisite_missing(
            snap.name(),
            snap.remediation(),
        ));
    }

    snap.install_classic("slack").await?;

    if !snap.is_package_installed("slack").await? {
        return Err(DevstrapError::verification_failed(
            APP,
            "snap list slack finds nothing after install",
        ));
    }
    println!("{}", success_message(APP).green());
    Ok(())
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    match &ctx.platform {
        Platform::Macos => Ok(os::macos_app_installed(MACOS_BUNDLE)
            || BrewCask::new(ctx.runner).is_package_installed("slack").await?),
        p if p.is_apt_based() => Snap::new(ctx.runner).is_package_installed("slack").await,
        p if p.is_windows() => {
            windows_pkg_installed(ctx, "SlackTechnologies.Slack", "slack").await
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_already_installed_short_circuits() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .with(eq("snap list slack"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("Name   Version  Rev\nslack  4.36.140 145\n")));
        let ctx = InstallContext::new(Platform::Ubuntu, &runner).assume_yes(true);
        install_apt_family(&ctx).await.unwrap();
    }
}
