//! Visual Studio Code installer. The snap needs classic confinement, so
//! the apt-family path bypasses the generic flow for the install step.

use colored::Colorize;

use crate::errors::{DevstrapError, Result};
use crate::installs::{
    ensure_snap, install_via, install_windows_pkg, report_unsupported, success_message,
    windows_pkg_installed, InstallContext,
};
use crate::managers::{BrewCask, PackageManager, Snap};
use crate::os;
use crate::platform::Platform;

const APP: &str = "Visual Studio Code";
const MACOS_BUNDLE: &str = "Visual Studio Code.app";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_macos(ctx).await,
        p if p.is_apt_based() => install_apt_family(ctx).await,
        p if p.is_windows() => {
            install_windows_pkg(ctx, APP, "Microsoft.VisualStudioCode", "vscode").await
        }
        other => {
            // Microsoft distributes VS Code for RPM platforms through its
            // own repository; setting that up is out of scope here.
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
    install_via(APP, &BrewCask::new(ctx.runner), "visual-studio-code").await
}

/// Snap-only on apt platforms: the classic-confinement flag rules out the
/// shared flow's plain `snap install`.
pub async fn install_apt_family(ctx: &InstallContext<'_>) -> Result<()> {
    let snap = Snap::new(ctx.runner);

    if snap.is_package_installed("code").await? {
        println!("{} is already installed.", APP);
        return Ok(());
    }
    if !ensure_snap(ctx).await? {
        return Err(DevstrapError::prerequisite_missing(
            snap.name(),
            snap.remediation(),
        ));
    }

    snap.install_classic("code").await?;

    if !snap.is_package_installed("code").await? {
        return Err(DevstrapError::verification_failed(
            APP,
            "snap list code finds nothing after install",
        ));
    }
    println!("{}", success_message(APP).green());
    Ok(())
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    match &ctx.platform {
        Platform::Macos => Ok(os::macos_app_installed(MACOS_BUNDLE)
            || BrewCask::new(ctx.runner)
                .is_package_installed("visual-studio-code")
                .await?),
        p if p.is_apt_based() => Snap::new(ctx.runner).is_package_installed("code").await,
        p if p.is_windows() => {
            windows_pkg_installed(ctx, "Microsoft.VisualStudioCode", "vscode").await
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
    async fn test_ubuntu_installs_classic_snap() {
        let mut runner = MockShellRunner::new();
        let mut probes = 0;
        runner
            .expect_run()
            .with(eq("snap list code"))
            .times(2)
            .returning_st(move |_| {
                probes += 1;
                if probes == 1 {
                    Ok(CommandOutput::failed(1, ""))
                } else {
                    Ok(CommandOutput::ok("Name  Version  Rev\ncode  1.88.0   155\n"))
                }
            });
        runner
            .expect_run()
            .with(eq("command -v snap"))
            .returning(|_| Ok(CommandOutput::ok("/usr/bin/snap")));
        runner
            .expect_run_long()
            .with(eq("sudo snap install --classic code"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let ctx = InstallContext::new(Platform::Ubuntu, &runner).assume_yes(true);
        install_apt_family(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_rpm_platforms_report_unsupported() {
        let runner = MockShellRunner::new();
        let ctx = InstallContext::new(Platform::Fedora, &runner);
        // Resolves Ok without touching the runner.
        install(&ctx).await.unwrap();
    }
}
