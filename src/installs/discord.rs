//! Discord installer.

use crate::errors::{DevstrapError, Result};
use crate::installs::{
    ensure_snap, install_via, install_windows_pkg, report_unsupported, windows_pkg_installed,
    InstallContext,
};
use crate::managers::{BrewCask, PackageManager, Snap};
use crate::os;
use crate::platform::Platform;

const APP: &str = "Discord";
const MACOS_BUNDLE: &str = "Discord.app";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_macos(ctx).await,
        p if p.is_apt_based() => install_apt_family(ctx).await,
        p if p.is_windows() => install_windows_pkg(ctx, APP, "Discord.Discord", "discord").await,
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
    install_via(APP, &BrewCask::new(ctx.runner), "discord").await
}

pub async fn install_apt_family(ctx: &InstallContext<'_>) -> Result<()> {
    if ensure_snap(ctx).await? {
        return install_via(APP, &Snap::new(ctx.runner), "discord").await;
    }
    let snap = Snap::new(ctx.runner);
    Err(DevstrapError::prerequisite_missing(
        snap.name(),
        snap.remediation(),
    ))
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    match &ctx.platform {
        Platform::Macos => Ok(os::macos_app_installed(MACOS_BUNDLE)
            || BrewCask::new(ctx.runner).is_package_installed("discord").await?),
        p if p.is_apt_based() => Snap::new(ctx.runner).is_package_installed("discord").await,
        p if p.is_windows() => windows_pkg_installed(ctx, "Discord.Discord", "discord").await,
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_snap_install_happy_path() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .with(eq("command -v snap"))
            .returning(|_| Ok(CommandOutput::ok("/usr/bin/snap")));
        let mut probes = 0;
        runner
            .expect_run()
            .with(eq("snap list discord"))
            .times(2)
            .returning_st(move |_| {
                probes += 1;
                if probes == 1 {
                    Ok(CommandOutput::failed(1, ""))
                } else {
                    Ok(CommandOutput::ok("Name     Version  Rev\ndiscord  0.0.48   180\n"))
                }
            });
        runner
            .expect_run_long()
            .with(eq("sudo snap install discord"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let ctx = InstallContext::new(Platform::Ubuntu, &runner).assume_yes(true);
        install_apt_family(&ctx).await.unwrap();
    }
}
