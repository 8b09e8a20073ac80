//! Firefox installer. Ubuntu ships Firefox as a snap; Debian and Raspbian
//! carry the ESR build in APT.

use crate::errors::{DevstrapError, Result};
use crate::installs::{
    ensure_snap, install_via, install_windows_pkg, report_unsupported, windows_pkg_installed,
    InstallContext,
};
use crate::managers::{Apt, BrewCask, Dnf, PackageManager, Snap};
use crate::os;
use crate::platform::Platform;

const APP: &str = "Firefox";
const MACOS_BUNDLE: &str = "Firefox.app";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_macos(ctx).await,
        Platform::Ubuntu => install_ubuntu(ctx).await,
        Platform::Debian | Platform::Raspbian => {
            install_via(APP, &Apt::new(ctx.runner), "firefox-esr").await
        }
        p if p.is_rpm_based() => install_via(APP, &Dnf::new(ctx.runner), "firefox").await,
        p if p.is_windows() => install_windows_pkg(ctx, APP, "Mozilla.Firefox", "firefox").await,
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
    install_via(APP, &BrewCask::new(ctx.runner), "firefox").await
}

pub async fn install_ubuntu(ctx: &InstallContext<'_>) -> Result<()> {
    if ensure_snap(ctx).await? {
        return install_via(APP, &Snap::new(ctx.runner), "firefox").await;
    }
    let apt = Apt::new(ctx.runner);
    if apt.is_installed().await {
        return install_via(APP, &apt, "firefox").await;
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
            || BrewCask::new(ctx.runner).is_package_installed("firefox").await?),
        Platform::Ubuntu => Snap::new(ctx.runner).is_package_installed("firefox").await,
        Platform::Debian | Platform::Raspbian => {
            Apt::new(ctx.runner).is_package_installed("firefox-esr").await
        }
        p if p.is_rpm_based() => Dnf::new(ctx.runner).is_package_installed("firefox").await,
        p if p.is_windows() => windows_pkg_installed(ctx, "Mozilla.Firefox", "firefox").await,
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_debian_uses_esr_package() {
        let mut runner = MockShellRunner::new();
        let mut probes = 0;
        runner
            .expect_run()
            .with(eq("dpkg-query -W -f='${Status}' firefox-esr"))
            .times(2)
            .returning_st(move |_| {
                probes += 1;
                if probes == 1 {
                    Ok(CommandOutput::failed(1, ""))
                } else {
                    Ok(CommandOutput::ok("install ok installed"))
                }
            });
        runner
            .expect_run()
            .with(eq("command -v apt-get"))
            .returning(|_| Ok(CommandOutput::ok("/usr/bin/apt-get")));
        runner
            .expect_run_long()
            .with(eq("sudo apt-get install -y firefox-esr"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let ctx = InstallContext::new(Platform::Debian, &runner);
        install(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_unsupported_platform_is_ok() {
        let runner = MockShellRunner::new();
        let ctx = InstallContext::new(Platform::Unknown("haiku".to_string()), &runner);
        install(&ctx).await.unwrap();
    }
}
