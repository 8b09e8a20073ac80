//! Bitwarden installer.

use crate::errors::{DevstrapError, Result};
use crate::installs::{
    ensure_snap, install_via, install_windows_pkg, report_unsupported, windows_pkg_installed,
    InstallContext,
};
use crate::managers::{BrewCask, PackageManager, Snap};
use crate::os;
use crate::platform::Platform;

const APP: &str = "Bitwarden";
const MACOS_BUNDLE: &str = "Bitwarden.app";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_macos(ctx).await,
        p if p.is_apt_based() => install_apt_family(ctx).await,
        p if p.is_windows() => {
            install_windows_pkg(ctx, APP, "Bitwarden.Bitwarden", "bitwarden").await
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
    install_via(APP, &BrewCask::new(ctx.runner), "bitwarden").await
}

pub async fn install_apt_family(ctx: &InstallContext<'_>) -> Result<()> {
    if ensure_snap(ctx).await? {
        return install_via(APP, &Snap::new(ctx.runner), "bitwarden").await;
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
            || BrewCask::new(ctx.runner).is_package_installed("bitwarden").await?),
        p if p.is_apt_based() => Snap::new(ctx.runner).is_package_installed("bitwarden").await,
        p if p.is_windows() => {
            windows_pkg_installed(ctx, "Bitwarden.Bitwarden", "bitwarden").await
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
    async fn test_missing_snap_and_apt_reports_prerequisite() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .with(eq("command -v snap"))
            .returning(|_| Ok(CommandOutput::failed(127, "")));
        runner
            .expect_run()
            .with(eq("command -v apt-get"))
            .returning(|_| Ok(CommandOutput::failed(127, "")));
        let ctx = InstallContext::new(Platform::Raspbian, &runner).assume_yes(true);
        let err = install_apt_family(&ctx).await.unwrap_err();
        assert_eq!(err.category(), "prerequisite_missing");
    }
}
