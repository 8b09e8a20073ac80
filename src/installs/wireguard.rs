//! WireGuard installer. A CLI tool rather than a GUI app: brew formula on
//! macOS, distro packages elsewhere.

use crate::errors::Result;
use crate::installs::{
    install_via, install_windows_pkg, report_unsupported, windows_pkg_installed, InstallContext,
};
use crate::managers::{Apt, Brew, Dnf, PackageManager};
use crate::platform::Platform;

const APP: &str = "WireGuard";

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    match &ctx.platform {
        Platform::Macos => install_via(APP, &Brew::new(ctx.runner), "wireguard-tools").await,
        p if p.is_apt_based() => install_via(APP, &Apt::new(ctx.runner), "wireguard").await,
        p if p.is_rpm_based() => {
            install_via(APP, &Dnf::new(ctx.runner), "wireguard-tools").await
        }
        p if p.is_windows() => {
            install_windows_pkg(ctx, APP, "WireGuard.WireGuard", "wireguard").await
        }
        other => {
            report_unsupported(APP, other);
            Ok(())
        }
    }
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    match &ctx.platform {
        Platform::Macos => Brew::new(ctx.runner).is_package_installed("wireguard-tools").await,
        p if p.is_apt_based() => Apt::new(ctx.runner).is_package_installed("wireguard").await,
        p if p.is_rpm_based() => {
            Dnf::new(ctx.runner).is_package_installed("wireguard-tools").await
        }
        p if p.is_windows() => {
            windows_pkg_installed(ctx, "WireGuard.WireGuard", "wireguard").await
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
    async fn test_apt_install_flow() {
        let mut runner = MockShellRunner::new();
        let mut probes = 0;
        runner
            .expect_run()
            .with(eq("dpkg-query -W -f='${Status}' wireguard"))
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
            .with(eq("sudo apt-get install -y wireguard"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let ctx = InstallContext::new(Platform::Ubuntu, &runner);
        install(&ctx).await.unwrap();
    }
}
