//! Git installer.

use crate::errors::Result;
use crate::installs::{
    install_via, install_windows_pkg, report_unsupported, windows_pkg_installed, InstallContext,
};
use crate::managers::{Apt, Brew, Dnf, PackageManager};
use crate::platform::Platform;

const APP: &str = "Git";

async fn git_on_path(ctx: &InstallContext<'_>) -> bool {
    ctx.runner
        .run("command -v git")
        .await
        .map(|out| out.success())
        .unwrap_or(false)
}

pub async fn install(ctx: &InstallContext<'_>) -> Result<()> {
    // git may be present without any package manager knowing about it
    // (Xcode command line tools, source builds).
    if !ctx.platform.is_windows() && git_on_path(ctx).await {
        println!("{} is already installed.", APP);
        return Ok(());
    }
    match &ctx.platform {
        Platform::Macos => install_via(APP, &Brew::new(ctx.runner), "git").await,
        p if p.is_apt_based() => install_via(APP, &Apt::new(ctx.runner), "git").await,
        p if p.is_rpm_based() => install_via(APP, &Dnf::new(ctx.runner), "git").await,
        p if p.is_windows() => install_windows_pkg(ctx, APP, "Git.Git", "git").await,
        other => {
            report_unsupported(APP, other);
            Ok(())
        }
    }
}

pub async fn is_installed(ctx: &InstallContext<'_>) -> Result<bool> {
    if !ctx.platform.is_windows() {
        return Ok(git_on_path(ctx).await);
    }
    windows_pkg_installed(ctx, "Git.Git", "git").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockShellRunner};
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_existing_git_short_circuits_everything() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .with(eq("command -v git"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("/usr/bin/git")));
        let ctx = InstallContext::new(Platform::Fedora, &runner);
        install(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_dnf_install_when_absent() {
        let mut runner = MockShellRunner::new();
        runner
            .expect_run()
            .with(eq("command -v git"))
            .returning(|_| Ok(CommandOutput::failed(127, "")));
        let mut probes = 0;
        runner
            .expect_run()
            .with(eq("rpm -q git"))
            .times(2)
            .returning_st(move |_| {
                probes += 1;
                if probes == 1 {
                    Ok(CommandOutput::failed(1, "package git is not installed"))
                } else {
                    Ok(CommandOutput::ok("git-2.44.0-1.fc40.x86_64"))
                }
            });
        runner
            .expect_run()
            .with(eq("command -v dnf"))
            .returning(|_| Ok(CommandOutput::ok("/usr/bin/dnf")));
        runner
            .expect_run_long()
            .with(eq("sudo dnf install -y git"))
            .times(1)
            .returning(|_| Ok(CommandOutput::ok("")));

        let ctx = InstallContext::new(Platform::Fedora, &runner);
        install(&ctx).await.unwrap();
    }
}
