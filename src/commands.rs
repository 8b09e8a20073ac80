//! Command implementations for the devstrap CLI.
//!
//! Thin orchestration over the installer and script modules: each function
//! maps to one subcommand and does argument validation, dispatch, and
//! user-facing output.

use anyhow::Context;
use colored::Colorize;
use tabular::{Row, Table};
use tracing::debug;

use crate::configuration::DevstrapConfig;
use crate::errors::{DevstrapError, Result};
use crate::installs::{app_installed, install_app, known_apps, InstallContext};
use crate::platform::{DesktopSession, Platform};

/// Install each requested application in order, aborting on the first
/// failure so a broken prerequisite is not reported nine times.
pub async fn install_command(apps: &[String], ctx: &InstallContext<'_>) -> Result<()> {
    if apps.is_empty() {
        return Err(DevstrapError::Config(anyhow::anyhow!(
            "No applications specified. Known applications: {}",
            known_app_names().join(", ")
        )));
    }

    for app in apps {
        debug!("devstrap install {}", app);
        if !install_app(app, ctx).await? {
            return Err(DevstrapError::Config(anyhow::anyhow!(
                "Unknown application '{}'. Known applications: {}",
                app,
                known_app_names().join(", ")
            )));
        }
    }
    Ok(())
}

/// Print a table of known applications and whether each is installed.
pub async fn list_command(ctx: &InstallContext<'_>) -> Result<()> {
    let mut table = Table::new("{:<} {:<}  {:<}");
    for app in known_apps() {
        let installed = app_installed(app.name, ctx).await.unwrap_or(false);
        let emoji = if installed { "✅" } else { "❌" };
        table.add_row(
            Row::new()
                .with_cell(emoji)
                .with_cell(app.name)
                .with_cell(app.summary),
        );
    }
    print!("{}", table);
    Ok(())
}

/// Report the detected platform and desktop session, optionally as JSON.
pub fn platform_command(json: bool) -> Result<()> {
    let platform = Platform::detect();
    let session = DesktopSession::detect();

    if json {
        let report = serde_json::json!({
            "platform": platform,
            "desktop_session": session,
        });
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to render platform report")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!("Platform: {}", platform.to_string().bold());
    println!("Display server: {:?}", session.display_server);
    if let Some(desktop) = &session.desktop {
        println!("Desktop: {}", desktop);
    }
    Ok(())
}

/// Print the effective configuration as YAML.
pub fn config_command(config: &DevstrapConfig) -> Result<()> {
    print!("{}", config.export()?);
    Ok(())
}

fn known_app_names() -> Vec<&'static str> {
    known_apps().iter().map(|app| app.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::MockShellRunner;

    #[tokio::test]
    async fn test_install_command_rejects_empty_list() {
        let runner = MockShellRunner::new();
        let ctx = InstallContext::new(Platform::Ubuntu, &runner);
        let err = install_command(&[], &ctx).await.unwrap_err();
        assert!(format!("{}", err).contains("No applications specified"));
    }

    #[tokio::test]
    async fn test_install_command_names_known_apps_on_unknown() {
        let runner = MockShellRunner::new();
        let ctx = InstallContext::new(Platform::Ubuntu, &runner);
        let err = install_command(&["emacs".to_string()], &ctx)
            .await
            .unwrap_err();
        let msg = format!("{}", err);
        assert!(msg.contains("Unknown application 'emacs'"));
        assert!(msg.contains("chromium"));
    }

    #[test]
    fn test_config_command_prints_defaults() {
        config_command(&DevstrapConfig::default()).unwrap();
    }
}
