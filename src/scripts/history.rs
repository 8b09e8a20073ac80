//! Shell history search and clear.
//!
//! Replaces the `h <pattern>` and `hclear` aliases. Search shells out to
//! grep (Select-String on Windows) against the resolved history file;
//! clear truncates it after confirmation.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::debug;

use crate::configuration::DevstrapConfig;
use crate::errors::Result;
use crate::exec::{quote, ShellRunner};
use crate::platform::Platform;

/// Resolve the shell history file for this platform.
///
/// Order: config override, `HISTFILE`, then well-known defaults. Windows
/// PowerShell keeps its history in PSReadLine's ConsoleHost_history.txt
/// under APPDATA.
pub fn resolve_history_file(
    env: &dyn Fn(&str) -> Option<String>,
    home: &PathBuf,
    platform: &Platform,
    config: &DevstrapConfig,
) -> Option<PathBuf> {
    if let Some(file) = &config.history.file {
        return Some(file.clone());
    }

    if platform.is_windows() {
        return env("APPDATA").map(|appdata| {
            PathBuf::from(appdata)
                .join("Microsoft")
                .join("Windows")
                .join("PowerShell")
                .join("PSReadLine")
                .join("ConsoleHost_history.txt")
        });
    }

    if let Some(histfile) = env("HISTFILE") {
        return Some(PathBuf::from(histfile));
    }
    for candidate in [".bash_history", ".zsh_history"] {
        let path = home.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }
    // bash's default even when the file doesn't exist yet
    Some(home.join(".bash_history"))
}

fn history_file(platform: &Platform, config: &DevstrapConfig) -> Result<PathBuf> {
    let home = crate::os::home_dir()?;
    resolve_history_file(&|name| std::env::var(name).ok(), &home, platform, config).ok_or_else(
        || {
            crate::errors::DevstrapError::Config(anyhow::anyhow!(
                "could not determine a shell history file; set history.file in the config"
            ))
        },
    )
}

pub async fn search(
    runner: &dyn ShellRunner,
    platform: &Platform,
    config: &DevstrapConfig,
    pattern: &str,
) -> Result<()> {
    let file = history_file(platform, config)?;
    if !file.exists() {
        println!("No history file found at {}.", file.display());
        return Ok(());
    }
    debug!("Searching {} for '{}'", file.display(), pattern);

    let cmd = if platform.is_windows() {
        format!(
            "Select-String -Pattern {} -Path '{}' | ForEach-Object {{ $_.Line }}",
            quote(pattern),
            file.display()
        )
    } else {
        format!(
            "grep -n -- {} {}",
            quote(pattern),
            quote(&file.display().to_string())
        )
    };

    let out = runner.run(&cmd).await?;
    // grep exits 1 for "no matches", which is not a failure here
    if out.code > 1 {
        return Err(crate::errors::DevstrapError::command_failed(
            &cmd, out.code, out.stdout, out.stderr,
        ));
    }
    if out.stdout.trim().is_empty() {
        println!("No history entries match '{}'.", pattern);
    } else {
        print!("{}", out.stdout);
    }
    Ok(())
}

pub fn clear(platform: &Platform, config: &DevstrapConfig, assume_yes: bool) -> Result<()> {
    let file = history_file(platform, config)?;
    if !file.exists() {
        println!("No history file found at {}; nothing to clear.", file.display());
        return Ok(());
    }

    if !assume_yes {
        let agreed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Clear shell history in {}?", file.display()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !agreed {
            println!("Aborted.");
            return Ok(());
        }
    }

    fs::write(&file, "")?;
    println!("{}", format!("History cleared ({}).", file.display()).green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_override_wins() {
        let mut config = DevstrapConfig::default();
        config.history.file = Some(PathBuf::from("/tmp/custom_history"));
        let env = env_of(&[("HISTFILE", "/home/me/.bash_history")]);
        let resolved = resolve_history_file(
            &env,
            &PathBuf::from("/home/me"),
            &Platform::Ubuntu,
            &config,
        );
        assert_eq!(resolved, Some(PathBuf::from("/tmp/custom_history")));
    }

    #[test]
    fn test_histfile_env_respected() {
        let env = env_of(&[("HISTFILE", "/home/me/.custom_history")]);
        let resolved = resolve_history_file(
            &env,
            &PathBuf::from("/home/me"),
            &Platform::Macos,
            &DevstrapConfig::default(),
        );
        assert_eq!(resolved, Some(PathBuf::from("/home/me/.custom_history")));
    }

    #[test]
    fn test_windows_uses_psreadline_path() {
        let env = env_of(&[("APPDATA", "C:\\Users\\me\\AppData\\Roaming")]);
        let resolved = resolve_history_file(
            &env,
            &PathBuf::from("C:\\Users\\me"),
            &Platform::Powershell,
            &DevstrapConfig::default(),
        )
        .unwrap();
        assert!(resolved.ends_with("ConsoleHost_history.txt"));
    }

    #[test]
    fn test_fallback_to_bash_history() {
        let env = env_of(&[]);
        let resolved = resolve_history_file(
            &env,
            &PathBuf::from("/nonexistent-home"),
            &Platform::Debian,
            &DevstrapConfig::default(),
        );
        assert_eq!(
            resolved,
            Some(PathBuf::from("/nonexistent-home/.bash_history"))
        );
    }
}
