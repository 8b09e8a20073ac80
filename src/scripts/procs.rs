//! Find and kill stray debugger processes.
//!
//! Replaces the `killdebug` alias that hunted down orphaned `--inspect`
//! node processes. Listing goes through ps on Unix and CIM on Windows;
//! killing uses kill -9 / taskkill /F.

use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use tracing::debug;

use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::platform::Platform;

/// Default pattern: node debug listeners.
pub const DEFAULT_PATTERN: &str = "--inspect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub command: String,
}

/// Parse `pid command...` lines as produced by `ps -eo pid,command` or the
/// Windows listing. Header lines and unparseable rows are skipped.
pub fn parse_process_list(output: &str) -> Vec<ProcessInfo> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim_start();
            let (pid_str, rest) = line.split_once(char::is_whitespace)?;
            let pid = pid_str.parse().ok()?;
            Some(ProcessInfo {
                pid,
                command: rest.trim().to_string(),
            })
        })
        .collect()
}

/// Processes whose command line contains `pattern`, excluding ourselves and
/// anything that is just the search machinery echoing the pattern back.
pub fn matching(processes: Vec<ProcessInfo>, pattern: &str, own_pid: u32) -> Vec<ProcessInfo> {
    processes
        .into_iter()
        .filter(|p| p.pid != own_pid && p.command.contains(pattern))
        .collect()
}

fn list_command(platform: &Platform) -> &'static str {
    if platform.is_windows() {
        // same "pid command" shape as the ps output
        "Get-CimInstance Win32_Process | ForEach-Object { \"$($_.ProcessId) $($_.CommandLine)\" }"
    } else {
        "ps -eo pid,command"
    }
}

fn kill_command(platform: &Platform, pid: u32) -> String {
    if platform.is_windows() {
        format!("taskkill /F /PID {}", pid)
    } else {
        format!("kill -9 {}", pid)
    }
}

pub async fn find(
    runner: &dyn ShellRunner,
    platform: &Platform,
    pattern: &str,
) -> Result<Vec<ProcessInfo>> {
    let cmd = list_command(platform);
    let out = runner.run(cmd).await?;
    if !out.success() {
        return Err(crate::errors::DevstrapError::command_failed(
            cmd, out.code, out.stdout, out.stderr,
        ));
    }
    let own_pid = std::process::id();
    Ok(matching(parse_process_list(&out.stdout), pattern, own_pid))
}

pub async fn run(
    runner: &dyn ShellRunner,
    platform: &Platform,
    pattern: &str,
    assume_yes: bool,
) -> Result<()> {
    let found = find(runner, platform, pattern).await?;
    if found.is_empty() {
        println!("No processes matching '{}' found.", pattern);
        return Ok(());
    }

    for proc in &found {
        println!("  {:>7}  {}", proc.pid, proc.command);
    }

    if !assume_yes {
        let agreed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Kill {} processes?", found.len()))
            .default(false)
            .interact()
            .unwrap_or(false);
        if !agreed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut killed = 0usize;
    for proc in &found {
        let cmd = kill_command(platform, proc.pid);
        debug!("Killing pid {} with '{}'", proc.pid, cmd);
        let out = runner.run(&cmd).await?;
        if out.success() {
            killed += 1;
        } else {
            // the process may have exited between listing and killing
            println!("Could not kill pid {}: {}", proc.pid, out.stderr.trim());
        }
    }
    println!("{}", format!("Killed {} processes.", killed).green());
    Ok(())
}
