//! Host platform classification.
//!
//! Every installer picks its code path from the [`Platform`] detected here.
//! Detection is recomputed on each invocation and never shells out: it reads
//! compile-time target info, environment variables, and `/etc/os-release`.

use std::env;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use tracing::{debug, trace};

#[derive(Serialize_enum_str, Deserialize_enum_str, Debug, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Macos,
    Ubuntu,
    Debian,
    Raspbian,
    AmazonLinux,
    Rhel,
    Fedora,
    Windows,
    Wsl,
    Gitbash,
    Cmd,
    Powershell,
    #[serde(other)]
    Unknown(String),
}

impl Platform {
    /// True for platforms that use APT as their native package manager.
    pub fn is_apt_based(&self) -> bool {
        matches!(self, Platform::Ubuntu | Platform::Debian | Platform::Raspbian)
    }

    /// True for platforms that use DNF/YUM as their native package manager.
    pub fn is_rpm_based(&self) -> bool {
        matches!(
            self,
            Platform::AmazonLinux | Platform::Rhel | Platform::Fedora
        )
    }

    /// True for Windows proper and the shell-context refinements of it.
    /// WSL is not included: it behaves as its Linux distribution.
    pub fn is_windows(&self) -> bool {
        matches!(
            self,
            Platform::Windows | Platform::Gitbash | Platform::Cmd | Platform::Powershell
        )
    }

    /// Detect the current platform.
    pub fn detect() -> Self {
        let platform = detect_from(
            &|name| env::var(name).ok(),
            std::env::consts::OS,
            read_os_release().as_deref(),
            read_proc_version().as_deref(),
        );
        debug!("Detected platform: {}", platform);
        platform
    }
}

/// Pure classification, parameterized for tests.
///
/// `env` looks up environment variables, `os` is `std::env::consts::OS`,
/// `os_release` is the contents of `/etc/os-release` if readable, and
/// `proc_version` is the contents of `/proc/version` if readable.
pub fn detect_from(
    env: &dyn Fn(&str) -> Option<String>,
    os: &str,
    os_release: Option<&str>,
    proc_version: Option<&str>,
) -> Platform {
    match os {
        "macos" => Platform::Macos,
        "windows" => classify_windows_shell(env),
        "linux" => {
            // WSL presents as Linux but is worth distinguishing: some GUI
            // installs behave differently under it.
            if env("WSL_DISTRO_NAME").is_some()
                || proc_version
                    .map(|v| v.to_lowercase().contains("microsoft"))
                    .unwrap_or(false)
            {
                return Platform::Wsl;
            }
            match os_release {
                Some(contents) => classify_os_release(contents),
                None => Platform::Unknown("linux".to_string()),
            }
        }
        other => Platform::Unknown(other.to_string()),
    }
}

/// Refine a Windows host into the shell context it was launched from.
///
/// These are heuristics: MSYSTEM is set by Git Bash / MSYS2 shells, PROMPT
/// by cmd.exe. Plain `Windows` is the umbrella when neither is present.
fn classify_windows_shell(env: &dyn Fn(&str) -> Option<String>) -> Platform {
    if let Some(msystem) = env("MSYSTEM") {
        trace!("MSYSTEM={}", msystem);
        return Platform::Gitbash;
    }
    if env("PSExecutionPolicyPreference").is_some()
        || env("POWERSHELL_DISTRIBUTION_CHANNEL").is_some()
    {
        return Platform::Powershell;
    }
    if env("PROMPT").is_some() {
        return Platform::Cmd;
    }
    Platform::Windows
}

/// Classify a Linux distribution from `/etc/os-release` contents.
pub fn classify_os_release(contents: &str) -> Platform {
    let id = os_release_field(contents, "ID").unwrap_or_default();
    let id_like = os_release_field(contents, "ID_LIKE").unwrap_or_default();

    match id.as_str() {
        "ubuntu" => Platform::Ubuntu,
        "raspbian" => Platform::Raspbian,
        "debian" => Platform::Debian,
        "amzn" => Platform::AmazonLinux,
        "rhel" | "centos" | "rocky" | "almalinux" => Platform::Rhel,
        "fedora" => Platform::Fedora,
        _ => {
            // Derivative distros declare their ancestry in ID_LIKE.
            let like: Vec<&str> = id_like.split_whitespace().collect();
            if like.contains(&"ubuntu") {
                Platform::Ubuntu
            } else if like.contains(&"debian") {
                Platform::Debian
            } else if like.contains(&"fedora") {
                Platform::Fedora
            } else if like.contains(&"rhel") || like.contains(&"centos") {
                Platform::Rhel
            } else {
                Platform::Unknown(id)
            }
        }
    }
}

/// Extract a field value from os-release format, stripping quotes.
fn os_release_field(contents: &str, field: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.trim();
        let value = line.strip_prefix(field)?.strip_prefix('=')?;
        Some(value.trim_matches('"').trim_matches('\'').to_string())
    })
}

fn read_os_release() -> Option<String> {
    fs::read_to_string("/etc/os-release").ok()
}

fn read_proc_version() -> Option<String> {
    fs::read_to_string("/proc/version").ok()
}

/// The display server a Linux desktop session is running under.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DisplayServer {
    X11,
    Wayland,
    /// No graphical session (headless, SSH, container).
    None,
}

/// A snapshot of the desktop session, for installers that care whether a
/// GUI is available (and which display server it speaks).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DesktopSession {
    pub display_server: DisplayServer,
    pub desktop: Option<String>,
}

impl DesktopSession {
    pub fn detect() -> Self {
        Self::detect_from(&|name| env::var(name).ok())
    }

    pub fn detect_from(env: &dyn Fn(&str) -> Option<String>) -> Self {
        let display_server = if env("WAYLAND_DISPLAY").is_some() {
            DisplayServer::Wayland
        } else {
            match env("XDG_SESSION_TYPE").as_deref() {
                Some("wayland") => DisplayServer::Wayland,
                Some("x11") => DisplayServer::X11,
                _ => {
                    if env("DISPLAY").is_some() {
                        DisplayServer::X11
                    } else {
                        DisplayServer::None
                    }
                }
            }
        };
        DesktopSession {
            display_server,
            desktop: env("XDG_CURRENT_DESKTOP"),
        }
    }
}
