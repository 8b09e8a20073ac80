use anyhow::Context;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use devstrap::commands;
use devstrap::configuration::DevstrapConfig;
use devstrap::exec::SystemRunner;
use devstrap::installs::InstallContext;
use devstrap::platform::Platform;
use devstrap::scripts;

/// Set up a development machine: install applications and run maintenance
/// scripts across macOS, Linux, and Windows.
#[derive(Parser)]
#[clap(author, version = clap::crate_version!(), max_term_width = 100, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Increase logging level (-v: info, -vv: debug, -vvv: trace)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Path to custom config file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install one or more applications
    Install {
        /// Application names (see `devstrap list`)
        apps: Vec<String>,

        /// Skip confirmation prompts
        #[clap(short, long)]
        yes: bool,
    },
    /// List known applications and whether they are installed
    List,
    /// Show the detected platform and desktop session
    Platform {
        /// Emit machine-readable JSON
        #[clap(long)]
        json: bool,
    },
    /// Search or clear the shell history
    #[clap(subcommand)]
    History(HistoryCommands),
    /// Delete dependency directories (node_modules by default) under a tree
    Cleanup {
        /// Root directory to scan
        #[clap(default_value = ".")]
        root: PathBuf,

        /// Directory name to hunt for (overrides the config)
        #[clap(short, long)]
        name: Option<String>,

        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
    /// Back up configured directories to the configured destination
    Backup,
    /// Kill stray debugger processes
    KillDebug {
        /// Substring to match against process command lines
        #[clap(default_value = scripts::procs::DEFAULT_PATTERN)]
        pattern: String,

        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Print history lines matching a pattern
    Search { pattern: String },
    /// Truncate the shell history file
    Clear {
        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
}

fn load_config(cli: &Cli) -> Result<DevstrapConfig, anyhow::Error> {
    match &cli.config {
        Some(path) => Ok(DevstrapConfig::load_from(path)?),
        None => Ok(DevstrapConfig::load_default()?),
    }
}

async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Completions must not mix with log output on stdout.
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "devstrap", &mut std::io::stdout());
        return Ok(());
    }

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    debug!("Argument parsing complete.");
    let platform = Platform::detect();
    let runner = SystemRunner::new();

    match &cli.command {
        Commands::Install { apps, yes } => {
            let ctx = InstallContext::new(platform, &runner).assume_yes(*yes);
            commands::install_command(apps, &ctx).await?;
        }
        Commands::List => {
            let ctx = InstallContext::new(platform, &runner);
            commands::list_command(&ctx).await?;
        }
        Commands::Platform { json } => {
            commands::platform_command(*json)?;
        }
        Commands::History(history_cmd) => {
            let config = load_config(&cli)?;
            match history_cmd {
                HistoryCommands::Search { pattern } => {
                    scripts::history::search(&runner, &platform, &config, pattern).await?;
                }
                HistoryCommands::Clear { yes } => {
                    scripts::history::clear(&platform, &config, *yes)?;
                }
            }
        }
        Commands::Cleanup { root, name, yes } => {
            let config = load_config(&cli)?;
            let name = name.as_deref().unwrap_or(&config.cleanup.name);
            scripts::cleanup::run(root, name, *yes)?;
        }
        Commands::Backup => {
            let config = load_config(&cli)?;
            scripts::backup::run(&runner, &platform, &config).await?;
        }
        Commands::KillDebug { pattern, yes } => {
            scripts::procs::run(&runner, &platform, pattern, *yes).await?;
        }
        Commands::Config => {
            let config = load_config(&cli)?;
            commands::config_command(&config)?;
        }
        Commands::Completions { .. } => {
            // Handled before logging init.
            unreachable!("Completions should be handled before this point");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
