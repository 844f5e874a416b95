//! Command-line surface and logging setup.

use std::io::IsTerminal;
use std::time::Duration;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daydeck")]
#[command(about = "PIN-gated terminal day dashboard with best-effort cloud sync")]
#[command(version)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q errors only, -qq silent)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Unlock the dashboard with the access PIN
    Unlock {
        /// PIN to check; prompted for when omitted
        #[arg(long)]
        pin: Option<String>,
    },
    /// Lock the dashboard and end the session
    Lock,
    /// Render a one-shot dashboard snapshot
    Status {
        /// Include the AI morning briefing
        #[arg(long)]
        briefing: bool,
    },
    /// Keep refreshing the dashboard until locked or interrupted
    Watch {
        /// Refresh interval (e.g. "90s", "2m"); defaults to sync.poll_secs
        #[arg(long, value_parser = humantime::parse_duration)]
        every: Option<Duration>,
    },
    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommands),
    /// Show or rearrange dashboard sections
    #[command(subcommand)]
    Layout(LayoutCommands),
    /// Fetch remote state and apply it locally
    Pull,
    /// Publish local state to the remote store
    Push,
    /// Pull, apply, then publish
    Sync,
    /// Connect external accounts
    #[command(subcommand)]
    Auth(AuthCommands),
    /// Show or edit the configuration
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Print the AI morning briefing
    Briefing,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        text: String,

        /// Which list: today, checklist or yesterday
        #[arg(long, default_value = "today")]
        list: String,
    },
    /// Toggle a task's completed flag (id prefixes are fine)
    Done { id: String },
    /// Remove a task (id prefixes are fine)
    Rm { id: String },
    /// List tasks
    List {
        /// Only this list: today, checklist or yesterday
        #[arg(long)]
        list: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LayoutCommands {
    /// Print the current section arrangement
    Show,
    /// Move a section onto another section's position in the same slot
    Move {
        /// Section to move (e.g. "news")
        section: String,

        /// Section whose position it takes
        #[arg(long)]
        onto: String,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Connect a Google account for the agenda section
    Google,
    /// Show which account is connected
    Status,
    /// Remove the stored Google session
    Disconnect,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file path and current contents
    Show,
    /// Set a config value (e.g. `daydeck config set sync.endpoint https://...`)
    Set { key: String, value: String },
}

/// Map -v/-q counts to a default filter, overridable via RUST_LOG.
/// Diagnostics go to stderr; stdout belongs to the dashboard.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "off"
    } else if quiet == 1 {
        "error"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    Ok(())
}
