mod cli;
mod commands;
mod feeds;
mod remote;
mod render;
mod watch;

use anyhow::Result;
use clap::Parser;
use daydeck_core::deck::Deck;

use cli::{AuthCommands, Cli, Commands, ConfigCommands, LayoutCommands, TaskCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose, cli.quiet)?;

    let mut deck = Deck::load()?;

    match cli.command {
        Commands::Unlock { pin } => commands::unlock::run(&deck, pin),
        Commands::Lock => commands::lock::run(&deck),
        Commands::Status { briefing } => {
            require_unlocked(&deck)?;
            commands::status::run(&deck, briefing).await
        }
        Commands::Watch { every } => {
            require_unlocked(&deck)?;
            commands::watch::run(deck, every).await
        }
        Commands::Task(command) => {
            require_unlocked(&deck)?;
            match command {
                TaskCommands::Add { text, list } => commands::task::add(&deck, text, &list).await,
                TaskCommands::Done { id } => commands::task::done(&deck, &id).await,
                TaskCommands::Rm { id } => commands::task::rm(&deck, &id).await,
                TaskCommands::List { list } => commands::task::list(&deck, list.as_deref()),
            }
        }
        Commands::Layout(command) => {
            require_unlocked(&deck)?;
            match command {
                LayoutCommands::Show => commands::layout::show(&deck),
                LayoutCommands::Move { section, onto } => {
                    commands::layout::mv(&deck, &section, &onto).await
                }
            }
        }
        Commands::Pull => {
            require_unlocked(&deck)?;
            commands::pull::run(&deck).await
        }
        Commands::Push => {
            require_unlocked(&deck)?;
            commands::push::run(&deck).await
        }
        Commands::Sync => {
            require_unlocked(&deck)?;
            commands::sync::run(&deck).await
        }
        Commands::Auth(command) => match command {
            AuthCommands::Google => commands::auth::google(&mut deck).await,
            AuthCommands::Status => commands::auth::status(&deck),
            AuthCommands::Disconnect => commands::auth::disconnect(&mut deck),
        },
        Commands::Config(command) => match command {
            ConfigCommands::Show => commands::config::show(&deck),
            ConfigCommands::Set { key, value } => commands::config::set(&mut deck, &key, &value),
        },
        Commands::Briefing => {
            require_unlocked(&deck)?;
            commands::briefing::run(&deck).await
        }
    }
}

fn require_unlocked(deck: &Deck) -> Result<()> {
    let store = deck.store()?;

    if !store.is_unlocked() {
        anyhow::bail!(
            "The dashboard is locked.\n\n\
            Unlock it with:\n  \
            daydeck unlock"
        );
    }

    Ok(())
}
