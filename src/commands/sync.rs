use anyhow::Result;
use daydeck_core::deck::Deck;
use daydeck_core::state::Dashboard;
use owo_colors::OwoColorize;

use crate::render;

/// Pull then push. The remote copy wins whenever it exists, so the push
/// half mostly re-stamps `lastUpdated`; when the store is empty it seeds
/// the remote with the local state.
pub async fn run(deck: &Deck) -> Result<()> {
    let remote = super::remote_for(deck)?;
    if !remote.is_configured() {
        println!("{}", "No sync endpoint configured; local-only mode.".dimmed());
        return Ok(());
    }

    let store = deck.store()?;
    let mut dashboard = Dashboard::load(&store, deck.config().user_email.clone());

    let spinner = render::create_spinner("Syncing".to_string());

    let applied = match remote.pull().await {
        Some(envelope) => {
            dashboard.reconcile(envelope);
            dashboard.persist(&store)?;
            true
        }
        None => false,
    };

    remote.publish(&dashboard.envelope()).await;
    spinner.finish_and_clear();

    let tasks = dashboard.tasks().len();
    if applied {
        println!("{}", format!("Applied remote state ({tasks} tasks).").green());
    } else {
        println!("{}", "No remote state; keeping local state.".yellow());
    }
    println!("{}", format!("Pushed {tasks} tasks.").dimmed());

    Ok(())
}
