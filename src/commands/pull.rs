use anyhow::Result;
use daydeck_core::deck::Deck;
use daydeck_core::state::Dashboard;
use owo_colors::OwoColorize;

use crate::render;

pub async fn run(deck: &Deck) -> Result<()> {
    let remote = super::remote_for(deck)?;
    if !remote.is_configured() {
        println!("{}", "No sync endpoint configured; local-only mode.".dimmed());
        return Ok(());
    }

    let store = deck.store()?;
    let mut dashboard = Dashboard::load(&store, deck.config().user_email.clone());

    let spinner = render::create_spinner("Pulling remote state".to_string());
    let pulled = remote.pull().await;
    spinner.finish_and_clear();

    match pulled {
        Some(envelope) => {
            let tasks = envelope.tasks.len();
            dashboard.reconcile(envelope);
            dashboard.persist(&store)?;
            println!("{}", format!("Applied remote state ({tasks} tasks).").green());
        }
        None => {
            println!("{}", "No remote state available; local state kept.".yellow());
        }
    }

    Ok(())
}
