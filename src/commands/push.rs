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
    let dashboard = Dashboard::load(&store, deck.config().user_email.clone());
    let envelope = dashboard.envelope();

    let spinner = render::create_spinner("Pushing local state".to_string());
    remote.publish(&envelope).await;
    spinner.finish_and_clear();

    // Publishing is fire-and-forget; delivery problems land in the log.
    println!(
        "{}",
        format!("Pushed current state ({} tasks).", envelope.tasks.len()).green()
    );

    Ok(())
}
