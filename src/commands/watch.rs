use std::time::Duration;

use anyhow::Result;
use daydeck_core::deck::Deck;
use owo_colors::OwoColorize;

pub async fn run(deck: Deck, every: Option<Duration>) -> Result<()> {
    let interval = every
        .map(|d| d.as_secs())
        .unwrap_or(deck.config().sync.poll_secs);

    println!(
        "{}",
        format!("Watching (refresh every {interval}s). Ctrl-C or `daydeck lock` to stop.").dimmed()
    );

    crate::watch::run(deck, every).await
}
