use anyhow::Result;
use daydeck_core::deck::Deck;
use owo_colors::OwoColorize;

pub fn run(deck: &Deck) -> Result<()> {
    let store = deck.store()?;

    if !store.is_unlocked() {
        println!("{}", "Already locked.".dimmed());
        return Ok(());
    }

    // Removing the marker also ends any running `daydeck watch`.
    store.set_unlocked(false)?;

    println!("{}", "Session terminated.".green());

    Ok(())
}
