use anyhow::{Context, Result};
use daydeck_core::deck::Deck;
use owo_colors::OwoColorize;

pub fn run(deck: &Deck, pin: Option<String>) -> Result<()> {
    let store = deck.store()?;

    if store.is_unlocked() {
        println!("{}", "Already unlocked.".dimmed());
        return Ok(());
    }

    let entered = match pin {
        Some(pin) => pin,
        None => rpassword::prompt_password("PIN: ").context("Failed to read PIN")?,
    };

    if entered != deck.config().pin {
        anyhow::bail!("Security violation: Incorrect PIN");
    }

    store.set_unlocked(true)?;

    println!("{}", "Dashboard unlocked.".green());
    println!(
        "{}",
        "Run `daydeck status` for a snapshot, or `daydeck watch` to stay live.".dimmed()
    );

    Ok(())
}
