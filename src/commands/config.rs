use anyhow::{Context, Result};
use daydeck_core::deck::Deck;
use daydeck_core::deck_config::DeckConfig;
use owo_colors::OwoColorize;

pub fn show(deck: &Deck) -> Result<()> {
    let config_path = DeckConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:    {}", config_path.display());
    println!("  Data:      {}", deck.data_path()?.display());
    println!(
        "  Google:    {}",
        daydeck_google::app_config::base_dir()?.display()
    );

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    println!();
    println!("{}", "Settings".bold());
    print!("{contents}");

    Ok(())
}

pub fn set(deck: &mut Deck, key: &str, value: &str) -> Result<()> {
    deck.config_mut().set(key, value)?;
    deck.config_mut().save()?;

    if value.is_empty() {
        println!("{}", format!("Cleared {key}.").green());
    } else {
        println!("{}", format!("Set {key} = {value}").green());
    }

    Ok(())
}
