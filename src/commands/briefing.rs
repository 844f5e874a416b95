use anyhow::Result;
use daydeck_core::deck::Deck;

use crate::feeds;
use crate::render;

pub async fn run(deck: &Deck) -> Result<()> {
    let config = deck.config();
    let client = feeds::client(config.sync.timeout_secs)?;

    let spinner = render::create_spinner("Preparing briefing".to_string());
    let headlines = feeds::news::fetch(&client, &config.news).await;
    let summary = feeds::briefing::summarize(&client, &config.briefing, &headlines).await;
    spinner.finish_and_clear();

    println!("{summary}");

    Ok(())
}
