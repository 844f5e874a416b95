use anyhow::Result;
use daydeck_core::deck::Deck;
use daydeck_core::state::Dashboard;

use crate::feeds;
use crate::render;

pub async fn run(deck: &Deck, with_briefing: bool) -> Result<()> {
    let config = deck.config();
    let store = deck.store()?;
    let client = feeds::client(config.sync.timeout_secs)?;
    let remote = crate::remote::RemoteStore::new(client.clone(), &config.sync)?;

    let mut dashboard = Dashboard::load(&store, config.user_email.clone());

    let spinner = render::create_spinner("Refreshing".to_string());

    let (data, pulled) = tokio::join!(feeds::refresh_all(&client, config), remote.pull());

    // The briefing reuses the headlines from this refresh, so it has to
    // run after the join.
    let briefing = if with_briefing {
        Some(feeds::briefing::summarize(&client, &config.briefing, &data.news).await)
    } else {
        None
    };

    spinner.finish_and_clear();

    if let Some(envelope) = pulled {
        dashboard.reconcile(envelope);
        dashboard.persist(&store)?;
    }

    render::render_dashboard(&dashboard, &data, briefing.as_deref());

    Ok(())
}
