//! Today's agenda from the connected Google account.

use daydeck_core::deck_config::CalendarConfig;
use daydeck_google::{CalendarEvent, NeedsReauth, list_today};
use tracing::warn;

/// What the agenda section has to work with this cycle.
pub enum Agenda {
    /// Events from the connected account (possibly none today).
    Events(Vec<CalendarEvent>),
    /// No account connected; only the public embed link is available.
    EmbedOnly(String),
    /// The stored session is beyond refresh; the account must reconnect.
    NeedsReauth(String),
    /// Fetch failed this cycle (network, API error).
    Unavailable,
    NotConfigured,
}

pub async fn fetch(client: &reqwest::Client, config: &CalendarConfig) -> Agenda {
    let Some(account) = &config.account else {
        return match &config.embed_url {
            Some(url) => Agenda::EmbedOnly(url.clone()),
            None => Agenda::NotConfigured,
        };
    };

    match list_today(client, account).await {
        Ok(events) => Agenda::Events(events),
        Err(err) if err.is::<NeedsReauth>() => Agenda::NeedsReauth(account.clone()),
        Err(err) => {
            warn!(account = %account, %err, "agenda fetch failed");
            Agenda::Unavailable
        }
    }
}
