//! External data feeds for the dashboard sections.
//!
//! One module per source. Sources are independent: each fetcher logs its
//! own failures and degrades to an empty value, so one dead endpoint never
//! takes a refresh down with it.

pub mod agenda;
pub mod briefing;
pub mod mail;
pub mod news;
pub mod weather;

use std::time::Duration;

use anyhow::{Context, Result};
use daydeck_core::deck_config::DeckConfig;

pub use agenda::Agenda;
pub use mail::MailBundle;
pub use news::NewsItem;
pub use weather::Weather;

/// One refresh cycle's worth of external data.
pub struct DashboardData {
    pub mail: MailBundle,
    pub news: Vec<NewsItem>,
    pub weather: Option<Weather>,
    pub agenda: Agenda,
}

/// The HTTP client shared by every fetcher and the remote store, so the
/// configured timeout applies uniformly.
pub fn client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch every configured source concurrently. Failures are handled per
/// source; the result is always a complete (if partly empty) snapshot.
pub async fn refresh_all(client: &reqwest::Client, config: &DeckConfig) -> DashboardData {
    let (mail, news, weather, agenda) = tokio::join!(
        mail::fetch(client, &config.mail),
        news::fetch(client, &config.news),
        weather::fetch(client, &config.weather),
        agenda::fetch(client, &config.calendar),
    );

    DashboardData {
        mail,
        news,
        weather,
        agenda,
    }
}
