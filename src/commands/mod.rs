//! Command implementations, one module per subcommand.

pub mod auth;
pub mod briefing;
pub mod config;
pub mod layout;
pub mod lock;
pub mod pull;
pub mod push;
pub mod status;
pub mod sync;
pub mod task;
pub mod unlock;
pub mod watch;

use anyhow::Result;
use daydeck_core::deck::Deck;
use daydeck_core::state::Dashboard;
use daydeck_core::store::LocalStore;

use crate::feeds;
use crate::remote::RemoteStore;
use crate::render;

/// Remote client wired to the config, sharing the feed HTTP client so the
/// configured timeout applies everywhere.
pub(crate) fn remote_for(deck: &Deck) -> Result<RemoteStore> {
    let client = feeds::client(deck.config().sync.timeout_secs)?;
    RemoteStore::new(client, &deck.config().sync)
}

/// Persist locally, then publish best-effort. Every accepted mutation goes
/// through here as one logical unit; a dead remote never blocks the edit.
pub(crate) async fn persist_and_publish(
    dashboard: &Dashboard,
    store: &LocalStore,
    remote: &RemoteStore,
) -> Result<()> {
    dashboard.persist(store)?;

    if remote.is_configured() {
        let spinner = render::create_spinner("Syncing".to_string());
        remote.publish(&dashboard.envelope()).await;
        spinner.finish_and_clear();
    }

    Ok(())
}
