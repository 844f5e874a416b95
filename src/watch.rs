//! The watch loop: periodic full refreshes until locked or interrupted.
//!
//! Every tick spawns a refresh cycle tagged with a generation number.
//! Cycles overlap whenever a fetch outlives the interval, and they can
//! finish out of order; the gate makes sure only the newest cycle ever
//! repaints, and nothing repaints after the loop has ended.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use daydeck_core::SyncEnvelope;
use daydeck_core::deck::Deck;
use daydeck_core::deck_config::DeckConfig;
use daydeck_core::state::Dashboard;
use daydeck_core::store::LocalStore;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::feeds;
use crate::remote::RemoteStore;
use crate::render;

/// Admits a cycle only if nothing newer has applied yet.
#[derive(Default)]
struct CycleGate {
    applied: u64,
}

impl CycleGate {
    fn try_apply(&mut self, generation: u64) -> bool {
        if generation <= self.applied {
            return false;
        }
        self.applied = generation;
        true
    }
}

struct WatchState {
    dashboard: Dashboard,
    gate: CycleGate,
}

struct WatchContext {
    config: DeckConfig,
    store: LocalStore,
    client: reqwest::Client,
    remote: RemoteStore,
    state: Mutex<WatchState>,
    stopping: AtomicBool,
}

pub async fn run(deck: Deck, every: Option<Duration>) -> Result<()> {
    let config = deck.config().clone();
    let store = deck.store()?;
    let client = feeds::client(config.sync.timeout_secs)?;
    let remote = RemoteStore::new(client.clone(), &config.sync)?;

    let interval = every.unwrap_or(Duration::from_secs(config.sync.poll_secs));
    let dashboard = Dashboard::load(&store, config.user_email.clone());

    let ctx = Arc::new(WatchContext {
        config,
        store,
        client,
        remote,
        state: Mutex::new(WatchState {
            dashboard,
            gate: CycleGate::default(),
        }),
        stopping: AtomicBool::new(false),
    });

    let generations = AtomicU64::new(0);

    // Delay instead of bursting so a machine waking from sleep gets one
    // catch-up refresh, not a backlog of them.
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_tick: Option<DateTime<Utc>> = None;

    // The first tick completes immediately: that is the on-start refresh.
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // `daydeck lock` from another terminal ends the session.
                if !ctx.store.is_unlocked() {
                    println!("\nDashboard locked. Ending watch.");
                    break;
                }

                let now = Utc::now();
                if let Some(previous) = last_tick {
                    let jumped = (now - previous)
                        .to_std()
                        .map(|gap| gap > interval * 2)
                        .unwrap_or(false);
                    if jumped {
                        info!("wall clock jumped, refreshing after resume");
                    }
                }
                last_tick = Some(now);

                let generation = generations.fetch_add(1, Ordering::SeqCst) + 1;
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move { run_cycle(ctx, generation).await });
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nEnding watch.");
                break;
            }
        }
    }

    // In-flight cycles must not repaint once the loop is done.
    ctx.stopping.store(true, Ordering::SeqCst);

    Ok(())
}

async fn run_cycle(ctx: Arc<WatchContext>, generation: u64) {
    let (data, pulled) = tokio::join!(
        feeds::refresh_all(&ctx.client, &ctx.config),
        ctx.remote.pull(),
    );

    let mut state = ctx.state.lock().await;

    if ctx.stopping.load(Ordering::SeqCst) {
        return;
    }

    if !apply_cycle(&mut state, &ctx.store, generation, pulled) {
        return;
    }

    print!("\x1b[2J\x1b[H");
    render::render_dashboard(&state.dashboard, &data, None);
}

/// Land one finished cycle. Stale cycles are discarded wholesale; a pulled
/// envelope replaces local state (remote-wins) and is re-persisted so the
/// local cache mirrors the remote snapshot; a failed pull changes nothing.
/// Returns whether the cycle may repaint.
fn apply_cycle(
    state: &mut WatchState,
    store: &LocalStore,
    generation: u64,
    pulled: Option<SyncEnvelope>,
) -> bool {
    if !state.gate.try_apply(generation) {
        debug!(generation, "discarding stale refresh cycle");
        return false;
    }

    if let Some(envelope) = pulled {
        state.dashboard.reconcile(envelope);
        if let Err(err) = state.dashboard.persist(store) {
            warn!(%err, "could not persist pulled state");
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use daydeck_core::{Layout, SectionId, Slot, Task, TaskKind};

    // --- cycle gate ---

    #[test]
    fn newer_generations_apply_in_order() {
        let mut gate = CycleGate::default();
        assert!(gate.try_apply(1));
        assert!(gate.try_apply(2));
        assert!(gate.try_apply(3));
    }

    #[test]
    fn stale_cycles_are_discarded() {
        let mut gate = CycleGate::default();
        assert!(gate.try_apply(3));

        // Older cycles finishing late must not repaint.
        assert!(!gate.try_apply(1));
        assert!(!gate.try_apply(2));
        // Replays of the applied generation are stale too.
        assert!(!gate.try_apply(3));

        assert!(gate.try_apply(4));
    }

    // --- apply_cycle ---

    fn watch_state(store: &LocalStore) -> WatchState {
        WatchState {
            dashboard: Dashboard::load(store, None),
            gate: CycleGate::default(),
        }
    }

    fn remote_envelope() -> SyncEnvelope {
        let mut layout = Layout::default();
        layout.reorder(Slot::Left, SectionId::News, SectionId::Tasks);
        SyncEnvelope::new(
            vec![Task::new("Remote task", TaskKind::Checklist)],
            layout,
            None,
        )
    }

    #[test]
    fn failed_pull_leaves_state_as_it_was() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let mut state = watch_state(&store);
        state.dashboard.add_task("Local edit", TaskKind::Today);
        state.dashboard.persist(&store).unwrap();
        let before = state.dashboard.tasks().to_vec();

        assert!(apply_cycle(&mut state, &store, 1, None));

        assert_eq!(state.dashboard.tasks(), before.as_slice());
        assert_eq!(store.load().tasks, before);
    }

    #[test]
    fn pulled_envelope_replaces_state_and_local_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let mut state = watch_state(&store);
        state.dashboard.add_task("Unpushed local edit", TaskKind::Today);

        let remote = remote_envelope();
        assert!(apply_cycle(&mut state, &store, 1, Some(remote.clone())));

        assert_eq!(state.dashboard.tasks(), remote.tasks.as_slice());
        assert_eq!(state.dashboard.layout(), &remote.layout);

        // The local cache now mirrors the applied snapshot.
        let snapshot = store.load();
        assert_eq!(snapshot.tasks, remote.tasks);
        assert_eq!(snapshot.layout, remote.layout);
    }

    #[test]
    fn stale_cycle_cannot_touch_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        let mut state = watch_state(&store);
        assert!(apply_cycle(&mut state, &store, 2, None));

        // A slower, older cycle finishing late is discarded wholesale.
        assert!(!apply_cycle(&mut state, &store, 1, Some(remote_envelope())));
        assert!(state.dashboard.tasks().is_empty());
        assert_eq!(state.dashboard.layout(), &Layout::default());
    }
}
