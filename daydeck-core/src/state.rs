//! The dashboard state container.
//!
//! `Dashboard` is the single owner of mutable dashboard state. Commands and
//! rendering code never touch `tasks` or `layout` directly; every mutation
//! goes through the operations here, and the caller persists and publishes
//! the result as one logical unit.

use crate::envelope::SyncEnvelope;
use crate::layout::{Layout, SectionId, Slot};
use crate::store::LocalStore;
use crate::task::{Task, TaskKind};

#[derive(Debug, Clone, Copy)]
struct Drag {
    section: SectionId,
    slot: Slot,
}

pub struct Dashboard {
    tasks: Vec<Task>,
    layout: Layout,
    drag: Option<Drag>,
    user_email: Option<String>,
}

impl Dashboard {
    pub fn new(tasks: Vec<Task>, layout: Layout, user_email: Option<String>) -> Self {
        Dashboard {
            tasks,
            layout,
            drag: None,
            user_email,
        }
    }

    pub fn load(store: &LocalStore, user_email: Option<String>) -> Self {
        let snapshot = store.load();
        Dashboard::new(snapshot.tasks, snapshot.layout, user_email)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_of(&self, kind: TaskKind) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.kind == kind)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // --- task operations ---

    pub fn add_task(&mut self, text: impl Into<String>, kind: TaskKind) -> Task {
        let task = Task::new(text, kind);
        self.tasks.push(task.clone());
        task
    }

    /// Flip `completed` on the matching task. False if no task has that id.
    pub fn toggle_task(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Remove the matching task. False if no task has that id.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() < before
    }

    // --- drag session ---

    pub fn begin_drag(&mut self, section: SectionId, slot: Slot) {
        self.drag = Some(Drag { section, slot });
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Complete a drag by dropping onto `target` in `slot`.
    ///
    /// Rejected silently (returning false, all slots untouched, drag kept
    /// alive) when no drag is in progress, when the drag originated in a
    /// different slot, or when either id is missing from the slot. An
    /// accepted drop clears the drag, even if the reorder was an identity.
    pub fn drop_onto(&mut self, target: SectionId, slot: Slot) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };

        if drag.slot != slot {
            return false;
        }

        if !self.layout.reorder(slot, drag.section, target) {
            return false;
        }

        self.drag = None;
        true
    }

    // --- sync ---

    /// Remote-wins: replace tasks and layout wholesale with the pulled
    /// envelope. The caller re-persists so the local cache mirrors the
    /// latest remote snapshot.
    pub fn reconcile(&mut self, envelope: SyncEnvelope) {
        self.tasks = envelope.tasks;
        self.layout = envelope.layout;
    }

    /// Bundle the current state for a push, stamped with the current time.
    pub fn envelope(&self) -> SyncEnvelope {
        SyncEnvelope::new(
            self.tasks.clone(),
            self.layout.clone(),
            self.user_email.clone(),
        )
    }

    /// Persist the full state to the local store.
    pub fn persist(&self, store: &LocalStore) -> crate::error::DeckResult<()> {
        store.save(&self.tasks, &self.layout)
    }
}
