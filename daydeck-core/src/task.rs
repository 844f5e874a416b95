//! Dashboard task types.
//!
//! Tasks are created on the client and never by the remote store, so the
//! `id` is generated locally (random, uncoordinated) and is immutable for
//! the lifetime of the task. The JSON shape matches what the remote blob
//! store already holds: camelCase keys and a lowercase `type` discriminator.

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeckError;

/// Which list a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Today,
    Checklist,
    Yesterday,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Today, TaskKind::Checklist, TaskKind::Yesterday];

    /// Display title used for the section heading of each list.
    pub fn title(&self) -> &'static str {
        match self {
            TaskKind::Today => "Today's Priorities",
            TaskKind::Checklist => "Executive Checklist",
            TaskKind::Yesterday => "Yesterday Review",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Today => "today",
            TaskKind::Checklist => "checklist",
            TaskKind::Yesterday => "yesterday",
        }
    }
}

impl FromStr for TaskKind {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| DeckError::UnknownTaskList(s.to_string()))
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single task on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    pub fn new(text: impl Into<String>, kind: TaskKind) -> Self {
        Task {
            // Hyphenless so ids stay easy to type on the command line.
            id: Uuid::new_v4().simple().to_string(),
            text: text.into(),
            completed: false,
            kind,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}
