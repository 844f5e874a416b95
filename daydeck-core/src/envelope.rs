//! The wire shape exchanged with the remote store.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::layout::Layout;
use crate::task::Task;

/// Full dashboard state as pushed to and pulled from the remote blob store.
///
/// Produced on every local mutation and consumed wholesale on every pull.
/// `lastUpdated` and `userEmail` are informational: a pull body carrying
/// only `tasks` and `layout` is still valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEnvelope {
    pub tasks: Vec<Task>,
    pub layout: Layout,
    /// Assembly time in epoch milliseconds.
    #[serde(default)]
    pub last_updated: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl SyncEnvelope {
    /// Bundle the current state, stamped with the current time.
    pub fn new(tasks: Vec<Task>, layout: Layout, user_email: Option<String>) -> Self {
        SyncEnvelope {
            tasks,
            layout,
            last_updated: Utc::now().timestamp_millis(),
            user_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskKind;

    // --- pull tolerance ---

    #[test]
    fn deserializes_minimal_pull_body() {
        let json = r#"{
            "tasks": [],
            "layout": {"top":["comms"],"left":["tasks","news"],"right":["yesterday","agenda","logout"]}
        }"#;
        let envelope: SyncEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.tasks.is_empty());
        assert_eq!(envelope.last_updated, 0);
        assert_eq!(envelope.user_email, None);
    }

    // --- push shape ---

    #[test]
    fn serializes_camel_case_keys() {
        let envelope = SyncEnvelope::new(
            vec![Task::new("Sign the term sheet", TaskKind::Today)],
            Layout::default(),
            Some("ceo@example.com".into()),
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["lastUpdated"].as_i64().unwrap() > 0);
        assert_eq!(json["userEmail"], "ceo@example.com");
        assert_eq!(json["tasks"][0]["type"], "today");
    }

    #[test]
    fn omits_user_email_when_unset() {
        let envelope = SyncEnvelope::new(Vec::new(), Layout::default(), None);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json.get("userEmail").is_none());
    }
}
