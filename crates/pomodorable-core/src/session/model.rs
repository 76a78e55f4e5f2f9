//! Session domain model.
//!
//! This module contains the core Session entity: one document per Pomodoro
//! work interval, carrying the timer target plus the per-session widget
//! fields (todos, mood, goals) that independent synchronizers read and
//! write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a session.
///
/// The only permitted transition is `Pending`/`Active` -> `Completed`;
/// `Completed` is terminal and makes every field of the session read-only
/// at the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Active,
    Completed,
}

/// A single to-do item embedded in a session.
///
/// Ids are client-generated and must be unique within the session; display
/// order is always derived from `created_at` (newest first), never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new incomplete task with a fresh id, stamped now.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// The three loggable moods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
}

/// A logged mood plus the local time it was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: Mood,
    pub recorded_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(mood: Mood) -> Self {
        Self {
            mood,
            recorded_at: Utc::now(),
        }
    }
}

/// Free-form goals text plus its last-saved timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsNote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl GoalsNote {
    /// Creates a note stamped now.
    pub fn saved_now(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            saved_at: Some(Utc::now()),
        }
    }
}

/// One Pomodoro work interval and its tracked data.
///
/// The session document is the single shared mutable resource in the
/// system: the lifecycle manager owns `name`/`status`/`completed_at`, and
/// each widget synchronizer owns exactly one of `todos`, `mood`, `goals`.
/// Writers never touch another owner's field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier, assigned by the store on creation
    pub id: String,
    /// Identifier of the authenticated user; immutable after creation
    pub owner_id: String,
    /// Human-editable label
    pub name: String,
    pub status: SessionStatus,
    /// Server-assigned creation timestamp
    pub started_at: DateTime<Utc>,
    /// Server-assigned, set exactly once on completion; present iff
    /// `status == Completed`
    pub completed_at: Option<DateTime<Utc>>,
    /// `YYYY-MM-DD` in the client's local timezone, computed once at
    /// creation and never recomputed; used for date-range queries
    pub calendar_date: String,
    /// Work phase length, fixed at creation
    pub target_duration_secs: u32,
    #[serde(default)]
    pub todos: Vec<Task>,
    #[serde(default)]
    pub mood: Option<MoodEntry>,
    #[serde(default)]
    pub goals: GoalsNote,
}

impl Session {
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Todos in display order: creation timestamp descending (newest
    /// first). Recomputed from the raw array on every call; order is never
    /// persisted.
    pub fn todos_newest_first(&self) -> Vec<Task> {
        let mut todos = self.todos.clone();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        todos
    }
}

/// Creation payload for a new session.
///
/// The store assigns `id` and `started_at`; everything else is fixed here
/// by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub owner_id: String,
    pub name: String,
    /// Local date string at creation time
    pub calendar_date: String,
    pub target_duration_secs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_with_todos(todos: Vec<Task>) -> Session {
        Session {
            id: "s1".to_string(),
            owner_id: "u1".to_string(),
            name: "Test".to_string(),
            status: SessionStatus::Active,
            started_at: Utc::now(),
            completed_at: None,
            calendar_date: "2026-08-25".to_string(),
            target_duration_secs: 1500,
            todos,
            mood: None,
            goals: GoalsNote::default(),
        }
    }

    #[test]
    fn test_task_ids_unique() {
        let a = Task::new("a");
        let b = Task::new("b");
        assert_ne!(a.id, b.id);
        assert!(!a.completed);
    }

    #[test]
    fn test_todos_newest_first() {
        let base = Utc::now();
        let mk = |text: &str, offset: i64| Task {
            id: text.to_string(),
            text: text.to_string(),
            completed: false,
            created_at: base + Duration::seconds(offset),
        };
        let session = session_with_todos(vec![mk("A", 0), mk("B", 1), mk("C", 2)]);

        let ordered: Vec<_> = session
            .todos_newest_first()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(ordered, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_session_json_round_trip_defaults() {
        // Older documents may lack the widget fields entirely.
        let json = r#"{
            "id": "s1",
            "owner_id": "u1",
            "name": "Pomodoro Session - 09:00:00",
            "status": "active",
            "started_at": "2026-08-25T09:00:00Z",
            "completed_at": null,
            "calendar_date": "2026-08-25",
            "target_duration_secs": 1500
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert!(session.todos.is_empty());
        assert!(session.mood.is_none());
        assert_eq!(session.goals.text, "");
        assert!(!session.is_completed());
    }
}
