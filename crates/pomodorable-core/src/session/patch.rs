//! Partial session updates.
//!
//! A [`SessionPatch`] names exactly the field paths a single writer wants
//! to replace; the store merges only those paths. Each field has one owner
//! (the lifecycle manager for `name`/`status`, one synchronizer for each of
//! `todos`/`mood`/`goals`), and the typed constructors below make it
//! impossible for a writer to accidentally bundle another owner's field
//! into its patch.

use super::model::{GoalsNote, MoodEntry, Task};
use serde::{Deserialize, Serialize};

/// A whole-field write: either a replacement value or an explicit clear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWrite<T> {
    Set(T),
    Clear,
}

/// The field paths of a session document that accept client writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPath {
    Name,
    Status,
    Todos,
    Mood,
    Goals,
}

/// A partial update to a session document.
///
/// `complete` folds the `status -> Completed` transition and the
/// server-assigned `completed_at` into a single write request so completion
/// is atomic at the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<FieldWrite<MoodEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<GoalsNote>,
}

impl SessionPatch {
    /// A patch that renames the session.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A patch that marks the session completed. The store assigns
    /// `completed_at` server-side within the same write.
    pub fn complete() -> Self {
        Self {
            complete: true,
            ..Self::default()
        }
    }

    /// A patch that replaces the whole todo list.
    pub fn todos(todos: Vec<Task>) -> Self {
        Self {
            todos: Some(todos),
            ..Self::default()
        }
    }

    /// A patch that sets or clears the logged mood.
    pub fn mood(entry: Option<MoodEntry>) -> Self {
        Self {
            mood: Some(match entry {
                Some(entry) => FieldWrite::Set(entry),
                None => FieldWrite::Clear,
            }),
            ..Self::default()
        }
    }

    /// A patch that replaces the goals note.
    pub fn goals(note: GoalsNote) -> Self {
        Self {
            goals: Some(note),
            ..Self::default()
        }
    }

    /// The field paths this patch touches.
    pub fn touched_paths(&self) -> Vec<FieldPath> {
        let mut paths = Vec::new();
        if self.name.is_some() {
            paths.push(FieldPath::Name);
        }
        if self.complete {
            paths.push(FieldPath::Status);
        }
        if self.todos.is_some() {
            paths.push(FieldPath::Todos);
        }
        if self.mood.is_some() {
            paths.push(FieldPath::Mood);
        }
        if self.goals.is_some() {
            paths.push(FieldPath::Goals);
        }
        paths
    }

    /// True when the patch names no field at all.
    pub fn is_empty(&self) -> bool {
        self.touched_paths().is_empty()
    }
}
