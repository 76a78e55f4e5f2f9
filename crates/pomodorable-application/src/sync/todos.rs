//! Todo list field synchronizer.
//!
//! Owns the `todos` field of one session document. Every mutation computes
//! the full next array locally and writes it wholesale; local state is
//! optimistic and the next snapshot may silently correct it. Display order
//! is recomputed from creation timestamps after every snapshot, never
//! persisted.

use crate::sync::write_queue::FieldWriter;
use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{Session, SessionPatch, SessionStore, Task};
use std::sync::{Arc, Mutex};

struct Inner {
    tasks: Vec<Task>,
    read_only: bool,
}

/// Synchronizer for the session's todo list.
pub struct TodoListSync {
    session_id: String,
    writer: FieldWriter,
    inner: Mutex<Inner>,
}

impl TodoListSync {
    /// Creates the synchronizer from the subscribed session's current
    /// snapshot.
    pub fn new(store: Arc<dyn SessionStore>, session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            writer: FieldWriter::new(store, session.id.clone()),
            inner: Mutex::new(Inner {
                tasks: session.todos.clone(),
                read_only: session.is_completed(),
            }),
        }
    }

    /// Adopts a fresh snapshot: replaces the local array (an absent field
    /// deserializes as empty) and tracks the read-only flag.
    pub fn apply_snapshot(&self, session: &Session) {
        let mut inner = self.inner.lock().unwrap();
        inner.tasks = session.todos.clone();
        inner.read_only = session.is_completed();
    }

    /// Adds a task and writes the new full array.
    ///
    /// # Returns
    ///
    /// The created task, or `None` when the trimmed text was blank and
    /// nothing was written.
    ///
    /// # Errors
    ///
    /// Returns `SessionCompleted` on a read-only session; store errors
    /// surface unchanged (local state is not rolled back).
    pub async fn add(&self, text: impl Into<String>) -> Result<Option<Task>> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let task = Task::new(trimmed);
        let next = {
            let mut inner = self.lock_for_write()?;
            inner.tasks.push(task.clone());
            inner.tasks.clone()
        };
        self.writer.write(SessionPatch::todos(next)).await?;
        Ok(Some(task))
    }

    /// Flips a task's completed flag and writes the new full array.
    pub async fn toggle(&self, task_id: &str) -> Result<()> {
        let next = {
            let mut inner = self.lock_for_write()?;
            let task = inner
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| PomodorableError::not_found("Task", task_id))?;
            task.completed = !task.completed;
            inner.tasks.clone()
        };
        self.writer.write(SessionPatch::todos(next)).await
    }

    /// Deletes a task and writes the new full array.
    pub async fn remove(&self, task_id: &str) -> Result<()> {
        let next = {
            let mut inner = self.lock_for_write()?;
            let before = inner.tasks.len();
            inner.tasks.retain(|t| t.id != task_id);
            if inner.tasks.len() == before {
                return Err(PomodorableError::not_found("Task", task_id));
            }
            inner.tasks.clone()
        };
        self.writer.write(SessionPatch::todos(next)).await
    }

    /// Drops every completed task and writes the new full array.
    pub async fn clear_completed(&self) -> Result<()> {
        let next = {
            let mut inner = self.lock_for_write()?;
            inner.tasks.retain(|t| !t.completed);
            inner.tasks.clone()
        };
        self.writer.write(SessionPatch::todos(next)).await
    }

    /// Tasks in display order: newest first.
    pub fn tasks_newest_first(&self) -> Vec<Task> {
        let inner = self.inner.lock().unwrap();
        let mut tasks = inner.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    pub fn completed_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .tasks
            .iter()
            .filter(|t| t.completed)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.inner.lock().unwrap().tasks.len()
    }

    pub fn is_read_only(&self) -> bool {
        self.inner.lock().unwrap().read_only
    }

    fn lock_for_write(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        let inner = self.inner.lock().unwrap();
        if inner.read_only {
            return Err(PomodorableError::session_completed(self.session_id.clone()));
        }
        Ok(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomodorable_core::session::{SessionDraft, SessionPatch};
    use pomodorable_infrastructure::MemorySessionStore;

    async fn setup() -> (Arc<MemorySessionStore>, Session) {
        let store = Arc::new(MemorySessionStore::new());
        let session = store
            .create(SessionDraft {
                owner_id: "u1".to_string(),
                name: "Focus".to_string(),
                calendar_date: "2026-08-25".to_string(),
                target_duration_secs: 1500,
            })
            .await
            .unwrap();
        (store, session)
    }

    #[tokio::test]
    async fn test_add_toggle_clear_flow() {
        // Scenario: add A, B, C; display is C, B, A; toggle B; clear
        // completed leaves C, A.
        let (store, session) = setup().await;
        let sync = TodoListSync::new(store.clone(), &session);

        sync.add("A").await.unwrap();
        let b = sync.add("B").await.unwrap().unwrap();
        sync.add("C").await.unwrap();

        let order: Vec<_> = sync
            .tasks_newest_first()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(order, vec!["C", "B", "A"]);

        sync.toggle(&b.id).await.unwrap();
        assert_eq!(sync.completed_count(), 1);
        assert_eq!(sync.total_count(), 3);

        sync.clear_completed().await.unwrap();
        let order: Vec<_> = sync
            .tasks_newest_first()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(order, vec!["C", "A"]);
    }

    #[tokio::test]
    async fn test_writes_touch_only_the_todos_field() {
        let (store, session) = setup().await;
        let sync = TodoListSync::new(store.clone(), &session);

        sync.add("only me").await.unwrap();

        let stored = store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.todos.len(), 1);
        assert_eq!(stored.name, session.name);
        assert_eq!(stored.status, session.status);
        assert!(stored.mood.is_none());
        assert_eq!(stored.goals, session.goals);
    }

    #[tokio::test]
    async fn test_completed_session_is_read_only() {
        let (store, session) = setup().await;
        let sync = TodoListSync::new(store.clone(), &session);

        store
            .update(&session.id, SessionPatch::complete())
            .await
            .unwrap();
        let completed = store.get(&session.id).await.unwrap().unwrap();
        sync.apply_snapshot(&completed);

        let err = sync.add("too late").await.unwrap_err();
        assert!(matches!(err, PomodorableError::SessionCompleted { .. }));

        // Nothing reached the store.
        let stored = store.get(&session.id).await.unwrap().unwrap();
        assert!(stored.todos.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_replaces_local_state() {
        let (store, session) = setup().await;
        let sync = TodoListSync::new(store.clone(), &session);
        sync.add("mine").await.unwrap();

        // A second device rewrote the list; the snapshot wins.
        let remote = vec![Task::new("theirs")];
        store
            .update(&session.id, SessionPatch::todos(remote))
            .await
            .unwrap();
        let snapshot = store.get(&session.id).await.unwrap().unwrap();
        sync.apply_snapshot(&snapshot);

        let texts: Vec<_> = sync
            .tasks_newest_first()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["theirs"]);
    }

    #[tokio::test]
    async fn test_blank_task_text_is_a_no_op() {
        // Blank input is not a store rejection; nothing is created and
        // nothing is written.
        let (store, session) = setup().await;
        let sync = TodoListSync::new(store.clone(), &session);

        assert!(sync.add("   ").await.unwrap().is_none());
        assert_eq!(sync.total_count(), 0);

        let stored = store.get(&session.id).await.unwrap().unwrap();
        assert!(stored.todos.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_task_is_not_found() {
        let (store, session) = setup().await;
        let sync = TodoListSync::new(store, &session);
        assert!(sync.toggle("missing").await.unwrap_err().is_not_found());
    }
}
