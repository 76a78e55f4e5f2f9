//! Mood field synchronizer.
//!
//! Owns the `mood` field of one session document. Mood changes are rare
//! and deliberate, so every selection writes immediately (no debounce).

use crate::sync::write_queue::FieldWriter;
use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{Mood, MoodEntry, Session, SessionPatch, SessionStore};
use std::sync::{Arc, Mutex};

struct Inner {
    entry: Option<MoodEntry>,
    read_only: bool,
}

/// Synchronizer for the session's logged mood.
pub struct MoodSync {
    session_id: String,
    writer: FieldWriter,
    inner: Mutex<Inner>,
}

impl MoodSync {
    /// Creates the synchronizer from the subscribed session's current
    /// snapshot.
    pub fn new(store: Arc<dyn SessionStore>, session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            writer: FieldWriter::new(store, session.id.clone()),
            inner: Mutex::new(Inner {
                entry: session.mood.clone(),
                read_only: session.is_completed(),
            }),
        }
    }

    /// Adopts a fresh snapshot (absent field means "no mood logged").
    pub fn apply_snapshot(&self, session: &Session) {
        let mut inner = self.inner.lock().unwrap();
        inner.entry = session.mood.clone();
        inner.read_only = session.is_completed();
    }

    /// Sets or clears the mood and writes the field immediately.
    ///
    /// # Errors
    ///
    /// Returns `SessionCompleted` on a read-only session; store errors
    /// surface unchanged (local state is not rolled back).
    pub async fn set_mood(&self, mood: Option<Mood>) -> Result<()> {
        let entry = {
            let mut inner = self.inner.lock().unwrap();
            if inner.read_only {
                return Err(PomodorableError::session_completed(self.session_id.clone()));
            }
            inner.entry = mood.map(MoodEntry::new);
            inner.entry.clone()
        };
        self.writer.write(SessionPatch::mood(entry)).await
    }

    pub fn current(&self) -> Option<MoodEntry> {
        self.inner.lock().unwrap().entry.clone()
    }

    pub fn is_read_only(&self) -> bool {
        self.inner.lock().unwrap().read_only
    }
}
