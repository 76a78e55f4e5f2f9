//! Goals (sticky note) field synchronizer.
//!
//! Owns the `goals` field of one session document. Keystroke-level edits
//! are coalesced through a trailing-edge debounce before hitting the
//! store; an explicit save bypasses the debounce and writes immediately.
//! Both paths go through the same per-field write queue, so a delayed
//! debounced write can never land after (and clobber) a newer manual
//! save.

use crate::sync::debounce::Debouncer;
use crate::sync::write_queue::FieldWriter;
use chrono::{DateTime, Utc};
use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{GoalsNote, Session, SessionPatch, SessionStore};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Inner {
    text: String,
    saved_at: Option<DateTime<Utc>>,
    /// Local edits not yet confirmed written; while set, incoming
    /// snapshots must not overwrite the text being edited
    dirty: bool,
    /// Bumped on every edit. A completed write only marks the state
    /// clean when no newer edit arrived while it was in flight.
    generation: u64,
    read_only: bool,
}

/// Synchronizer for the session's goals note.
pub struct GoalsSync {
    session_id: String,
    writer: Arc<FieldWriter>,
    debouncer: Debouncer,
    inner: Arc<Mutex<Inner>>,
}

impl GoalsSync {
    /// Creates the synchronizer from the subscribed session's current
    /// snapshot, with the given debounce window.
    pub fn new(store: Arc<dyn SessionStore>, session: &Session, debounce: Duration) -> Self {
        Self {
            session_id: session.id.clone(),
            writer: Arc::new(FieldWriter::new(store, session.id.clone())),
            debouncer: Debouncer::new(debounce),
            inner: Arc::new(Mutex::new(Inner {
                text: session.goals.text.clone(),
                saved_at: session.goals.saved_at,
                dirty: false,
                generation: 0,
                read_only: session.is_completed(),
            })),
        }
    }

    /// Adopts a fresh snapshot. The remote text is taken only when no
    /// local edit is in flight, so a subscription push never reverts what
    /// the user is typing.
    pub fn apply_snapshot(&self, session: &Session) {
        let mut inner = self.inner.lock().unwrap();
        inner.read_only = session.is_completed();
        if !inner.dirty {
            inner.text = session.goals.text.clone();
            inner.saved_at = session.goals.saved_at;
        }
    }

    /// Records a local edit and (re)schedules the debounced auto-save.
    /// The write that eventually fires carries whatever the text is at
    /// fire time, so a burst of edits produces at most one write.
    ///
    /// # Errors
    ///
    /// Returns `SessionCompleted` on a read-only session.
    pub fn edit(&self, text: impl Into<String>) -> Result<()> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.read_only {
                return Err(PomodorableError::session_completed(self.session_id.clone()));
            }
            inner.text = text.into();
            inner.dirty = true;
            inner.generation += 1;
        }

        let inner = Arc::clone(&self.inner);
        let writer = Arc::clone(&self.writer);
        self.debouncer.schedule(move || async move {
            let (note, generation) = {
                let inner = inner.lock().unwrap();
                (GoalsNote::saved_now(inner.text.clone()), inner.generation)
            };
            match writer.write(SessionPatch::goals(note.clone())).await {
                Ok(()) => {
                    let mut inner = inner.lock().unwrap();
                    if inner.generation == generation {
                        inner.dirty = false;
                    }
                    inner.saved_at = note.saved_at;
                }
                Err(err) => {
                    // Optimistic state stays; the user retries via save.
                    tracing::warn!(%err, "Debounced goals write failed");
                }
            }
        });
        Ok(())
    }

    /// Writes the current text immediately, cancelling any pending
    /// debounced write.
    ///
    /// # Errors
    ///
    /// Returns `SessionCompleted` on a read-only session; store errors
    /// surface unchanged.
    pub async fn save_now(&self) -> Result<()> {
        self.debouncer.cancel();

        let (note, generation) = {
            let inner = self.inner.lock().unwrap();
            if inner.read_only {
                return Err(PomodorableError::session_completed(self.session_id.clone()));
            }
            (GoalsNote::saved_now(inner.text.clone()), inner.generation)
        };
        self.writer.write(SessionPatch::goals(note.clone())).await?;

        // An edit that raced this write keeps the state dirty so the
        // save's own echo cannot revert it.
        let mut inner = self.inner.lock().unwrap();
        if inner.generation == generation {
            inner.dirty = false;
        }
        inner.saved_at = note.saved_at;
        Ok(())
    }

    pub fn text(&self) -> String {
        self.inner.lock().unwrap().text.clone()
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().unwrap().saved_at
    }

    pub fn is_read_only(&self) -> bool {
        self.inner.lock().unwrap().read_only
    }
}
