//! Session lifecycle management.
//!
//! Mediates between the owner's UI actions (create, rename), the timer's
//! completion signal, and the persisted session record. This is where the
//! system's single authorization check lives, and where completion is
//! guaranteed to reach the store exactly once.

use crate::context::AppContext;
use crate::sync::FieldWriter;
use chrono::Local;
use pomodorable_core::auth::AuthProvider;
use pomodorable_core::config::AppConfig;
use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{
    Session, SessionDraft, SessionPatch, SessionStore, SessionWatch,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Owns the session record's state machine: creation, subscription with
/// the ownership check, rename, and the exactly-once completion
/// transition.
pub struct SessionLifecycleManager {
    store: Arc<dyn SessionStore>,
    auth: Arc<dyn AuthProvider>,
    config: AppConfig,
    /// Sessions with a completion write currently in flight
    completing: Mutex<HashSet<String>>,
    /// Per-session serialized writers for the name field
    name_writers: tokio::sync::Mutex<HashMap<String, Arc<FieldWriter>>>,
}

impl SessionLifecycleManager {
    /// Creates a manager from the application context.
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            auth: Arc::clone(&ctx.auth),
            config: ctx.config.clone(),
            completing: Mutex::new(HashSet::new()),
            name_writers: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Creates a new active session owned by the current user.
    ///
    /// The default name is derived from the local creation time, the
    /// calendar date is fixed to the local date once and never
    /// recomputed, and the work duration comes from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without an authenticated owner and store
    /// errors unchanged.
    pub async fn create_session(&self) -> Result<Session> {
        let user = self
            .auth
            .current_user()
            .ok_or(PomodorableError::AuthRequired)?;

        let now = Local::now();
        let draft = SessionDraft {
            owner_id: user.uid,
            name: format!("Pomodoro Session - {}", now.format("%H:%M:%S")),
            calendar_date: now.format("%Y-%m-%d").to_string(),
            target_duration_secs: self.config.work_duration_secs,
        };

        let session = self.store.create(draft).await?;
        tracing::info!(session_id = %session.id, owner_id = %session.owner_id, "Session created");
        Ok(session)
    }

    /// Establishes a live subscription to a session the current user
    /// owns.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` without an authenticated user
    /// - `NotFound` when the session does not exist
    /// - `AccessDenied` when the record's owner is a different user —
    ///   this is the sole authorization check in the system
    pub async fn subscribe(&self, session_id: &str) -> Result<SessionWatch> {
        let user = self
            .auth
            .current_user()
            .ok_or(PomodorableError::AuthRequired)?;

        let session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| PomodorableError::not_found("Session", session_id))?;

        if session.owner_id != user.uid {
            tracing::warn!(session_id, uid = %user.uid, "Subscription refused: not the owner");
            return Err(PomodorableError::access_denied(session_id));
        }

        self.store.subscribe(session_id).await
    }

    /// Renames a session. Blank input and an unchanged name are no-ops;
    /// an actual rename goes through the per-session write queue so two
    /// rapid renames apply in issuance order.
    ///
    /// # Returns
    ///
    /// `true` when a write was issued, `false` for the no-op cases.
    ///
    /// # Errors
    ///
    /// Returns `SessionCompleted` for a completed (read-only) session,
    /// `NotFound` for a missing one, and store errors unchanged.
    pub async fn rename(&self, session_id: &str, new_name: &str) -> Result<bool> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| PomodorableError::not_found("Session", session_id))?;

        if session.is_completed() {
            self.drop_name_writer(session_id).await;
            return Err(PomodorableError::session_completed(session_id));
        }
        if session.name == trimmed {
            return Ok(false);
        }

        let writer = self.name_writer(session_id).await;
        writer.write(SessionPatch::rename(trimmed)).await?;
        tracing::info!(session_id, name = trimmed, "Session renamed");
        Ok(true)
    }

    /// Marks a session completed, exactly once.
    ///
    /// Idempotent under concurrency: while one completion write is in
    /// flight, every other caller observes the in-flight flag and backs
    /// off, so a timer expiry racing a manual completion still produces a
    /// single store write.
    ///
    /// # Returns
    ///
    /// `true` when this call performed the write, `false` when the
    /// session was already completed or a completion was in flight.
    pub async fn complete(&self, session_id: &str) -> Result<bool> {
        {
            let mut in_flight = self.completing.lock().unwrap();
            if !in_flight.insert(session_id.to_string()) {
                tracing::debug!(session_id, "Completion already in flight, backing off");
                return Ok(false);
            }
        }

        let result = self.complete_inner(session_id).await;
        self.completing.lock().unwrap().remove(session_id);
        result
    }

    async fn complete_inner(&self, session_id: &str) -> Result<bool> {
        let session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| PomodorableError::not_found("Session", session_id))?;

        if session.is_completed() {
            self.drop_name_writer(session_id).await;
            return Ok(false);
        }

        // Status and the server-assigned completed_at land in one write.
        self.store
            .update(session_id, SessionPatch::complete())
            .await?;
        self.drop_name_writer(session_id).await;
        tracing::info!(session_id, "Session completed");
        Ok(true)
    }

    async fn name_writer(&self, session_id: &str) -> Arc<FieldWriter> {
        let mut writers = self.name_writers.lock().await;
        writers
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(FieldWriter::new(Arc::clone(&self.store), session_id)))
            .clone()
    }

    /// Stops the per-session rename worker. A completed session takes no
    /// further name writes, so the queue has nothing left to serialize.
    async fn drop_name_writer(&self, session_id: &str) {
        self.name_writers.lock().await.remove(session_id);
    }
}
