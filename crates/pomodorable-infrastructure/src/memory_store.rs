//! In-memory [`SessionStore`] implementation.
//!
//! Each document lives inside a `tokio::sync::watch` channel, which gives
//! single-document subscriptions for free: the sender side holds the
//! current value and every receiver observes each committed write,
//! including the subscriber's own. Query subscriptions are re-evaluated
//! against the full collection after every mutation, mirroring how a
//! remote document database pushes result-set snapshots.
//!
//! The store also emulates the database's composite-index requirement:
//! queries are rejected with `MissingIndex` unless the exact field tuple
//! they need has been declared, so callers can exercise the remediation
//! path without a real backend.

use async_trait::async_trait;
use chrono::Utc;
use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{
    FieldWrite, Session, SessionDraft, SessionListWatch, SessionPatch, SessionQuery, SessionStatus,
    SessionStore, SessionWatch,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// A registered live query and the channel its snapshots go out on.
struct QuerySubscription {
    query: SessionQuery,
    tx: watch::Sender<Vec<Session>>,
}

/// In-memory session store with real-time subscriptions.
pub struct MemorySessionStore {
    docs: RwLock<HashMap<String, watch::Sender<Session>>>,
    query_subs: RwLock<Vec<QuerySubscription>>,
    /// Declared composite indexes, as ordered field tuples
    indexes: Vec<Vec<&'static str>>,
    /// Simulates an unreachable backend; every operation fails while set
    unavailable: AtomicBool,
}

impl MemorySessionStore {
    /// Creates a store with both canonical composite indexes provisioned:
    /// (`owner_id`, `started_at`) and
    /// (`owner_id`, `calendar_date`, `started_at`).
    pub fn new() -> Self {
        Self::with_indexes(vec![
            vec!["owner_id", "started_at"],
            vec!["owner_id", "calendar_date", "started_at"],
        ])
    }

    /// Creates a store with no composite indexes declared. Every query
    /// fails with `MissingIndex`; used to exercise the remediation path.
    pub fn without_indexes() -> Self {
        Self::with_indexes(Vec::new())
    }

    fn with_indexes(indexes: Vec<Vec<&'static str>>) -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            query_subs: RwLock::new(Vec::new()),
            indexes,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Toggles the simulated-outage flag.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PomodorableError::store_unavailable(
                "in-memory store marked unreachable",
            ));
        }
        Ok(())
    }

    fn has_index(&self, fields: &[&str]) -> bool {
        self.indexes.iter().any(|index| index == fields)
    }

    /// Applies a patch to a document in place, merging only the named
    /// field paths. The completion transition assigns the server-side
    /// `completed_at` exactly once, in the same write.
    fn apply_patch(session: &mut Session, patch: SessionPatch) {
        if let Some(name) = patch.name {
            session.name = name;
        }
        if patch.complete && session.status != SessionStatus::Completed {
            session.status = SessionStatus::Completed;
            session.completed_at = Some(Utc::now());
        }
        if let Some(todos) = patch.todos {
            session.todos = todos;
        }
        if let Some(mood) = patch.mood {
            session.mood = match mood {
                FieldWrite::Set(entry) => Some(entry),
                FieldWrite::Clear => None,
            };
        }
        if let Some(goals) = patch.goals {
            session.goals = goals;
        }
    }

    /// Evaluates a query against the current collection: owner filter,
    /// optional calendar-date filter, `started_at` descending.
    fn evaluate(query: &SessionQuery, docs: &HashMap<String, watch::Sender<Session>>) -> Vec<Session> {
        let mut results: Vec<Session> = docs
            .values()
            .map(|tx| tx.borrow().clone())
            .filter(|s| s.owner_id == query.owner_id)
            .filter(|s| {
                query
                    .calendar_date
                    .as_ref()
                    .is_none_or(|date| &s.calendar_date == date)
            })
            .collect();
        results.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
        results
    }

    /// Pushes fresh snapshots to every live query subscription and drops
    /// subscriptions whose receivers are all gone.
    async fn notify_queries(&self) {
        let docs = self.docs.read().await;
        let mut subs = self.query_subs.write().await;
        subs.retain(|sub| sub.tx.receiver_count() > 0);
        for sub in subs.iter() {
            let results = Self::evaluate(&sub.query, &docs);
            sub.tx.send_replace(results);
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, draft: SessionDraft) -> Result<Session> {
        self.check_available()?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            owner_id: draft.owner_id,
            name: draft.name,
            status: SessionStatus::Active,
            started_at: Utc::now(),
            completed_at: None,
            calendar_date: draft.calendar_date,
            target_duration_secs: draft.target_duration_secs,
            todos: Vec::new(),
            mood: None,
            goals: Default::default(),
        };

        tracing::debug!(session_id = %session.id, owner_id = %session.owner_id, "Creating session document");

        let (tx, _rx) = watch::channel(session.clone());
        let mut docs = self.docs.write().await;
        docs.insert(session.id.clone(), tx);
        drop(docs);

        self.notify_queries().await;
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>> {
        self.check_available()?;
        let docs = self.docs.read().await;
        Ok(docs.get(session_id).map(|tx| tx.borrow().clone()))
    }

    async fn update(&self, session_id: &str, patch: SessionPatch) -> Result<()> {
        self.check_available()?;
        if patch.is_empty() {
            return Ok(());
        }

        tracing::debug!(session_id, paths = ?patch.touched_paths(), "Updating session document");

        let docs = self.docs.read().await;
        let tx = docs
            .get(session_id)
            .ok_or_else(|| PomodorableError::not_found("Session", session_id))?;
        tx.send_modify(|session| Self::apply_patch(session, patch));
        drop(docs);

        self.notify_queries().await;
        Ok(())
    }

    async fn subscribe(&self, session_id: &str) -> Result<SessionWatch> {
        self.check_available()?;
        let docs = self.docs.read().await;
        let tx = docs
            .get(session_id)
            .ok_or_else(|| PomodorableError::not_found("Session", session_id))?;
        Ok(SessionWatch::new(session_id, tx.subscribe()))
    }

    async fn query(&self, query: SessionQuery) -> Result<SessionListWatch> {
        self.check_available()?;

        let required = query.required_index();
        if !self.has_index(required) {
            tracing::warn!(?required, "Query rejected: composite index not provisioned");
            return Err(PomodorableError::missing_index(required));
        }

        let docs = self.docs.read().await;
        let initial = Self::evaluate(&query, &docs);
        drop(docs);

        let (tx, rx) = watch::channel(initial);
        let mut subs = self.query_subs.write().await;
        subs.push(QuerySubscription { query, tx });
        Ok(SessionListWatch::new(rx))
    }
}
