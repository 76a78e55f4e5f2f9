//! Session store contract.
//!
//! Defines the interface to the remote document database holding session
//! records: create/read/update plus real-time subscriptions on single
//! documents and on owner-scoped query result sets.

use super::model::{Session, SessionDraft};
use super::patch::SessionPatch;
use crate::error::{PomodorableError, Result};
use async_trait::async_trait;
use tokio::sync::watch;

/// A live subscription to a single session document.
///
/// The receiver always holds the full current document; every remote
/// change (including the subscriber's own writes) is observable through
/// [`SessionWatch::changed`]. Dropping the watch unsubscribes synchronously
/// with no further delivery.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    session_id: String,
    rx: watch::Receiver<Session>,
}

impl SessionWatch {
    pub fn new(session_id: impl Into<String>, rx: watch::Receiver<Session>) -> Self {
        Self {
            session_id: session_id.into(),
            rx,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The latest observed document state.
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Waits for the next change and returns the new document state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the document (or the store behind it) has
    /// gone away and no further updates will ever arrive.
    pub async fn changed(&mut self) -> Result<Session> {
        self.rx
            .changed()
            .await
            .map_err(|_| PomodorableError::not_found("Session", self.session_id.clone()))?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// A live subscription to a query result set.
///
/// The held value is the full, ordered result list, re-delivered whenever
/// any matching document changes.
#[derive(Debug, Clone)]
pub struct SessionListWatch {
    rx: watch::Receiver<Vec<Session>>,
}

impl SessionListWatch {
    pub fn new(rx: watch::Receiver<Vec<Session>>) -> Self {
        Self { rx }
    }

    /// The latest result set.
    pub fn current(&self) -> Vec<Session> {
        self.rx.borrow().clone()
    }

    /// Waits for the next result-set change.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` when the backing store has gone away.
    pub async fn changed(&mut self) -> Result<Vec<Session>> {
        self.rx
            .changed()
            .await
            .map_err(|_| PomodorableError::store_unavailable("query subscription closed"))?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// An owner-scoped session query, ordered by `started_at` descending.
///
/// The dated variant requires a composite index on
/// (`owner_id`, `calendar_date`, `started_at`); the unfiltered variant on
/// (`owner_id`, `started_at`). A store without the required index must
/// reject the query with `MissingIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuery {
    pub owner_id: String,
    /// `YYYY-MM-DD` filter on the creation-time calendar date
    pub calendar_date: Option<String>,
}

impl SessionQuery {
    /// All of an owner's sessions, newest first.
    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            calendar_date: None,
        }
    }

    /// An owner's sessions created on the given local date, newest first.
    pub fn for_owner_on(owner_id: impl Into<String>, calendar_date: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            calendar_date: Some(calendar_date.into()),
        }
    }

    /// The index field tuple this query requires.
    pub fn required_index(&self) -> &'static [&'static str] {
        if self.calendar_date.is_some() {
            &["owner_id", "calendar_date", "started_at"]
        } else {
            &["owner_id", "started_at"]
        }
    }
}

/// An abstract store for session documents.
///
/// This trait defines the contract the core depends on, decoupling the
/// lifecycle manager and synchronizers from the concrete document database.
///
/// # Implementation Notes
///
/// Implementations must guarantee that:
/// - a client observes its own writes in its own subscription stream;
/// - `update` merges only the field paths the patch names;
/// - the `status -> Completed` transition and the server-assigned
///   `completed_at` land in one atomic write.
///
/// They provide no cross-request ordering: two rapid writes to the same
/// field race unless the caller serializes them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a new session document.
    ///
    /// The store assigns the id and the server-side `started_at`; the
    /// created session starts `Active` with empty widget fields.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` or `WriteFailed` on failure.
    async fn create(&self, draft: SessionDraft) -> Result<Session>;

    /// Fetches a session document by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: document found
    /// - `Ok(None)`: no such document
    /// - `Err(_)`: store failure
    async fn get(&self, session_id: &str) -> Result<Option<Session>>;

    /// Merges the patch's field paths into the document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing document, `StoreUnavailable` or
    /// `WriteFailed` on failure.
    async fn update(&self, session_id: &str, patch: SessionPatch) -> Result<()>;

    /// Establishes a live subscription to a single document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing document.
    async fn subscribe(&self, session_id: &str) -> Result<SessionWatch>;

    /// Establishes a live subscription to a query result set.
    ///
    /// # Errors
    ///
    /// Returns `MissingIndex` when the required composite index has not
    /// been provisioned.
    async fn query(&self, query: SessionQuery) -> Result<SessionListWatch>;
}
