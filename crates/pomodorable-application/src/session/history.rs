//! Session history and daily progress.
//!
//! Read-side views over the owner's past sessions: a live list of all
//! sessions (newest first), a live list for one calendar date, and the
//! per-day summary that drives the plant growth display.

use crate::context::AppContext;
use pomodorable_core::auth::AuthProvider;
use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{Session, SessionListWatch, SessionQuery, SessionStore};
use serde::Serialize;
use std::sync::Arc;

/// Growth stage of the progress plant, derived from the number of
/// sessions completed on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantStage {
    Seed,
    Sprout,
    Seedling,
    Blooming,
}

impl PlantStage {
    /// Maps a day's completed-session count to a stage.
    pub fn for_completed(completed: u32) -> Self {
        match completed {
            0 => Self::Seed,
            1..=2 => Self::Sprout,
            3..=4 => Self::Seedling,
            _ => Self::Blooming,
        }
    }
}

/// Aggregate of one calendar day's sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub total: u32,
    pub completed: u32,
    /// Sum of the target durations of the day's completed sessions
    pub focused_secs: u64,
}

impl DaySummary {
    /// Summarizes a day's result set.
    pub fn of(sessions: &[Session]) -> Self {
        let completed = sessions.iter().filter(|s| s.is_completed()).count() as u32;
        let focused_secs = sessions
            .iter()
            .filter(|s| s.is_completed())
            .map(|s| u64::from(s.target_duration_secs))
            .sum();
        Self {
            total: sessions.len() as u32,
            completed,
            focused_secs,
        }
    }

    pub fn plant_stage(&self) -> PlantStage {
        PlantStage::for_completed(self.completed)
    }
}

/// Read-side access to the current user's session history.
pub struct SessionHistory {
    store: Arc<dyn SessionStore>,
    auth: Arc<dyn AuthProvider>,
}

impl SessionHistory {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            auth: Arc::clone(&ctx.auth),
        }
    }

    /// Live list of every session owned by the current user, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without an authenticated user and
    /// `MissingIndex` when the store lacks the backing composite index.
    pub async fn watch_all(&self) -> Result<SessionListWatch> {
        let user = self
            .auth
            .current_user()
            .ok_or(PomodorableError::AuthRequired)?;
        self.store.query(SessionQuery::for_owner(user.uid)).await
    }

    /// Live list of the current user's sessions created on the given
    /// local date (`YYYY-MM-DD`), newest first.
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` without an authenticated user and
    /// `MissingIndex` when the store lacks the backing composite index.
    pub async fn watch_for_date(&self, calendar_date: &str) -> Result<SessionListWatch> {
        let user = self
            .auth
            .current_user()
            .ok_or(PomodorableError::AuthRequired)?;
        self.store
            .query(SessionQuery::for_owner_on(user.uid, calendar_date))
            .await
    }
}
