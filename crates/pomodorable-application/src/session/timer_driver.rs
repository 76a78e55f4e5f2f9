//! Wall-clock driver for the timer engine.
//!
//! Runs one session's [`TimerEngine`] on a one-second interval inside a
//! tokio task. UI commands arrive over an mpsc channel, rendered state
//! goes out over a watch channel, work-phase expiry is forwarded to the
//! lifecycle manager for persistence, and the session subscription is
//! monitored so an external completion (a second device finishing the
//! session) halts the countdown immediately.

use crate::session::manager::SessionLifecycleManager;
use pomodorable_core::session::SessionWatch;
use pomodorable_core::timer::{Phase, TickOutcome, TimerEngine, TimerState};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// UI actions accepted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    Start,
    Pause,
    ResetStage,
}

/// Rendered timer state published after every change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub state: TimerState,
    pub remaining_secs: u32,
    /// Fraction of the phase elapsed; pinned at 1.0 once the session is
    /// completed
    pub progress: f32,
    pub disabled: bool,
}

impl TimerSnapshot {
    fn of(engine: &TimerEngine) -> Self {
        Self {
            phase: engine.phase(),
            state: engine.state(),
            remaining_secs: engine.remaining_secs(),
            progress: engine.progress(),
            disabled: engine.is_disabled(),
        }
    }
}

/// Handle to a running timer task. Dropping it stops the task.
pub struct TimerDriver {
    commands: mpsc::UnboundedSender<TimerCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
    handle: JoinHandle<()>,
}

impl TimerDriver {
    /// Spawns the driver for the session behind `session_watch`.
    ///
    /// The work duration comes from the session record itself
    /// (`target_duration_secs`), the break duration from configuration.
    /// A session already completed at spawn time yields a disabled,
    /// 100%-progress timer.
    pub fn spawn(manager: Arc<SessionLifecycleManager>, mut session_watch: SessionWatch) -> Self {
        let session = session_watch.current();
        let session_id = session.id.clone();

        let mut engine = TimerEngine::new(
            session.target_duration_secs,
            manager.config().break_duration_secs,
        );
        if session.is_completed() {
            engine.disable();
        }

        let (commands, mut cmd_rx) = mpsc::unbounded_channel::<TimerCommand>();
        let (snap_tx, snapshots) = watch::channel(TimerSnapshot::of(&engine));

        let handle = tokio::spawn(async move {
            // The first tick must come a full second after spawn; a
            // plain interval's is ready immediately and would race the
            // first command into a zero-elapsed decrement.
            let tick = Duration::from_secs(1);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let outcome = engine.tick();
                        if outcome != TickOutcome::Noop {
                            snap_tx.send_replace(TimerSnapshot::of(&engine));
                        }
                        if outcome == TickOutcome::PhaseCompleted(Phase::Work) {
                            tracing::info!(session_id = %session_id, "Work phase expired");
                            if let Err(err) = manager.complete(&session_id).await {
                                tracing::warn!(session_id = %session_id, %err, "Failed to persist completion");
                            }
                        }
                        // Break completion stays internal: the engine has
                        // already rolled back to the work phase.
                    }
                    cmd = cmd_rx.recv() => {
                        match cmd {
                            None => break,
                            Some(TimerCommand::Start) => engine.start(),
                            Some(TimerCommand::Pause) => engine.pause(),
                            Some(TimerCommand::ResetStage) => engine.reset_stage(),
                        }
                        snap_tx.send_replace(TimerSnapshot::of(&engine));
                    }
                    changed = session_watch.changed() => {
                        match changed {
                            Ok(session) if session.is_completed() => {
                                tracing::debug!(session_id = %session_id, "Session completed externally, disabling timer");
                                engine.disable();
                                snap_tx.send_replace(TimerSnapshot::of(&engine));
                            }
                            Ok(_) => {}
                            Err(_) => {
                                // Subscription gone; stop driving.
                                engine.disable();
                                snap_tx.send_replace(TimerSnapshot::of(&engine));
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self {
            commands,
            snapshots,
            handle,
        }
    }

    pub fn start(&self) {
        let _ = self.commands.send(TimerCommand::Start);
    }

    pub fn pause(&self) {
        let _ = self.commands.send(TimerCommand::Pause);
    }

    pub fn reset_stage(&self) {
        let _ = self.commands.send(TimerCommand::ResetStage);
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.snapshots.borrow()
    }

    /// A receiver observing every published snapshot.
    pub fn watch(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;
    use pomodorable_core::auth::AuthUser;
    use pomodorable_core::config::AppConfig;
    use pomodorable_core::session::{SessionPatch, SessionStatus};
    use pomodorable_infrastructure::{LocalAuthProvider, MemorySessionStore};

    fn short_context() -> AppContext {
        AppContext::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(LocalAuthProvider::signed_in(AuthUser::new("u1"))),
            AppConfig {
                work_duration_secs: 3,
                break_duration_secs: 120,
                goals_debounce_ms: 1500,
            },
        )
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance_secs(secs: u64) {
        for _ in 0..secs {
            tokio::time::advance(Duration::from_secs(1)).await;
            settle().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_work_expiry_persists_completion() {
        let ctx = short_context();
        let manager = Arc::new(SessionLifecycleManager::new(&ctx));
        let session = manager.create_session().await.unwrap();
        let watch = manager.subscribe(&session.id).await.unwrap();

        let driver = TimerDriver::spawn(Arc::clone(&manager), watch);
        driver.start();
        settle().await;

        advance_secs(4).await;

        let stored = ctx.store.get(&session.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Completed);
        assert!(stored.completed_at.is_some());

        // The subscription echoed the completion back and disabled the
        // engine.
        let snapshot = driver.snapshot();
        assert!(snapshot.disabled);
        assert_eq!(snapshot.progress, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_completion_stops_ticking() {
        // A second device completes the session mid-countdown; the local
        // timer must stop and render a full bar.
        let ctx = short_context();
        let manager = Arc::new(SessionLifecycleManager::new(&ctx));
        let session = manager.create_session().await.unwrap();
        let watch = manager.subscribe(&session.id).await.unwrap();

        let driver = TimerDriver::spawn(Arc::clone(&manager), watch);
        driver.start();
        settle().await;
        advance_secs(1).await;

        ctx.store
            .update(&session.id, SessionPatch::complete())
            .await
            .unwrap();
        settle().await;

        let snapshot = driver.snapshot();
        assert!(snapshot.disabled);
        assert_eq!(snapshot.progress, 1.0);

        let remaining = snapshot.remaining_secs;
        advance_secs(2).await;
        assert_eq!(driver.snapshot().remaining_secs, remaining);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_decrement_before_first_full_second() {
        // Starting right after spawn must not consume a tick at zero
        // elapsed time.
        let ctx = short_context();
        let manager = Arc::new(SessionLifecycleManager::new(&ctx));
        let session = manager.create_session().await.unwrap();
        let watch = manager.subscribe(&session.id).await.unwrap();

        let driver = TimerDriver::spawn(Arc::clone(&manager), watch);
        driver.start();
        settle().await;

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.state, TimerState::Running);
        assert_eq!(snapshot.remaining_secs, 3);

        advance_secs(1).await;
        assert_eq!(driver.snapshot().remaining_secs, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_countdown() {
        let ctx = short_context();
        let manager = Arc::new(SessionLifecycleManager::new(&ctx));
        let session = manager.create_session().await.unwrap();
        let watch = manager.subscribe(&session.id).await.unwrap();

        let driver = TimerDriver::spawn(Arc::clone(&manager), watch);
        driver.start();
        settle().await;
        advance_secs(1).await;
        assert_eq!(driver.snapshot().remaining_secs, 2);

        driver.pause();
        settle().await;
        advance_secs(2).await;
        assert_eq!(driver.snapshot().remaining_secs, 2);
        assert_eq!(driver.snapshot().state, TimerState::Paused);

        driver.start();
        settle().await;
        advance_secs(1).await;
        assert_eq!(driver.snapshot().remaining_secs, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_completed_session_spawns_disabled() {
        let ctx = short_context();
        let manager = Arc::new(SessionLifecycleManager::new(&ctx));
        let session = manager.create_session().await.unwrap();
        manager.complete(&session.id).await.unwrap();

        let watch = manager.subscribe(&session.id).await.unwrap();
        let driver = TimerDriver::spawn(manager, watch);

        let snapshot = driver.snapshot();
        assert!(snapshot.disabled);
        assert_eq!(snapshot.progress, 1.0);

        driver.start();
        settle().await;
        advance_secs(2).await;
        assert!(driver.snapshot().disabled);
    }
}
