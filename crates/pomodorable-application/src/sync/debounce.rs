//! Trailing-edge debounce utility.
//!
//! Coalesces a burst of triggering events into one action after the burst
//! quiets down. Rescheduling replaces the pending action; cancellation is
//! deterministic and happens automatically on drop, so a torn-down
//! synchronizer can never fire a write at a session the user has left.

use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single-slot trailing-edge debouncer.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `action` to run after the delay, replacing any action
    /// already pending.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action().await;
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the pending action, if any. Returns whether one was
    /// pending.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap();
        match pending.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_action() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        for i in 1..=5u32 {
            let fired = fired.clone();
            debouncer.schedule(move || async move {
                fired.store(i, Ordering::SeqCst);
            });
            tokio::time::advance(Duration::from_millis(10)).await;
        }

        tokio::time::advance(Duration::from_millis(200)).await;
        // Let the spawned task run.
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let fired = Arc::new(AtomicU32::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        let fired_clone = fired.clone();
        debouncer.schedule(move || async move {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());

        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_action() {
        let fired = Arc::new(AtomicU32::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(100));
            let fired = fired.clone();
            debouncer.schedule(move || async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
