//! Per-field write serialization.
//!
//! The store guarantees nothing about the ordering of two in-flight writes
//! to the same field: a delayed earlier write can land after a newer one
//! and win. [`FieldWriter`] closes that hole by funnelling every write for
//! one (session, field owner) pair through a single worker task that
//! applies them strictly in submission order.

use pomodorable_core::error::{PomodorableError, Result};
use pomodorable_core::session::{SessionPatch, SessionStore};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

struct WriteJob {
    patch: SessionPatch,
    done: oneshot::Sender<Result<()>>,
}

/// Serialized write queue for one field owner of one session.
///
/// Dropping the writer stops the worker after it drains the jobs already
/// submitted.
pub struct FieldWriter {
    session_id: String,
    tx: mpsc::UnboundedSender<WriteJob>,
}

impl FieldWriter {
    /// Spawns the worker task for `session_id` against `store`.
    pub fn new(store: Arc<dyn SessionStore>, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        let (tx, mut rx) = mpsc::unbounded_channel::<WriteJob>();

        let worker_session = session_id.clone();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = store.update(&worker_session, job.patch).await;
                if let Err(err) = &result {
                    tracing::warn!(session_id = %worker_session, %err, "Field write failed");
                }
                // The submitter may have stopped waiting; that's fine.
                let _ = job.done.send(result);
            }
        });

        Self { session_id, tx }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Enqueues a write and returns a receiver for its outcome. Writes are
    /// applied in submission order.
    pub fn submit(&self, patch: SessionPatch) -> oneshot::Receiver<Result<()>> {
        let (done, done_rx) = oneshot::channel();
        if let Err(rejected) = self.tx.send(WriteJob { patch, done }) {
            // Worker gone; report instead of dropping the write silently.
            let _ = rejected.0.done.send(Err(PomodorableError::store_unavailable(
                "write queue worker stopped",
            )));
        }
        done_rx
    }

    /// Enqueues a write and waits for it to land.
    pub async fn write(&self, patch: SessionPatch) -> Result<()> {
        self.submit(patch).await.map_err(|_| {
            PomodorableError::store_unavailable("write queue worker dropped the result")
        })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pomodorable_core::session::{
        Session, SessionDraft, SessionListWatch, SessionQuery, SessionWatch,
    };
    use std::sync::Mutex;
    use std::time::Duration;

    /// Store stub that records the order writes land in, applying a
    /// configurable latency to each rename so a slow earlier write would
    /// overtake a fast later one without serialization.
    struct LaggyStore {
        landed: Mutex<Vec<String>>,
        delays_ms: Mutex<Vec<u64>>,
    }

    impl LaggyStore {
        fn new(delays_ms: Vec<u64>) -> Self {
            Self {
                landed: Mutex::new(Vec::new()),
                delays_ms: Mutex::new(delays_ms),
            }
        }
    }

    #[async_trait]
    impl SessionStore for LaggyStore {
        async fn create(&self, _draft: SessionDraft) -> Result<Session> {
            unimplemented!("not used in these tests")
        }

        async fn get(&self, _session_id: &str) -> Result<Option<Session>> {
            Ok(None)
        }

        async fn update(&self, _session_id: &str, patch: SessionPatch) -> Result<()> {
            let delay = {
                let mut delays = self.delays_ms.lock().unwrap();
                if delays.is_empty() { 0 } else { delays.remove(0) }
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if let Some(name) = patch.name {
                self.landed.lock().unwrap().push(name);
            }
            Ok(())
        }

        async fn subscribe(&self, _session_id: &str) -> Result<SessionWatch> {
            unimplemented!("not used in these tests")
        }

        async fn query(&self, _query: SessionQuery) -> Result<SessionListWatch> {
            unimplemented!("not used in these tests")
        }
    }

    #[tokio::test]
    async fn test_writes_land_in_submission_order_despite_latency() {
        // "Foo" takes 50ms, "Bar" is instant; serialized, "Bar" still
        // lands second and wins.
        let store = Arc::new(LaggyStore::new(vec![50, 0]));
        let writer = FieldWriter::new(store.clone(), "s1");

        let first = writer.submit(SessionPatch::rename("Foo"));
        let second = writer.submit(SessionPatch::rename("Bar"));
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let landed = store.landed.lock().unwrap().clone();
        assert_eq!(landed, vec!["Foo", "Bar"]);
    }

    #[tokio::test]
    async fn test_write_reports_store_error() {
        struct FailingStore;

        #[async_trait]
        impl SessionStore for FailingStore {
            async fn create(&self, _draft: SessionDraft) -> Result<Session> {
                unimplemented!()
            }
            async fn get(&self, _session_id: &str) -> Result<Option<Session>> {
                unimplemented!()
            }
            async fn update(&self, _session_id: &str, _patch: SessionPatch) -> Result<()> {
                Err(PomodorableError::write_failed("rejected"))
            }
            async fn subscribe(&self, _session_id: &str) -> Result<SessionWatch> {
                unimplemented!()
            }
            async fn query(&self, _query: SessionQuery) -> Result<SessionListWatch> {
                unimplemented!()
            }
        }

        let writer = FieldWriter::new(Arc::new(FailingStore), "s1");
        let err = writer.write(SessionPatch::rename("x")).await.unwrap_err();
        assert!(matches!(err, PomodorableError::WriteFailed(_)));
    }
}
