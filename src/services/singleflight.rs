//! Request Deduplication
//!
//! Coalesces concurrent identical requests onto a single in-flight
//! computation. The first caller for a key becomes the leader and spawns the
//! producer; every caller that arrives while the key is in flight registers a
//! waiter and receives a clone of the same settlement, success or failure.
//!
//! The producer runs on a detached task, so a caller dropping its future
//! (client disconnect) never cancels the shared computation: the remaining
//! waiters still settle. The key is removed before waiters are woken, so a
//! request arriving after settlement starts a fresh flight.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

type Waiters<T, E> = Vec<oneshot::Sender<Result<T, E>>>;

/// Coalesces concurrent identical computations by key.
///
/// Thread-safe and designed to be wrapped in `Arc`. `E: From<String>` covers
/// the internal abort path (producer task lost before settling).
pub struct RequestDeduplicator<T, E> {
    in_flight: Arc<Mutex<HashMap<String, Waiters<T, E>>>>,
}

impl<T, E> RequestDeduplicator<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + From<String> + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Run `producer` for `key`, or wait on the flight already running for it.
    ///
    /// Exactly one producer runs per key at a time; all callers observe the
    /// same result.
    pub async fn run<F, Fut>(&self, key: &str, producer: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let (rx, is_leader) = {
            let mut in_flight = self.in_flight.lock().await;
            let (tx, rx) = oneshot::channel();
            match in_flight.get_mut(key) {
                Some(waiters) => {
                    waiters.push(tx);
                    (rx, false)
                }
                None => {
                    // Insert-if-absent and the leader decision are one atomic
                    // step under the lock
                    in_flight.insert(key.to_string(), vec![tx]);
                    (rx, true)
                }
            }
        };

        if is_leader {
            let in_flight = self.in_flight.clone();
            let key = key.to_string();
            // Detached: the leader awaiting rx below may be dropped without
            // cancelling the computation the other waiters depend on
            let producer_task = tokio::spawn(producer());
            // Settlement runs on its own task and joins the producer, so a
            // panicking producer still frees the key and wakes the waiters
            tokio::spawn(async move {
                let result = match producer_task.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        tracing::error!(key = %key, error = %join_err, "in-flight producer failed");
                        Err(E::from(format!("in-flight producer failed: {join_err}")))
                    }
                };
                let waiters = {
                    let mut in_flight = in_flight.lock().await;
                    in_flight.remove(&key).unwrap_or_default()
                };
                tracing::debug!(key = %key, waiters = waiters.len(), "flight settled");
                for waiter in waiters {
                    // A waiter that went away is not an error
                    let _ = waiter.send(result.clone());
                }
            });
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(E::from("in-flight request was aborted".to_string())),
        }
    }

    /// Number of keys currently in flight.
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

impl<T, E> Default for RequestDeduplicator<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + From<String> + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
