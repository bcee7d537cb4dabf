//! Token refresh coordination.
//!
//! Any number of in-flight requests can hit a 401 at the same moment, but
//! the API must only ever see one `/auth/refresh` call per expiry. The
//! coordinator collapses concurrent refresh attempts into a single request
//! and answers the waiting callers in arrival order.
//!
//! The refresh itself runs on a detached task, so a caller that gives up
//! (dropped future, closed UI) cannot strand the others mid-cycle.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{oneshot, Mutex};
use tracing::debug;

/// Outcome of one refresh cycle, delivered to every caller that joined it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    #[error("no refresh token available")]
    NoSession,

    /// The API rejected or failed the refresh request.
    #[error("{0}")]
    Failed(String),

    /// The cycle ended without delivering a result (closed channel).
    #[error("refresh interrupted")]
    Interrupted,
}

#[derive(Default)]
struct GateState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<Result<String, RefreshError>>>,
}

/// Single-flight gate for token refresh. One instance is shared by every
/// clone of the API client.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<GateState>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the current refresh cycle, starting one if none is running.
    ///
    /// The first caller in becomes the leader: its `refresh_fn` is the one
    /// that runs, and it occupies the front of the waiter queue. Callers
    /// arriving while the cycle is open only enqueue; their `refresh_fn`
    /// is dropped unused. Everyone gets the same result, in the order
    /// they arrived.
    pub async fn run_exclusive<F, Fut>(self: &Arc<Self>, refresh_fn: F) -> Result<String, RefreshError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<String, RefreshError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let is_leader = {
            let mut state = self.state.lock().await;
            state.waiters.push_back(tx);
            if state.refreshing {
                false
            } else {
                state.refreshing = true;
                true
            }
        };

        if is_leader {
            let coordinator = Arc::clone(self);
            tokio::spawn(async move {
                let result = refresh_fn().await;
                coordinator.settle(result).await;
            });
        }

        rx.await.unwrap_or(Err(RefreshError::Interrupted))
    }

    /// Close the cycle: reopen the gate and drain the queue in one locked
    /// step, then hand every waiter the shared result.
    async fn settle(&self, result: Result<String, RefreshError>) {
        let waiters = {
            let mut state = self.state.lock().await;
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        debug!(waiters = waiters.len(), ok = result.is_ok(), "refresh cycle settled");
        for waiter in waiters {
            // A waiter may have gone away; the rest still get answered
            let _ = waiter.send(result.clone());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    async fn settle_tasks() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test(flavor = "current_thread")]
    async fn concurrent_callers_share_one_refresh() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                coordinator
                    .run_exclusive(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        release_rx.await.ok();
                        Ok("token-2".to_string())
                    })
                    .await
            })
        };
        settle_tasks().await;

        let mut followers = Vec::new();
        for _ in 0..4 {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            followers.push(tokio::spawn(async move {
                coordinator
                    .run_exclusive(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok("should-not-run".to_string())
                    })
                    .await
            }));
        }
        settle_tasks().await;

        release_tx.send(()).unwrap();

        assert_eq!(leader.await.unwrap(), Ok("token-2".to_string()));
        for follower in followers {
            assert_eq!(follower.await.unwrap(), Ok("token-2".to_string()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn waiters_resolve_in_arrival_order() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let mut handles = Vec::new();
        let mut release_rx = Some(release_rx);
        for index in 0..5usize {
            let coordinator = Arc::clone(&coordinator);
            let order = Arc::clone(&order);
            let gate = release_rx.take();
            handles.push(tokio::spawn(async move {
                let result = coordinator
                    .run_exclusive(move || async move {
                        if let Some(gate) = gate {
                            gate.await.ok();
                        }
                        Ok("fresh".to_string())
                    })
                    .await;
                order.lock().unwrap().push(index);
                result
            }));
            // Make sure this caller is enqueued before the next one starts
            settle_tasks().await;
        }

        release_tx.send(()).unwrap();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failure_reaches_every_waiter_and_reopens_the_gate() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                coordinator
                    .run_exclusive(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        release_rx.await.ok();
                        Err(RefreshError::Failed("refresh rejected".to_string()))
                    })
                    .await
            })
        };
        settle_tasks().await;

        let follower = {
            let coordinator = Arc::clone(&coordinator);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                coordinator
                    .run_exclusive(move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok("unused".to_string())
                    })
                    .await
            })
        };
        settle_tasks().await;

        release_tx.send(()).unwrap();
        let expected = Err(RefreshError::Failed("refresh rejected".to_string()));
        assert_eq!(leader.await.unwrap(), expected);
        assert_eq!(follower.await.unwrap(), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The failed cycle is over; the next caller starts a fresh one
        let second = {
            let calls = Arc::clone(&calls);
            coordinator
                .run_exclusive(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("token-3".to_string())
                })
                .await
        };
        assert_eq!(second, Ok("token-3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn aborted_leader_does_not_strand_followers() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let leader = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .run_exclusive(move || async move {
                        release_rx.await.ok();
                        Ok("token-2".to_string())
                    })
                    .await
            })
        };
        settle_tasks().await;

        let follower = {
            let coordinator = Arc::clone(&coordinator);
            tokio::spawn(async move {
                coordinator
                    .run_exclusive(move || async move { Ok("unused".to_string()) })
                    .await
            })
        };
        settle_tasks().await;

        // Caller goes away; the refresh it started keeps running
        leader.abort();
        settle_tasks().await;

        release_tx.send(()).unwrap();
        assert_eq!(follower.await.unwrap(), Ok("token-2".to_string()));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sequential_calls_run_separate_cycles() {
        let coordinator = Arc::new(RefreshCoordinator::new());
        let calls = Arc::new(AtomicUsize::new(0));

        for round in 1..=3usize {
            let calls = Arc::clone(&calls);
            let result = coordinator
                .run_exclusive(move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(format!("token-{round}"))
                })
                .await;
            assert_eq!(result, Ok(format!("token-{round}")));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
