//! A call collapser for expensive, idempotent actions.
//!
//! A [`Batcher`] is bound to a single action. Calling [`Batcher::invoke`] while no round is in
//! flight starts a new round that runs the action. Every caller that arrives while that round is
//! running waits for it to finish instead of starting its own. A caller therefore never returns
//! before a round that was running at (or started by) its call has completed, and at most one
//! execution of the action is active at any instant.
//!
//! The action has no error channel. It must log or otherwise handle its own failures.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use futures::future::BoxFuture;
use tokio::sync::watch;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Collapses concurrent invocations of one action into shared rounds.
///
/// ## Examples
///
/// ```
/// use std::sync::{
///     atomic::{AtomicUsize, Ordering},
///     Arc,
/// };
///
/// use dockutils::Batcher;
///
/// # #[tokio::main]
/// # async fn main() {
/// let scans = Arc::new(AtomicUsize::new(0));
/// let batcher = Batcher::new({
///     let scans = Arc::clone(&scans);
///     move || {
///         let scans = Arc::clone(&scans);
///         async move {
///             scans.fetch_add(1, Ordering::SeqCst);
///         }
///     }
/// });
///
/// batcher.invoke().await;
/// assert_eq!(scans.load(Ordering::SeqCst), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct Batcher {
    inner: Arc<Inner>,
}

struct Inner {
    /// The guarded action.
    action: Action,

    /// Whether a round is currently running.
    state: Mutex<State>,

    /// Number of completed rounds. Waiters subscribe to it and wake when it moves.
    rounds: watch::Sender<u64>,
}

/// The state of a [`Batcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No round is in flight.
    Idle,

    /// A round is in flight.
    Running {
        /// Callers that joined the round after it started.
        waiters: usize,
    },
}

type Action = Box<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Batcher {
    /// Creates a new `Batcher` bound to `action`.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (rounds, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                action: Box::new(move || Box::pin(action())),
                state: Mutex::new(State::Idle),
                rounds,
            }),
        }
    }

    /// Runs the action, or joins the round that is already running it, and waits for that round
    /// to complete.
    ///
    /// The round itself runs on a spawned task, so dropping this future does not cancel the
    /// action for the other callers of the round.
    pub async fn invoke(&self) {
        let mut completed = {
            let mut state = self.inner.lock_state();

            // Subscribing under the lock marks the current round count as seen, so the
            // completion of the running (or about to start) round is always observed.
            let completed = self.inner.rounds.subscribe();
            match &mut *state {
                State::Idle => {
                    *state = State::Running { waiters: 0 };
                    self.start_round();
                }
                State::Running { waiters } => {
                    *waiters += 1;
                    tracing::trace!(waiters = *waiters, "joined running batcher round");
                }
            }

            completed
        };

        // The sender lives in `self.inner`, so this only fails if the batcher is gone.
        let _ = completed.changed().await;
    }

    /// Returns the number of rounds completed so far.
    pub fn rounds(&self) -> u64 {
        *self.inner.rounds.borrow()
    }

    /// Returns `true` if a round is currently running.
    pub fn is_running(&self) -> bool {
        matches!(*self.inner.lock_state(), State::Running { .. })
    }

    fn start_round(&self) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // Releases the round even if the action panics.
            let inner = scopeguard::guard(inner, |inner| inner.finish_round());
            (inner.action)().await;
        });
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish_round(&self) {
        let mut state = self.lock_state();
        match *state {
            State::Running { waiters } => {
                tracing::trace!(waiters, "batcher round complete");
            }
            State::Idle => {
                debug_assert!(false, "batcher round finished while no round was running");
                tracing::error!("batcher round finished while no round was running");
            }
        }

        *state = State::Idle;
        self.rounds.send_modify(|rounds| *rounds += 1);
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, AtomicUsize, Ordering},
        time::Duration,
    };

    use tokio::sync::Barrier;

    use super::*;

    fn counting_batcher(delay: Duration) -> (Batcher, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let batcher = Batcher::new({
            let count = Arc::clone(&count);
            move || {
                let count = Arc::clone(&count);
                async move {
                    tokio::time::sleep(delay).await;
                    count.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        (batcher, count)
    }

    #[test_log::test(tokio::test)]
    async fn test_batcher_single_caller_runs_action() {
        let (batcher, count) = counting_batcher(Duration::ZERO);

        batcher.invoke().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(batcher.rounds(), 1);
        assert!(!batcher.is_running());

        batcher.invoke().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(batcher.rounds(), 2);
    }

    #[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
    async fn test_batcher_overlapping_callers_share_one_round() {
        const CALLERS: usize = 16;

        let (batcher, count) = counting_batcher(Duration::from_millis(300));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let batcher = batcher.clone();
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    batcher.invoke().await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(batcher.rounds(), 1);
    }

    #[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 4))]
    async fn test_batcher_waiters_observe_completed_round() {
        let done = Arc::new(AtomicBool::new(false));
        let batcher = Batcher::new({
            let done = Arc::clone(&done);
            move || {
                let done = Arc::clone(&done);
                async move {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    done.store(true, Ordering::SeqCst);
                }
            }
        });

        let leader = tokio::spawn({
            let batcher = batcher.clone();
            async move { batcher.invoke().await }
        });

        // Give the leader time to start the round before joining it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(batcher.is_running());

        batcher.invoke().await;
        assert!(done.load(Ordering::SeqCst));

        leader.await.unwrap();
        assert_eq!(batcher.rounds(), 1);
    }

    #[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 2))]
    async fn test_batcher_never_runs_action_concurrently() {
        let active = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicBool::new(false));
        let batcher = Batcher::new({
            let active = Arc::clone(&active);
            let overlapped = Arc::clone(&overlapped);
            move || {
                let active = Arc::clone(&active);
                let overlapped = Arc::clone(&overlapped);
                async move {
                    if active.fetch_add(1, Ordering::SeqCst) > 0 {
                        overlapped.store(true, Ordering::SeqCst);
                    }
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            }
        });

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let batcher = batcher.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(i * 5)).await;
                    batcher.invoke().await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert!(!overlapped.load(Ordering::SeqCst));
        assert!(batcher.rounds() < 32);
    }

    #[test_log::test(tokio::test)]
    async fn test_batcher_recovers_after_panicking_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let batcher = Batcher::new({
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        panic!("first round fails");
                    }
                }
            }
        });

        batcher.invoke().await;
        assert!(!batcher.is_running());

        batcher.invoke().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(batcher.rounds(), 2);
    }
}
