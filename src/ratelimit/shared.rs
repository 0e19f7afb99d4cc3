//! Mutex-guarded limiter handle for throttling several callers through one
//! bucket.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::trace;

use super::clock::{Clock, SystemClock, TokioClock};
use super::limiter::{Admission, Limiter};

/// A cloneable, thread-safe handle to a single [`Limiter`].
///
/// The lock is held only for the `allow` bookkeeping. Sleeping happens after
/// it is released, so other callers can take their own token (and queue up
/// their own debt) while one caller is waiting.
pub struct SharedLimiter<C: Clock = SystemClock> {
    inner: Arc<Mutex<Limiter<C>>>,
}

impl<C: Clock + Clone> SharedLimiter<C> {
    /// Wrap a limiter for shared use.
    pub fn new(limiter: Limiter<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Decide whether one event may proceed at `now`.
    pub fn allow(&self, now: Instant) -> Admission {
        self.inner.lock().allow(now)
    }

    /// Block until one event may proceed.
    pub fn wait(&self) {
        let (admission, clock) = {
            let mut limiter = self.inner.lock();
            let now = limiter.clock().now();
            (limiter.allow(now), limiter.clock().clone())
        };

        if !admission.allowed {
            trace!(wait = ?admission.wait, "Waiting for shared bucket");
            clock.sleep(admission.wait);
        }
    }

    /// Balance as of the last `allow`.
    pub fn tokens(&self) -> f64 {
        self.inner.lock().tokens()
    }
}

impl SharedLimiter<TokioClock> {
    /// Async counterpart of [`wait`](Self::wait) on the tokio timer.
    ///
    /// Only available with [`TokioClock`], whose instants follow the same
    /// timer the task sleeps on.
    pub async fn wait_async(&self) {
        let admission = {
            let mut limiter = self.inner.lock();
            let now = limiter.clock().now();
            limiter.allow(now)
        };

        if !admission.allowed {
            trace!(wait = ?admission.wait, "Waiting for shared bucket");
            tokio::time::sleep(admission.wait).await;
        }
    }
}

impl<C: Clock> Clone for SharedLimiter<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
