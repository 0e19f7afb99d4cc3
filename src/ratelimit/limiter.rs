//! Core token bucket limiter.

use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::clock::{Clock, SystemClock, TokioClock};
use crate::config::LimiterConfig;
use crate::error::{Result, TokenBucketError};

/// Outcome of a single [`Limiter::allow`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Whether the event may proceed now
    pub allowed: bool,
    /// How long until the bucket is back to zero; `Duration::ZERO` when allowed
    pub wait: Duration,
}

impl Admission {
    fn admitted() -> Self {
        Self {
            allowed: true,
            wait: Duration::ZERO,
        }
    }

    fn refused(wait: Duration) -> Self {
        Self {
            allowed: false,
            wait,
        }
    }
}

/// A token bucket refilled continuously at `rate` tokens per second and
/// capped at `burst` tokens.
///
/// Every call to [`allow`](Self::allow) charges one token, admitted or not.
/// The balance may go negative; that debt is what the returned wait duration
/// is computed from, and the next refill pays it off before anything else is
/// admitted.
///
/// The limiter holds no locks and takes `&mut self`. Wrap it in a
/// [`SharedLimiter`](super::SharedLimiter) to throttle several threads or
/// tasks through one bucket.
#[derive(Debug, Clone)]
pub struct Limiter<C: Clock = SystemClock> {
    /// Refill rate in tokens per second
    rate: f64,
    /// Maximum token balance
    burst: f64,
    /// Current balance, negative while in debt
    tokens: f64,
    /// When the balance was last refreshed
    last: Instant,
    clock: C,
}

impl Limiter<SystemClock> {
    /// Create a limiter that starts with a full bucket.
    pub fn new(rate: f64, burst: f64) -> Result<Self> {
        Self::with_clock(rate, burst, burst, SystemClock)
    }

    /// Create a limiter that starts with `tokens` in the bucket.
    pub fn with_tokens(rate: f64, burst: f64, tokens: f64) -> Result<Self> {
        Self::with_clock(rate, burst, tokens, SystemClock)
    }

    /// Create a limiter from its configuration.
    pub fn from_config(config: &LimiterConfig) -> Result<Self> {
        Self::from_config_with_clock(config, SystemClock)
    }
}

impl<C: Clock> Limiter<C> {
    /// Create a limiter reading time from `clock`.
    ///
    /// Fails if `rate` is not a positive finite number, `burst` is negative
    /// or not finite, or `tokens` is not finite. A starting balance above
    /// `burst` is accepted and clamped by the first `allow`.
    pub fn with_clock(rate: f64, burst: f64, tokens: f64, clock: C) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(TokenBucketError::InvalidRate(rate));
        }
        if !burst.is_finite() || burst < 0.0 {
            return Err(TokenBucketError::InvalidBurst(burst));
        }
        if !tokens.is_finite() {
            return Err(TokenBucketError::InvalidTokens(tokens));
        }

        let last = clock.now();
        debug!(rate, burst, tokens, "Creating token bucket limiter");

        Ok(Self {
            rate,
            burst,
            tokens,
            last,
            clock,
        })
    }

    /// Create a limiter from its configuration, reading time from `clock`.
    pub fn from_config_with_clock(config: &LimiterConfig, clock: C) -> Result<Self> {
        let tokens = config.initial_tokens.unwrap_or(config.burst);
        Self::with_clock(config.rate(), config.burst, tokens, clock)
    }

    /// Decide whether one event may proceed at `now`, charging one token.
    ///
    /// `last` moves to `now` whatever the outcome, so elapsed time is never
    /// counted twice. Passing a `now` earlier than the previous call's
    /// yields negative elapsed time and drains the bucket accordingly.
    pub fn allow(&mut self, now: Instant) -> Admission {
        let elapsed = signed_secs_between(self.last, now);

        self.tokens += self.rate * elapsed;
        self.last = now;

        if self.tokens > self.burst {
            self.tokens = self.burst;
        }

        self.tokens -= 1.0;

        if self.tokens < 0.0 {
            // Saturates when the debt is too large for a Duration.
            let wait = Duration::try_from_secs_f64(-self.tokens / self.rate)
                .unwrap_or(Duration::MAX);
            debug!(
                tokens = self.tokens,
                wait_ms = wait.as_secs_f64() * 1000.0,
                "Token bucket empty"
            );
            Admission::refused(wait)
        } else {
            trace!(tokens = self.tokens, elapsed, "Token acquired");
            Admission::admitted()
        }
    }

    /// Block until one event may proceed.
    ///
    /// Sleeps once for the exact duration returned by `allow`; there is no
    /// re-check afterwards.
    pub fn wait(&mut self) {
        let admission = self.allow(self.clock.now());
        if !admission.allowed {
            self.clock.sleep(admission.wait);
        }
    }

    /// Refill rate in tokens per second.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Maximum token balance.
    pub fn burst(&self) -> f64 {
        self.burst
    }

    /// Balance as of the last `allow`, without refilling.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    /// Instant of the last `allow`, or of construction.
    pub fn last(&self) -> Instant {
        self.last
    }

    /// The clock this limiter reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl Limiter<TokioClock> {
    /// Async counterpart of [`wait`](Self::wait) on the tokio timer.
    ///
    /// Only available with [`TokioClock`], so the instant the wait is computed
    /// from and the timer it sleeps on are the same clock. Dropping the future
    /// cancels the sleep, but the token has already been charged.
    pub async fn wait_async(&mut self) {
        let admission = self.allow(self.clock.now());
        if !admission.allowed {
            tokio::time::sleep(admission.wait).await;
        }
    }
}

/// `to - from` in seconds, negative when `to` precedes `from`.
fn signed_secs_between(from: Instant, to: Instant) -> f64 {
    match to.checked_duration_since(from) {
        Some(elapsed) => elapsed.as_secs_f64(),
        None => -from.duration_since(to).as_secs_f64(),
    }
}
