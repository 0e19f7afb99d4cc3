//! Tokenbucket - Token Bucket Rate Limiter
//!
//! This crate implements a token bucket: a limiter refilled continuously at a
//! fixed rate and capped at a burst size, for callers that need to throttle
//! their own outbound events. [`Limiter::allow`] makes the decision for an
//! explicit instant; [`Limiter::wait`] blocks until the event may proceed.
//!
//! ```
//! use std::time::Instant;
//! use tokenbucket::Limiter;
//!
//! let mut limiter = Limiter::new(10.0, 2.0)?;
//! let now = Instant::now();
//! assert!(limiter.allow(now).allowed);
//! assert!(limiter.allow(now).allowed);
//! assert!(!limiter.allow(now).allowed);
//! # Ok::<(), tokenbucket::error::TokenBucketError>(())
//! ```

pub mod config;
pub mod error;
pub mod ratelimit;

pub use ratelimit::{Admission, Clock, Limiter, SharedLimiter, SystemClock};
