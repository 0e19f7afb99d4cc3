//! Token bucket limiter and its clock capabilities.

mod clock;
mod limiter;
mod shared;
mod unit;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use limiter::{Admission, Limiter};
pub use shared::SharedLimiter;
pub use unit::TimeUnit;
