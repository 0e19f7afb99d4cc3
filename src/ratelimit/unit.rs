//! Time units for expressing refill rates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time unit a configured rate is expressed in.
///
/// Configuration files say "600 per minute"; the limiter itself works in
/// events per second, so every unit converts through [`TimeUnit::per_second`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Per-second rate
    #[default]
    Second,
    /// Per-minute rate
    Minute,
    /// Per-hour rate
    Hour,
    /// Per-day rate
    Day,
}

impl TimeUnit {
    /// Get the duration of this time unit.
    pub fn duration(&self) -> Duration {
        match self {
            TimeUnit::Second => Duration::from_secs(1),
            TimeUnit::Minute => Duration::from_secs(60),
            TimeUnit::Hour => Duration::from_secs(3600),
            TimeUnit::Day => Duration::from_secs(86400),
        }
    }

    /// Convert `count` events per this unit into events per second.
    pub fn per_second(&self, count: f64) -> f64 {
        count / self.duration().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_unit_duration() {
        assert_eq!(TimeUnit::Second.duration(), Duration::from_secs(1));
        assert_eq!(TimeUnit::Minute.duration(), Duration::from_secs(60));
        assert_eq!(TimeUnit::Hour.duration(), Duration::from_secs(3600));
        assert_eq!(TimeUnit::Day.duration(), Duration::from_secs(86400));
    }

    #[test]
    fn test_per_second_conversion() {
        assert_eq!(TimeUnit::Second.per_second(10.0), 10.0);
        assert_eq!(TimeUnit::Minute.per_second(120.0), 2.0);
        assert_eq!(TimeUnit::Hour.per_second(7200.0), 2.0);
        assert_eq!(TimeUnit::Day.per_second(86400.0), 1.0);
    }

    #[test]
    fn test_time_unit_deserializes_lowercase() {
        let unit: TimeUnit = serde_yaml::from_str("minute").unwrap();
        assert_eq!(unit, TimeUnit::Minute);
        assert!(serde_yaml::from_str::<TimeUnit>("Fortnight").is_err());
    }
}
