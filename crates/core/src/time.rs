use chrono::{DateTime, Utc};

/// Clock abstraction so sessions, results and records get deterministic
/// timestamps in tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Whole seconds elapsed between two instants, clamped at zero.
#[must_use]
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    u64::try_from((end - start).num_seconds()).unwrap_or(0)
}

/// Countdown display, e.g. `4:05`.
#[must_use]
pub fn format_countdown(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Time-spent display used in history, e.g. `4m 5s`.
#[must_use]
pub fn format_time_spent(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fixed_clock_measures_elapsed_time() {
        let start = fixed_clock().now();
        let end = Clock::fixed(start + Duration::seconds(90)).now();
        assert_eq!(elapsed_seconds(start, end), 90);
    }

    #[test]
    fn elapsed_never_negative() {
        let later = fixed_now() + Duration::seconds(5);
        assert_eq!(elapsed_seconds(later, fixed_now()), 0);
    }

    #[test]
    fn formats_countdown_and_time_spent() {
        assert_eq!(format_countdown(245), "4:05");
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_time_spent(125), "2m 5s");
    }
}
