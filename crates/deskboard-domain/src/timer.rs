//! Timer field arithmetic.
//!
//! A timer is "running" exactly when its start field holds a valid
//! millisecond Unix timestamp. Cumulative durations are decimal-minute
//! strings, rounded to two places on every write.

use crate::fields::FieldName;
use serde::{Deserialize, Serialize};

/// Start values at or below this are corrupt (seconds-resolution or
/// garbage) and are ignored.
pub const TIMER_EPOCH_FLOOR_MS: i64 = 1_000_000_000_000;

/// The two independent timers a card carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    Active,
    Work,
}

impl TimerKind {
    pub fn start_field(self) -> FieldName {
        match self {
            TimerKind::Active => FieldName::TimerStart,
            TimerKind::Work => FieldName::WorkTimerStart,
        }
    }

    pub fn duration_field(self) -> FieldName {
        match self {
            TimerKind::Active => FieldName::Duration,
            TimerKind::Work => FieldName::WorkDuration,
        }
    }
}

/// Parse a start field value. Returns `None` for empty, non-numeric, or
/// below-floor values.
pub fn parse_timer_start(raw: &str) -> Option<i64> {
    let ms: i64 = raw.trim().parse().ok()?;
    (ms > TIMER_EPOCH_FLOOR_MS).then_some(ms)
}

/// Parse a cumulative duration, treating anything unreadable as zero.
pub fn parse_duration_minutes(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

/// Minutes elapsed between start and stop, clamped at zero so a clock
/// skew can never shrink a duration.
pub fn elapsed_minutes(start_ms: i64, stop_ms: i64) -> f64 {
    (stop_ms - start_ms).max(0) as f64 / 60_000.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Add minutes onto a prior cumulative duration and format the result
/// for writing back.
pub fn accumulate_duration(prior_raw: &str, add_minutes: f64) -> String {
    let total = round2(parse_duration_minutes(prior_raw) + add_minutes);
    format!("{}", total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timer_start_valid() {
        assert_eq!(parse_timer_start("1700000000000"), Some(1_700_000_000_000));
    }

    #[test]
    fn test_parse_timer_start_rejects_corrupt() {
        // Empty, garbage, and seconds-resolution values are all ignored
        assert_eq!(parse_timer_start(""), None);
        assert_eq!(parse_timer_start("soon"), None);
        assert_eq!(parse_timer_start("1700000000"), None);
        assert_eq!(parse_timer_start("1000000000000"), None);
    }

    #[test]
    fn test_elapsed_minutes_clamps_negative() {
        assert_eq!(elapsed_minutes(2_000_000_000_000, 1_999_999_999_000), 0.0);
    }

    #[test]
    fn test_elapsed_125_seconds() {
        let start = 1_700_000_000_000;
        let elapsed = elapsed_minutes(start, start + 125_000);
        assert_eq!(round2(elapsed), 2.08);
    }

    #[test]
    fn test_accumulate_duration() {
        let start = 1_700_000_000_000;
        let elapsed = elapsed_minutes(start, start + 125_000);
        assert_eq!(accumulate_duration("1.5", elapsed), "3.58");
        assert_eq!(accumulate_duration("", elapsed), "2.08");
        assert_eq!(accumulate_duration("not a number", 1.0), "1");
    }

    #[test]
    fn test_accumulate_never_decreases() {
        let prior = 7.25;
        let result: f64 = accumulate_duration("7.25", elapsed_minutes(10, 5))
            .parse()
            .unwrap();
        assert!(result >= prior);
    }

    #[test]
    fn test_timer_kind_fields() {
        assert_eq!(TimerKind::Active.start_field(), FieldName::TimerStart);
        assert_eq!(TimerKind::Active.duration_field(), FieldName::Duration);
        assert_eq!(TimerKind::Work.start_field(), FieldName::WorkTimerStart);
        assert_eq!(TimerKind::Work.duration_field(), FieldName::WorkDuration);
    }
}
