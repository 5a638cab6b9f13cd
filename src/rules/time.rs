use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::rules::error::RuleError;

/// Pay-tier classification of a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    RestDay,
    Holiday,
}

/// Parses a wall-clock "HH:MM" string. Single-digit hours are accepted,
/// trailing garbage is not.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, RuleError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|_| RuleError::InvalidTime)
}

/// Minutes elapsed since midnight.
pub fn minute_of_day(t: NaiveTime) -> i64 {
    (t.hour() * 60 + t.minute()) as i64
}

/// Elapsed hours from `start` to `end`, rounded to one decimal. A span whose
/// end precedes its start is taken to cross midnight, so 22:00 -> 02:00 is
/// 4.0 hours. Identical endpoints yield 0.0; the caller decides whether that
/// is an error.
pub fn span_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let minutes = (minute_of_day(end) - minute_of_day(start)).rem_euclid(24 * 60);
    round1(minutes as f64 / 60.0)
}

/// Round to one decimal place, the precision used for reported hours.
pub fn round1(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Classifies a date for overtime tiering. A configured statutory holiday
/// outranks the weekend rest days.
pub fn day_kind(date: NaiveDate, holidays: &BTreeSet<NaiveDate>) -> DayKind {
    if holidays.contains(&date) {
        DayKind::Holiday
    } else if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        DayKind::RestDay
    } else {
        DayKind::Weekday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_plain_and_padded_times() {
        assert_eq!(parse_hhmm("08:30"), Ok(t(8, 30)));
        assert_eq!(parse_hhmm("8:30"), Ok(t(8, 30)));
        assert_eq!(parse_hhmm(" 23:59 "), Ok(t(23, 59)));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "8", "24:00", "12:60", "12:00:00", "noon", "12-30"] {
            assert_eq!(parse_hhmm(bad), Err(RuleError::InvalidTime), "input {bad:?}");
        }
    }

    #[test]
    fn span_within_one_day() {
        assert_eq!(span_hours(t(9, 0), t(17, 30)), 8.5);
        assert_eq!(span_hours(t(18, 0), t(20, 30)), 2.5);
    }

    #[test]
    fn span_wraps_across_midnight() {
        assert_eq!(span_hours(t(22, 0), t(2, 0)), 4.0);
        assert_eq!(span_hours(t(16, 0), t(0, 0)), 8.0);
        assert_eq!(span_hours(t(23, 30), t(0, 15)), 0.8);
    }

    #[test]
    fn zero_span_stays_zero() {
        assert_eq!(span_hours(t(9, 0), t(9, 0)), 0.0);
    }

    #[test]
    fn day_kind_prefers_holiday_over_weekend() {
        let mut holidays = BTreeSet::new();
        // 2026-01-01 falls on a Thursday, 2026-02-28 on a Saturday.
        holidays.insert(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        holidays.insert(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());

        assert_eq!(
            day_kind(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), &holidays),
            DayKind::Holiday
        );
        assert_eq!(
            day_kind(NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(), &holidays),
            DayKind::Holiday,
            "configured holiday on a Saturday must not degrade to a rest day"
        );
        assert_eq!(
            day_kind(NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(), &holidays),
            DayKind::RestDay
        );
        assert_eq!(
            day_kind(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), &holidays),
            DayKind::Weekday
        );
    }
}
