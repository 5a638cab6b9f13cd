use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::shift::{ShiftAssignment, ShiftType};
use crate::rules::error::RuleError;
use crate::rules::time::minute_of_day;

/// Resolves the working window for an assignment. Explicit times always win;
/// the named types fill in whichever side is missing. `custom` has no
/// defaults, so both times are required.
pub fn resolve_shift_times(
    shift_type: ShiftType,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Result<(NaiveTime, NaiveTime), RuleError> {
    match shift_type.default_times() {
        Some((default_start, default_end)) => Ok((
            start_time.unwrap_or(default_start),
            end_time.unwrap_or(default_end),
        )),
        None => match (start_time, end_time) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(RuleError::MissingFields),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdherenceVerdict {
    OnTime,
    Early,
    Late,
}

/// How a clock-in sits against the assigned shift start. Advisory only; a
/// warning never blocks the punch.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct Adherence {
    pub verdict: AdherenceVerdict,
    /// Minutes after the assigned start; negative means early.
    pub delta_minutes: i64,
    pub warning: bool,
}

pub fn check_adherence(
    actual: NaiveTime,
    assigned_start: NaiveTime,
    threshold_minutes: i64,
) -> Adherence {
    let delta_minutes = minute_of_day(actual) - minute_of_day(assigned_start);
    let verdict = match delta_minutes {
        0 => AdherenceVerdict::OnTime,
        d if d < 0 => AdherenceVerdict::Early,
        _ => AdherenceVerdict::Late,
    };
    Adherence {
        verdict,
        delta_minutes,
        warning: delta_minutes.abs() > threshold_minutes,
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShiftStats {
    pub total: u32,
    /// Assignment counts keyed by shift type name.
    pub by_type: BTreeMap<String, u32>,
}

pub fn shift_stats(assignments: &[ShiftAssignment]) -> ShiftStats {
    let mut by_type: BTreeMap<String, u32> = BTreeMap::new();
    for a in assignments {
        *by_type.entry(a.shift_type.to_string()).or_insert(0) += 1;
    }
    ShiftStats {
        total: assignments.len() as u32,
        by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn named_shifts_fill_missing_times() {
        let (start, end) = resolve_shift_times(ShiftType::Early, None, None).unwrap();
        assert_eq!((start, end), (hm(8, 0), hm(16, 0)));

        let (start, end) = resolve_shift_times(ShiftType::Night, None, None).unwrap();
        assert_eq!((start, end), (hm(16, 0), hm(0, 0)), "night ends at midnight");
    }

    #[test]
    fn explicit_times_override_defaults() {
        let (start, end) =
            resolve_shift_times(ShiftType::Mid, Some(hm(13, 0)), None).unwrap();
        assert_eq!(start, hm(13, 0), "given start wins");
        assert_eq!(end, hm(20, 0), "missing end falls back");
    }

    #[test]
    fn custom_without_times_is_rejected() {
        match resolve_shift_times(ShiftType::Custom, Some(hm(10, 0)), None) {
            Err(RuleError::MissingFields) => {}
            other => panic!("expected MissingFields, got {other:?}"),
        }
        let (start, end) =
            resolve_shift_times(ShiftType::Custom, Some(hm(10, 0)), Some(hm(19, 0))).unwrap();
        assert_eq!((start, end), (hm(10, 0), hm(19, 0)));
    }

    #[test]
    fn exact_arrival_is_on_time() {
        let a = check_adherence(hm(8, 0), hm(8, 0), 30);
        assert_eq!(a.verdict, AdherenceVerdict::OnTime);
        assert_eq!(a.delta_minutes, 0);
        assert!(!a.warning);
    }

    #[test]
    fn late_within_threshold_does_not_warn() {
        let a = check_adherence(hm(8, 20), hm(8, 0), 30);
        assert_eq!(a.verdict, AdherenceVerdict::Late);
        assert_eq!(a.delta_minutes, 20);
        assert!(!a.warning);
    }

    #[test]
    fn late_past_threshold_warns() {
        let a = check_adherence(hm(8, 31), hm(8, 0), 30);
        assert_eq!(a.verdict, AdherenceVerdict::Late);
        assert!(a.warning);
    }

    #[test]
    fn very_early_arrival_also_warns() {
        let a = check_adherence(hm(6, 45), hm(8, 0), 30);
        assert_eq!(a.verdict, AdherenceVerdict::Early);
        assert_eq!(a.delta_minutes, -75);
        assert!(a.warning);
    }

    #[test]
    fn stats_count_by_type() {
        use chrono::NaiveDate;
        let assignment = |id: &str, shift_type: ShiftType| ShiftAssignment {
            id: id.into(),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            date: NaiveDate::from_ymd_opt(2026, 8, 3).unwrap(),
            shift_type,
            start_time: hm(8, 0),
            end_time: hm(16, 0),
            location: None,
            note: None,
        };
        let stats = shift_stats(&[
            assignment("S1", ShiftType::Early),
            assignment("S2", ShiftType::Early),
            assignment("S3", ShiftType::Night),
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_type.get("early"), Some(&2));
        assert_eq!(stats.by_type.get("night"), Some(&1));
        assert_eq!(stats.by_type.get("mid"), None);
    }
}
