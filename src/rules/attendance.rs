use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::model::attendance::{AdjustmentRequest, DailyAttendance, DayStatus, Punch, PunchType};
use crate::model::period::YearMonth;
use crate::model::review::ReviewStatus;
use crate::rules::time::span_hours;

/// Classifies one attendance day from its punches and repair requests.
///
/// Priority: a pending repair marks the whole day as awaiting review;
/// approved repairs are merged into the punch set before the missing checks,
/// so a repaired hole no longer reads as missing; a clean day with an
/// approved repair on file reads `approved-repair` rather than `normal`.
/// Pure function; duplicate punches are kept as-is.
pub fn classify_day(punches: &[Punch], adjustments: &[AdjustmentRequest]) -> DayStatus {
    if adjustments.iter().any(|a| a.review.status == ReviewStatus::Pending) {
        return DayStatus::PendingRepair;
    }

    let repaired = |t: PunchType| {
        adjustments
            .iter()
            .any(|a| a.review.status == ReviewStatus::Approved && a.punch_type == t)
    };
    let has_in =
        punches.iter().any(|p| p.punch_type == PunchType::In) || repaired(PunchType::In);
    let has_out =
        punches.iter().any(|p| p.punch_type == PunchType::Out) || repaired(PunchType::Out);

    if !has_in {
        return DayStatus::MissingIn;
    }
    if !has_out {
        return DayStatus::MissingOut;
    }
    if adjustments
        .iter()
        .any(|a| a.review.status == ReviewStatus::Approved)
    {
        return DayStatus::ApprovedRepair;
    }
    DayStatus::Normal
}

/// Earliest IN punch of the day, the canonical arrival time.
pub fn first_in(punches: &[Punch]) -> Option<NaiveTime> {
    punches
        .iter()
        .filter(|p| p.punch_type == PunchType::In)
        .map(|p| p.time)
        .min()
}

/// Latest OUT punch of the day, the canonical departure time.
pub fn last_out(punches: &[Punch]) -> Option<NaiveTime> {
    punches
        .iter()
        .filter(|p| p.punch_type == PunchType::Out)
        .map(|p| p.time)
        .max()
}

/// Hours worked on a day, earliest IN to latest OUT with midnight rollover.
/// None when either side of the pair is missing.
pub fn paired_hours(punches: &[Punch]) -> Option<f64> {
    let start = first_in(punches)?;
    let end = last_out(punches)?;
    Some(span_hours(start, end))
}

/// Per-day classification over a month, capped at `today` so future dates
/// are never classified. Days with neither punches nor repair requests are
/// omitted.
pub fn month_summary(
    punches: &[Punch],
    adjustments: &[AdjustmentRequest],
    month: YearMonth,
    today: NaiveDate,
) -> Vec<DailyAttendance> {
    let mut by_day: BTreeMap<NaiveDate, (Vec<Punch>, Vec<AdjustmentRequest>)> = BTreeMap::new();
    for p in punches {
        by_day.entry(p.date).or_default().0.push(p.clone());
    }
    for a in adjustments {
        by_day.entry(a.date).or_default().1.push(a.clone());
    }

    by_day
        .into_iter()
        .filter(|(date, _)| month.contains(*date) && *date <= today)
        .map(|(date, (mut day_punches, day_adjustments))| {
            day_punches.sort_by_key(|p| p.time);
            DailyAttendance {
                date,
                status: classify_day(&day_punches, &day_adjustments),
                punches: day_punches,
            }
        })
        .collect()
}

/// Days an employee still has to fix: missing one side of the punch pair.
/// Repair-pending days are excluded, they are already in an admin's queue.
pub fn abnormal_days(summary: Vec<DailyAttendance>) -> Vec<DailyAttendance> {
    summary
        .into_iter()
        .filter(|d| matches!(d.status, DayStatus::MissingIn | DayStatus::MissingOut))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::model::attendance::PunchSource;
    use crate::model::review::ReviewState;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn punch(day: u32, hhmm: (u32, u32), punch_type: PunchType) -> Punch {
        Punch {
            id: format!("P{day}{}{}", hhmm.0, hhmm.1),
            employee_id: "E001".into(),
            date: date(day),
            time: NaiveTime::from_hms_opt(hhmm.0, hhmm.1, 0).unwrap(),
            punch_type,
            source: PunchSource::Device,
            location: None,
            note: None,
        }
    }

    fn adjustment(day: u32, punch_type: PunchType, status: ReviewStatus) -> AdjustmentRequest {
        let mut review = ReviewState::pending();
        review.status = status;
        AdjustmentRequest {
            id: "ADJ1".into(),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            date: date(day),
            punch_type,
            requested_time: NaiveDateTime::new(
                date(day),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ),
            note: None,
            review,
            submitted_at: NaiveDateTime::new(date(day), NaiveTime::from_hms_opt(20, 0, 0).unwrap()),
        }
    }

    #[test]
    fn clean_pair_is_normal() {
        let punches = vec![
            punch(3, (8, 58), PunchType::In),
            punch(3, (18, 4), PunchType::Out),
        ];
        assert_eq!(classify_day(&punches, &[]), DayStatus::Normal);
    }

    #[test]
    fn only_out_is_missing_in() {
        let punches = vec![punch(3, (18, 4), PunchType::Out)];
        assert_eq!(classify_day(&punches, &[]), DayStatus::MissingIn);
    }

    #[test]
    fn only_in_is_missing_out() {
        let punches = vec![punch(3, (8, 58), PunchType::In)];
        assert_eq!(classify_day(&punches, &[]), DayStatus::MissingOut);
    }

    #[test]
    fn pending_repair_outranks_missing() {
        let punches = vec![punch(3, (8, 58), PunchType::In)];
        let adj = vec![adjustment(3, PunchType::Out, ReviewStatus::Pending)];
        assert_eq!(classify_day(&punches, &adj), DayStatus::PendingRepair);
    }

    #[test]
    fn approved_repair_fills_the_hole() {
        let punches = vec![punch(3, (8, 58), PunchType::In)];
        let adj = vec![adjustment(3, PunchType::Out, ReviewStatus::Approved)];
        assert_eq!(classify_day(&punches, &adj), DayStatus::ApprovedRepair);
    }

    #[test]
    fn approved_repair_for_the_wrong_side_still_missing() {
        let punches = vec![punch(3, (18, 4), PunchType::Out)];
        let adj = vec![adjustment(3, PunchType::Out, ReviewStatus::Approved)];
        assert_eq!(
            classify_day(&punches, &adj),
            DayStatus::MissingIn,
            "an approved OUT repair cannot stand in for the missing IN"
        );
    }

    #[test]
    fn rejected_adjustment_does_not_affect_classification() {
        let punches = vec![
            punch(3, (8, 58), PunchType::In),
            punch(3, (18, 4), PunchType::Out),
        ];
        let adj = vec![adjustment(3, PunchType::Out, ReviewStatus::Rejected)];
        assert_eq!(classify_day(&punches, &adj), DayStatus::Normal);
    }

    #[test]
    fn duplicate_punches_use_earliest_in_latest_out() {
        let punches = vec![
            punch(3, (9, 10), PunchType::In),
            punch(3, (8, 58), PunchType::In),
            punch(3, (12, 0), PunchType::Out),
            punch(3, (18, 58), PunchType::Out),
        ];
        assert_eq!(first_in(&punches), NaiveTime::from_hms_opt(8, 58, 0));
        assert_eq!(last_out(&punches), NaiveTime::from_hms_opt(18, 58, 0));
        assert_eq!(paired_hours(&punches), Some(10.0));
        assert_eq!(classify_day(&punches, &[]), DayStatus::Normal);
    }

    #[test]
    fn month_summary_skips_future_and_empty_days() {
        let punches = vec![
            punch(3, (8, 58), PunchType::In),
            punch(3, (18, 4), PunchType::Out),
            punch(20, (9, 0), PunchType::In),
        ];
        let month: YearMonth = "2026-08".parse().unwrap();

        let summary = month_summary(&punches, &[], month, date(10));
        assert_eq!(summary.len(), 1, "day 20 is in the future on the 10th");
        assert_eq!(summary[0].date, date(3));
        assert_eq!(summary[0].status, DayStatus::Normal);

        let summary = month_summary(&punches, &[], month, date(25));
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].status, DayStatus::MissingOut);
    }

    #[test]
    fn abnormal_listing_keeps_only_missing_days() {
        let punches = vec![
            punch(3, (8, 58), PunchType::In),
            punch(3, (18, 4), PunchType::Out),
            punch(4, (9, 0), PunchType::In),
            punch(5, (18, 0), PunchType::Out),
        ];
        let adj = vec![adjustment(6, PunchType::In, ReviewStatus::Pending)];
        let month: YearMonth = "2026-08".parse().unwrap();

        let abnormal = abnormal_days(month_summary(&punches, &adj, month, date(31)));
        let statuses: Vec<_> = abnormal.iter().map(|d| (d.date, d.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (date(4), DayStatus::MissingOut),
                (date(5), DayStatus::MissingIn),
            ],
            "repair-pending day 6 belongs to the review queue, not this list"
        );
    }
}
