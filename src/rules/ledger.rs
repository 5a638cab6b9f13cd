use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use strum::IntoEnumIterator;

use crate::model::leave::{LeaveBalance, LeaveRequest, LeaveType};
use crate::model::period::YearMonth;
use crate::model::review::{ReviewAction, ReviewState, ReviewStatus, Reviewer};
use crate::rules::error::RuleError;
use crate::rules::time::span_hours;

/// Inclusive day count of a leave span; a one-day leave is 1.
pub fn validate_leave_span(start: NaiveDate, end: NaiveDate) -> Result<i64, RuleError> {
    if end < start {
        return Err(RuleError::EndBeforeStart);
    }
    Ok((end - start).num_days() + 1)
}

/// Overtime hours for a span, `(end - start) mod 24` rounded to one decimal.
/// A zero span is rejected; an end before the start crosses midnight.
pub fn validate_overtime_span(start: NaiveTime, end: NaiveTime) -> Result<f64, RuleError> {
    let hours = span_hours(start, end);
    if hours <= 0.0 {
        return Err(RuleError::InvalidHours);
    }
    Ok(hours)
}

/// Applies an admin decision to a pending request, stamping reviewer
/// identity, comment and timestamp. A request can be reviewed exactly once.
pub fn apply_review(
    review: &mut ReviewState,
    action: ReviewAction,
    reviewer: &Reviewer,
    comment: Option<String>,
    now: NaiveDateTime,
) -> Result<(), RuleError> {
    if review.status != ReviewStatus::Pending {
        return Err(RuleError::AlreadyReviewed);
    }
    review.status = match action {
        ReviewAction::Approve => ReviewStatus::Approved,
        ReviewAction::Reject => ReviewStatus::Rejected,
    };
    review.reviewer_id = Some(reviewer.id.clone());
    review.reviewer_name = Some(reviewer.name.clone());
    review.comment = comment;
    review.reviewed_at = Some(now);
    Ok(())
}

/// A punch backfill may only target the current month, and never the future.
pub fn validate_adjustment_window(
    requested: NaiveDateTime,
    today: NaiveDate,
) -> Result<(), RuleError> {
    let month_start = YearMonth::of(today).first_day();
    if requested.date() < month_start {
        return Err(RuleError::BeforeMonthStart);
    }
    if requested.date() > today {
        return Err(RuleError::AfterToday);
    }
    Ok(())
}

/// Unpaid-leave days of `leaves` that fall inside `month`. Spans straddling
/// the month boundary are clipped to it. Callers pass approved leaves only.
pub fn unpaid_leave_days(leaves: &[LeaveRequest], month: YearMonth) -> i64 {
    leaves
        .iter()
        .filter(|l| l.leave_type.is_unpaid())
        .map(|l| {
            let start = l.start_date.max(month.first_day());
            let end = l.end_date.min(month.last_day());
            if end < start { 0 } else { (end - start).num_days() + 1 }
        })
        .sum()
}

/// Per-type balances for one calendar year, quota minus approved days used.
/// A leave is counted against the year its start date falls in.
pub fn leave_balances(approved: &[LeaveRequest], year: i32) -> Vec<LeaveBalance> {
    LeaveType::iter()
        .map(|leave_type| {
            let used: i64 = approved
                .iter()
                .filter(|l| l.leave_type == leave_type && l.start_date.year() == year)
                .map(|l| l.days)
                .sum();
            LeaveBalance {
                leave_type,
                quota: leave_type.annual_quota(),
                used,
                remaining: leave_type.annual_quota() - used,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::review::ReviewState;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn leave(leave_type: LeaveType, start: NaiveDate, end: NaiveDate) -> LeaveRequest {
        let mut review = ReviewState::pending();
        review.status = ReviewStatus::Approved;
        LeaveRequest {
            id: "LV1".into(),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            leave_type,
            start_date: start,
            end_date: end,
            days: (end - start).num_days() + 1,
            reason: None,
            review,
            submitted_at: NaiveDateTime::new(start, t(9, 0)),
        }
    }

    #[test]
    fn same_day_leave_is_one_day() {
        assert_eq!(validate_leave_span(d(2026, 8, 10), d(2026, 8, 10)), Ok(1));
    }

    #[test]
    fn leave_span_is_inclusive() {
        assert_eq!(validate_leave_span(d(2026, 8, 10), d(2026, 8, 12)), Ok(3));
        assert_eq!(validate_leave_span(d(2026, 8, 28), d(2026, 9, 2)), Ok(6));
    }

    #[test]
    fn reversed_leave_span_is_rejected() {
        match validate_leave_span(d(2026, 8, 11), d(2026, 8, 10)) {
            Err(RuleError::EndBeforeStart) => {}
            other => panic!("expected END_BEFORE_START, got {other:?}"),
        }
    }

    #[test]
    fn overtime_crossing_midnight_counts_forward() {
        assert_eq!(validate_overtime_span(t(22, 0), t(2, 0)), Ok(4.0));
    }

    #[test]
    fn zero_length_overtime_is_rejected() {
        match validate_overtime_span(t(9, 0), t(9, 0)) {
            Err(RuleError::InvalidHours) => {}
            other => panic!("expected INVALID_HOURS, got {other:?}"),
        }
    }

    #[test]
    fn review_stamps_reviewer_and_is_terminal() {
        let mut review = ReviewState::pending();
        let reviewer = Reviewer {
            id: "E900".into(),
            name: "Pat Admin".into(),
        };
        let now = NaiveDateTime::new(d(2026, 8, 11), t(10, 0));

        apply_review(
            &mut review,
            ReviewAction::Approve,
            &reviewer,
            Some("ok".into()),
            now,
        )
        .expect("first review of a pending request must succeed");

        assert_eq!(review.status, ReviewStatus::Approved);
        assert_eq!(review.reviewer_id.as_deref(), Some("E900"));
        assert_eq!(review.reviewer_name.as_deref(), Some("Pat Admin"));
        assert_eq!(review.comment.as_deref(), Some("ok"));
        assert_eq!(review.reviewed_at, Some(now));

        match apply_review(&mut review, ReviewAction::Reject, &reviewer, None, now) {
            Err(RuleError::AlreadyReviewed) => {}
            other => panic!("expected ALREADY_REVIEWED, got {other:?}"),
        }
        assert_eq!(review.status, ReviewStatus::Approved, "decision must not flip");
    }

    #[test]
    fn reject_path_stamps_too() {
        let mut review = ReviewState::pending();
        let reviewer = Reviewer {
            id: "E900".into(),
            name: "Pat Admin".into(),
        };
        let now = NaiveDateTime::new(d(2026, 8, 11), t(10, 0));
        apply_review(&mut review, ReviewAction::Reject, &reviewer, None, now).unwrap();
        assert_eq!(review.status, ReviewStatus::Rejected);
        assert!(review.comment.is_none());
    }

    #[test]
    fn adjustment_window_bounds() {
        let today = d(2026, 8, 15);
        let ok = NaiveDateTime::new(d(2026, 8, 1), t(9, 0));
        assert_eq!(validate_adjustment_window(ok, today), Ok(()));

        let last_month = NaiveDateTime::new(d(2026, 7, 31), t(9, 0));
        assert_eq!(
            validate_adjustment_window(last_month, today),
            Err(RuleError::BeforeMonthStart)
        );

        let tomorrow = NaiveDateTime::new(d(2026, 8, 16), t(9, 0));
        assert_eq!(
            validate_adjustment_window(tomorrow, today),
            Err(RuleError::AfterToday)
        );
    }

    #[test]
    fn unpaid_days_clip_to_the_month() {
        let month: YearMonth = "2026-08".parse().unwrap();
        let leaves = vec![
            leave(LeaveType::Personal, d(2026, 7, 30), d(2026, 8, 2)),
            leave(LeaveType::Personal, d(2026, 8, 20), d(2026, 8, 21)),
            leave(LeaveType::Annual, d(2026, 8, 5), d(2026, 8, 9)),
        ];
        assert_eq!(
            unpaid_leave_days(&leaves, month),
            4,
            "2 clipped days + 2 whole days; paid annual leave never deducts"
        );
    }

    #[test]
    fn balances_count_only_the_requested_year() {
        let leaves = vec![
            leave(LeaveType::Annual, d(2026, 3, 2), d(2026, 3, 3)),
            leave(LeaveType::Annual, d(2025, 12, 29), d(2025, 12, 30)),
            leave(LeaveType::Sick, d(2026, 5, 4), d(2026, 5, 4)),
        ];
        let balances = leave_balances(&leaves, 2026);

        let annual = balances
            .iter()
            .find(|b| b.leave_type == LeaveType::Annual)
            .expect("annual balance present");
        assert_eq!(annual.quota, 7);
        assert_eq!(annual.used, 2);
        assert_eq!(annual.remaining, 5);

        let sick = balances
            .iter()
            .find(|b| b.leave_type == LeaveType::Sick)
            .unwrap();
        assert_eq!(sick.used, 1);

        let menstrual = balances
            .iter()
            .find(|b| b.leave_type == LeaveType::Menstrual)
            .unwrap();
        assert_eq!(menstrual.used, 0);
        assert_eq!(menstrual.remaining, 12);
    }
}
