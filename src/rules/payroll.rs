use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::model::attendance::Punch;
use crate::model::leave::LeaveRequest;
use crate::model::overtime::OvertimeRequest;
use crate::model::period::YearMonth;
use crate::model::salary::{
    MonthlySalaryRecord, SalaryProfile, SalaryStatus, SalaryType, bank_name,
};
use crate::rules::attendance::paired_hours;
use crate::rules::ledger::unpaid_leave_days;
use crate::rules::time::{DayKind, day_kind};

/// Payroll policy knobs. Multipliers and factors come from configuration,
/// never from code; see `Config::pay_policy`.
#[derive(Debug, Clone)]
pub struct PayPolicy {
    /// Standard working days per month, the divisor for the daily rate.
    pub standard_monthly_days: f64,
    /// Working hours in a standard day.
    pub daily_work_hours: f64,
    pub weekday_multiplier: f64,
    pub restday_multiplier: f64,
    pub holiday_multiplier: f64,
    /// Employer share of the statutory fees, as multiples of the employee
    /// amounts; reporting only.
    pub employer_labor_factor: f64,
    pub employer_health_factor: f64,
    pub employer_employment_factor: f64,
    /// Employer pension contribution as a fraction of base pay.
    pub employer_pension_rate: f64,
    /// Statutory holidays; these dates pay at the holiday tier.
    pub holidays: BTreeSet<NaiveDate>,
}

impl Default for PayPolicy {
    fn default() -> Self {
        Self {
            standard_monthly_days: 30.0,
            daily_work_hours: 8.0,
            weekday_multiplier: 1.34,
            restday_multiplier: 1.67,
            holiday_multiplier: 2.0,
            employer_labor_factor: 3.5,
            employer_health_factor: 2.0,
            employer_employment_factor: 3.5,
            employer_pension_rate: 0.06,
            holidays: BTreeSet::new(),
        }
    }
}

/// Computes one employee's payslip for one month. Deterministic: identical
/// inputs produce a bit-identical record. Nothing is persisted here; the
/// result carries status `calculated`.
///
/// `leaves` and `overtimes` must already be approved; `punches` is the
/// month's full punch list (it only matters for hourly employees).
pub fn calculate_monthly_salary(
    profile: &SalaryProfile,
    punches: &[Punch],
    leaves: &[LeaveRequest],
    overtimes: &[OvertimeRequest],
    month: YearMonth,
    policy: &PayPolicy,
) -> MonthlySalaryRecord {
    let base_pay = match profile.salary_type {
        SalaryType::Monthly => profile.base_salary,
        SalaryType::Hourly => (worked_hours(punches, month) * profile.base_salary).round(),
    };

    let hourly_rate = match profile.salary_type {
        SalaryType::Monthly => {
            profile.base_salary / (policy.standard_monthly_days * policy.daily_work_hours)
        }
        SalaryType::Hourly => profile.base_salary,
    };

    let mut weekday_hours = 0.0;
    let mut restday_hours = 0.0;
    let mut holiday_hours = 0.0;
    for ot in overtimes.iter().filter(|ot| month.contains(ot.date)) {
        match day_kind(ot.date, &policy.holidays) {
            DayKind::Weekday => weekday_hours += ot.hours,
            DayKind::RestDay => restday_hours += ot.hours,
            DayKind::Holiday => holiday_hours += ot.hours,
        }
    }
    let weekday_overtime_pay = (weekday_hours * hourly_rate * policy.weekday_multiplier).round();
    let restday_overtime_pay = (restday_hours * hourly_rate * policy.restday_multiplier).round();
    let holiday_overtime_pay = (holiday_hours * hourly_rate * policy.holiday_multiplier).round();

    let daily_rate = match profile.salary_type {
        SalaryType::Monthly => profile.base_salary / policy.standard_monthly_days,
        SalaryType::Hourly => profile.base_salary * policy.daily_work_hours,
    };
    let leave_deduction = (unpaid_leave_days(leaves, month) as f64 * daily_rate).round();

    let pension_self = (base_pay * profile.pension_self_rate / 100.0).round();

    let gross_salary =
        base_pay + weekday_overtime_pay + restday_overtime_pay + holiday_overtime_pay;
    let total_deductions = profile.labor_fee
        + profile.health_fee
        + profile.employment_fee
        + pension_self
        + profile.income_tax
        + leave_deduction;
    // Unclamped: a month of unpaid leave can legitimately go negative.
    let net_salary = gross_salary - total_deductions;

    MonthlySalaryRecord {
        employee_id: profile.employee_id.clone(),
        employee_name: profile.employee_name.clone(),
        year_month: month,
        base_salary: base_pay,
        weekday_overtime_pay,
        restday_overtime_pay,
        holiday_overtime_pay,
        labor_fee: profile.labor_fee,
        health_fee: profile.health_fee,
        employment_fee: profile.employment_fee,
        pension_self,
        income_tax: profile.income_tax,
        leave_deduction,
        gross_salary,
        total_deductions,
        net_salary,
        employer_labor_fee: (profile.labor_fee * policy.employer_labor_factor).round(),
        employer_health_fee: (profile.health_fee * policy.employer_health_factor).round(),
        employer_employment_fee: (profile.employment_fee * policy.employer_employment_factor)
            .round(),
        employer_pension: (base_pay * policy.employer_pension_rate).round(),
        bank_code: profile.bank_code.clone(),
        bank_account: profile.bank_account.clone(),
        bank_name: profile
            .bank_code
            .as_deref()
            .and_then(bank_name)
            .map(str::to_string),
        status: SalaryStatus::Calculated,
    }
}

/// Total worked hours in a month: each date's earliest IN to latest OUT.
/// Days missing either side contribute nothing.
fn worked_hours(punches: &[Punch], month: YearMonth) -> f64 {
    let mut by_day: BTreeMap<NaiveDate, Vec<Punch>> = BTreeMap::new();
    for p in punches.iter().filter(|p| month.contains(p.date)) {
        by_day.entry(p.date).or_default().push(p.clone());
    }
    by_day
        .values()
        .filter_map(|day| paired_hours(day))
        .sum()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, NaiveTime};

    use super::*;
    use crate::model::attendance::{PunchSource, PunchType};
    use crate::model::leave::LeaveType;
    use crate::model::review::{ReviewState, ReviewStatus};
    use crate::model::salary::EmployeeType;

    fn profile(salary_type: SalaryType, base_salary: f64) -> SalaryProfile {
        SalaryProfile {
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            id_number: Some("A123456789".into()),
            employee_type: EmployeeType::FullTime,
            salary_type,
            base_salary,
            bank_code: Some("822".into()),
            bank_account: Some("000123456789".into()),
            hire_date: NaiveDate::from_ymd_opt(2024, 4, 1),
            payment_day: 5,
            pension_self_rate: 0.0,
            labor_fee: 666.0,
            health_fee: 517.0,
            employment_fee: 70.0,
            income_tax: 0.0,
            note: None,
        }
    }

    fn month() -> YearMonth {
        "2026-08".parse().unwrap()
    }

    fn approved() -> ReviewState {
        let mut review = ReviewState::pending();
        review.status = ReviewStatus::Approved;
        review
    }

    fn overtime(day: u32, start: (u32, u32), end: (u32, u32)) -> OvertimeRequest {
        let date = NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        let start_time = NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap();
        let end_time = NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap();
        OvertimeRequest {
            id: format!("OT{day}"),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            date,
            start_time,
            end_time,
            hours: crate::rules::time::span_hours(start_time, end_time),
            reason: None,
            review: approved(),
            submitted_at: NaiveDateTime::new(date, NaiveTime::from_hms_opt(22, 0, 0).unwrap()),
        }
    }

    fn unpaid_leave(from: u32, to: u32) -> LeaveRequest {
        let start_date = NaiveDate::from_ymd_opt(2026, 8, from).unwrap();
        let end_date = NaiveDate::from_ymd_opt(2026, 8, to).unwrap();
        LeaveRequest {
            id: "LV1".into(),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            leave_type: LeaveType::Personal,
            start_date,
            end_date,
            days: (end_date - start_date).num_days() + 1,
            reason: None,
            review: approved(),
            submitted_at: NaiveDateTime::new(
                start_date,
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ),
        }
    }

    fn punch(day: u32, h: u32, m: u32, punch_type: PunchType) -> Punch {
        Punch {
            id: format!("P{day}{h}{m}"),
            employee_id: "E001".into(),
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            time: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            punch_type,
            source: PunchSource::Device,
            location: None,
            note: None,
        }
    }

    #[test]
    fn monthly_baseline_nets_out_statutory_fees() {
        let record = calculate_monthly_salary(
            &profile(SalaryType::Monthly, 30000.0),
            &[],
            &[],
            &[],
            month(),
            &PayPolicy::default(),
        );
        assert_eq!(record.base_salary, 30000.0);
        assert_eq!(record.gross_salary, 30000.0);
        assert_eq!(record.total_deductions, 666.0 + 517.0 + 70.0);
        assert_eq!(record.net_salary, 28747.0);
        assert_eq!(record.status, SalaryStatus::Calculated);
        assert_eq!(record.bank_name.as_deref(), Some("CTBC Bank"));
    }

    #[test]
    fn calculation_is_idempotent() {
        let p = profile(SalaryType::Monthly, 30000.0);
        let ots = vec![overtime(3, (18, 0), (21, 0)), overtime(8, (10, 0), (14, 0))];
        let leaves = vec![unpaid_leave(20, 20)];
        let policy = PayPolicy::default();

        let a = calculate_monthly_salary(&p, &[], &leaves, &ots, month(), &policy);
        let b = calculate_monthly_salary(&p, &[], &leaves, &ots, month(), &policy);
        assert_eq!(a.gross_salary.to_bits(), b.gross_salary.to_bits());
        assert_eq!(a.net_salary.to_bits(), b.net_salary.to_bits());
        assert_eq!(a.leave_deduction.to_bits(), b.leave_deduction.to_bits());
    }

    #[test]
    fn two_unpaid_days_deduct_two_daily_rates() {
        let record = calculate_monthly_salary(
            &profile(SalaryType::Monthly, 30000.0),
            &[],
            &[unpaid_leave(10, 11)],
            &[],
            month(),
            &PayPolicy::default(),
        );
        assert_eq!(record.leave_deduction, 2000.0, "2 x 30000/30");
        assert_eq!(record.net_salary, 28747.0 - 2000.0);
    }

    #[test]
    fn overtime_is_tiered_by_day_kind() {
        // 2026-08-03 is a Monday, 2026-08-08 a Saturday.
        let mut policy = PayPolicy::default();
        policy
            .holidays
            .insert(NaiveDate::from_ymd_opt(2026, 8, 28).unwrap());

        let ots = vec![
            overtime(3, (18, 0), (20, 0)),  // weekday, 2h
            overtime(8, (10, 0), (14, 0)),  // rest day, 4h
            overtime(28, (9, 0), (12, 0)),  // holiday, 3h
        ];
        let record = calculate_monthly_salary(
            &profile(SalaryType::Monthly, 48000.0),
            &[],
            &[],
            &ots,
            month(),
            &policy,
        );

        // Hourly base 48000 / 240 = 200.
        assert_eq!(record.weekday_overtime_pay, (2.0 * 200.0 * 1.34_f64).round());
        assert_eq!(record.restday_overtime_pay, (4.0 * 200.0 * 1.67_f64).round());
        assert_eq!(record.holiday_overtime_pay, (3.0 * 200.0 * 2.0_f64).round());
        assert_eq!(
            record.gross_salary,
            48000.0
                + record.weekday_overtime_pay
                + record.restday_overtime_pay
                + record.holiday_overtime_pay
        );
    }

    #[test]
    fn overtime_outside_the_month_is_ignored() {
        let mut ot = overtime(3, (18, 0), (20, 0));
        ot.date = NaiveDate::from_ymd_opt(2026, 7, 3).unwrap();
        let record = calculate_monthly_salary(
            &profile(SalaryType::Monthly, 30000.0),
            &[],
            &[],
            &[ot],
            month(),
            &PayPolicy::default(),
        );
        assert_eq!(record.weekday_overtime_pay, 0.0);
        assert_eq!(record.gross_salary, 30000.0);
    }

    #[test]
    fn hourly_base_comes_from_paired_punches() {
        let punches = vec![
            punch(3, 9, 0, PunchType::In),
            punch(3, 17, 0, PunchType::Out), // 8h
            punch(4, 13, 30, PunchType::In),
            punch(4, 18, 0, PunchType::Out), // 4.5h
            punch(5, 9, 0, PunchType::In),   // unpaired, ignored
        ];
        let record = calculate_monthly_salary(
            &profile(SalaryType::Hourly, 190.0),
            &punches,
            &[],
            &[],
            month(),
            &PayPolicy::default(),
        );
        assert_eq!(record.base_salary, (12.5 * 190.0_f64).round());
        assert_eq!(record.gross_salary, record.base_salary);
    }

    #[test]
    fn pension_self_rate_derives_flat_amount() {
        let mut p = profile(SalaryType::Monthly, 30000.0);
        p.pension_self_rate = 6.0;
        let record =
            calculate_monthly_salary(&p, &[], &[], &[], month(), &PayPolicy::default());
        assert_eq!(record.pension_self, 1800.0);
        assert_eq!(record.net_salary, 28747.0 - 1800.0);
    }

    #[test]
    fn employer_mirrors_do_not_touch_net() {
        let record = calculate_monthly_salary(
            &profile(SalaryType::Monthly, 30000.0),
            &[],
            &[],
            &[],
            month(),
            &PayPolicy::default(),
        );
        assert_eq!(record.employer_labor_fee, (666.0 * 3.5_f64).round());
        assert_eq!(record.employer_health_fee, (517.0 * 2.0_f64).round());
        assert_eq!(record.employer_employment_fee, (70.0 * 3.5_f64).round());
        assert_eq!(record.employer_pension, (30000.0 * 0.06_f64).round());
        assert_eq!(record.net_salary, 28747.0);
    }

    #[test]
    fn negative_net_is_passed_through() {
        let mut p = profile(SalaryType::Monthly, 3000.0);
        p.labor_fee = 666.0;
        p.health_fee = 517.0;
        p.employment_fee = 70.0;
        let record = calculate_monthly_salary(
            &p,
            &[],
            &[unpaid_leave(1, 30)], // the whole month unpaid
            &[],
            month(),
            &PayPolicy::default(),
        );
        assert!(
            record.net_salary < 0.0,
            "net {} should be negative and unclamped",
            record.net_salary
        );
    }
}
