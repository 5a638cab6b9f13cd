use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Context;
use chrono::NaiveDate;
use derive_more::{Display, Error};
use serde::Deserialize;

use crate::model::attendance::{AdjustmentRequest, Punch};
use crate::model::leave::LeaveRequest;
use crate::model::overtime::OvertimeRequest;
use crate::model::period::YearMonth;
use crate::model::salary::{MonthlySalaryRecord, SalaryProfile};
use crate::model::shift::ShiftAssignment;

#[derive(Debug, Display, Error)]
pub enum StoreError {
    #[display(fmt = "store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence seam for the service. Lookups return `Option`; list methods
/// return owned, deterministically ordered vectors ("mine" lists newest
/// first, review queues oldest first).
pub trait Store: Send + Sync {
    fn salary_profile(&self, employee_id: &str) -> StoreResult<Option<SalaryProfile>>;
    /// Insert or replace, keyed by employee id.
    fn put_salary_profile(&self, profile: SalaryProfile) -> StoreResult<()>;

    fn add_punch(&self, punch: Punch) -> StoreResult<()>;
    fn punches_for_day(&self, employee_id: &str, date: NaiveDate) -> StoreResult<Vec<Punch>>;
    fn punches_for_month(&self, employee_id: &str, month: YearMonth) -> StoreResult<Vec<Punch>>;

    /// Insert or replace, keyed by request id.
    fn put_adjustment(&self, request: AdjustmentRequest) -> StoreResult<()>;
    fn adjustment(&self, id: &str) -> StoreResult<Option<AdjustmentRequest>>;
    fn adjustments_for_month(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Vec<AdjustmentRequest>>;
    fn pending_adjustments(&self) -> StoreResult<Vec<AdjustmentRequest>>;

    /// Insert or replace, keyed by request id.
    fn put_leave(&self, request: LeaveRequest) -> StoreResult<()>;
    fn leave(&self, id: &str) -> StoreResult<Option<LeaveRequest>>;
    fn leaves_for_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveRequest>>;
    fn pending_leaves(&self) -> StoreResult<Vec<LeaveRequest>>;
    /// Approved leaves overlapping the month, any amount of overlap.
    fn approved_leaves(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Vec<LeaveRequest>>;
    /// Approved leaves whose start date falls in `year`.
    fn approved_leaves_in_year(
        &self,
        employee_id: &str,
        year: i32,
    ) -> StoreResult<Vec<LeaveRequest>>;

    /// Insert or replace, keyed by request id.
    fn put_overtime(&self, request: OvertimeRequest) -> StoreResult<()>;
    fn overtime(&self, id: &str) -> StoreResult<Option<OvertimeRequest>>;
    fn overtimes_for_employee(&self, employee_id: &str) -> StoreResult<Vec<OvertimeRequest>>;
    fn pending_overtimes(&self) -> StoreResult<Vec<OvertimeRequest>>;
    fn approved_overtimes(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Vec<OvertimeRequest>>;

    /// Insert or replace, keyed by assignment id.
    fn put_shift(&self, assignment: ShiftAssignment) -> StoreResult<()>;
    fn shift_by_id(&self, id: &str) -> StoreResult<Option<ShiftAssignment>>;
    fn remove_shift(&self, id: &str) -> StoreResult<bool>;
    /// The assignment covering an employee's date; the most recently written
    /// one wins when several cover the same day.
    fn shift_for(&self, employee_id: &str, date: NaiveDate)
    -> StoreResult<Option<ShiftAssignment>>;
    fn shifts_in_range(&self, start: NaiveDate, end: NaiveDate)
    -> StoreResult<Vec<ShiftAssignment>>;

    /// Insert or replace, keyed by (employee id, month).
    fn save_salary_record(&self, record: MonthlySalaryRecord) -> StoreResult<()>;
    fn salary_record(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Option<MonthlySalaryRecord>>;
    fn salary_records_for_month(&self, month: YearMonth)
    -> StoreResult<Vec<MonthlySalaryRecord>>;
    /// Saved records for one employee, newest month first, at most `limit`.
    fn salary_history(
        &self,
        employee_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<MonthlySalaryRecord>>;
}

#[derive(Default)]
struct State {
    profiles: HashMap<String, SalaryProfile>,
    punches: Vec<Punch>,
    adjustments: Vec<AdjustmentRequest>,
    leaves: Vec<LeaveRequest>,
    overtimes: Vec<OvertimeRequest>,
    shifts: Vec<ShiftAssignment>,
    salaries: HashMap<(String, YearMonth), MonthlySalaryRecord>,
}

/// In-process store backing the service. All state lives behind one lock;
/// handlers never hold it across an await point.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<State>,
}

/// Optional startup fixture: any subset of the sections may be present.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub profiles: Vec<SalaryProfile>,
    #[serde(default)]
    pub punches: Vec<Punch>,
    #[serde(default)]
    pub shifts: Vec<ShiftAssignment>,
    #[serde(default)]
    pub leaves: Vec<LeaveRequest>,
    #[serde(default)]
    pub overtimes: Vec<OvertimeRequest>,
    #[serde(default)]
    pub adjustments: Vec<AdjustmentRequest>,
}

impl MemStore {
    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }

    /// Loads a JSON fixture file; returns the number of records taken in.
    pub fn load_seed(&self, path: &Path) -> anyhow::Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        let seed: SeedData = serde_json::from_str(&raw)
            .with_context(|| format!("parsing seed file {}", path.display()))?;
        let count = seed.profiles.len()
            + seed.punches.len()
            + seed.shifts.len()
            + seed.leaves.len()
            + seed.overtimes.len()
            + seed.adjustments.len();
        let mut state = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        for profile in seed.profiles {
            state.profiles.insert(profile.employee_id.clone(), profile);
        }
        state.punches.extend(seed.punches);
        state.shifts.extend(seed.shifts);
        state.leaves.extend(seed.leaves);
        state.overtimes.extend(seed.overtimes);
        state.adjustments.extend(seed.adjustments);
        Ok(count)
    }
}

fn upsert_by_id<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter().position(|existing| same(existing, &item)) {
        Some(i) => items[i] = item,
        None => items.push(item),
    }
}

impl Store for MemStore {
    fn salary_profile(&self, employee_id: &str) -> StoreResult<Option<SalaryProfile>> {
        Ok(self.read()?.profiles.get(employee_id).cloned())
    }

    fn put_salary_profile(&self, profile: SalaryProfile) -> StoreResult<()> {
        self.write()?
            .profiles
            .insert(profile.employee_id.clone(), profile);
        Ok(())
    }

    fn add_punch(&self, punch: Punch) -> StoreResult<()> {
        self.write()?.punches.push(punch);
        Ok(())
    }

    fn punches_for_day(&self, employee_id: &str, date: NaiveDate) -> StoreResult<Vec<Punch>> {
        let mut out: Vec<Punch> = self
            .read()?
            .punches
            .iter()
            .filter(|p| p.employee_id == employee_id && p.date == date)
            .cloned()
            .collect();
        out.sort_by_key(|p| (p.date, p.time));
        Ok(out)
    }

    fn punches_for_month(&self, employee_id: &str, month: YearMonth) -> StoreResult<Vec<Punch>> {
        let mut out: Vec<Punch> = self
            .read()?
            .punches
            .iter()
            .filter(|p| p.employee_id == employee_id && month.contains(p.date))
            .cloned()
            .collect();
        out.sort_by_key(|p| (p.date, p.time));
        Ok(out)
    }

    fn put_adjustment(&self, request: AdjustmentRequest) -> StoreResult<()> {
        upsert_by_id(&mut self.write()?.adjustments, request, |a, b| a.id == b.id);
        Ok(())
    }

    fn adjustment(&self, id: &str) -> StoreResult<Option<AdjustmentRequest>> {
        Ok(self
            .read()?
            .adjustments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    fn adjustments_for_month(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Vec<AdjustmentRequest>> {
        Ok(self
            .read()?
            .adjustments
            .iter()
            .filter(|a| a.employee_id == employee_id && month.contains(a.date))
            .cloned()
            .collect())
    }

    fn pending_adjustments(&self) -> StoreResult<Vec<AdjustmentRequest>> {
        let mut out: Vec<AdjustmentRequest> = self
            .read()?
            .adjustments
            .iter()
            .filter(|a| a.review.is_pending())
            .cloned()
            .collect();
        out.sort_by_key(|a| a.submitted_at);
        Ok(out)
    }

    fn put_leave(&self, request: LeaveRequest) -> StoreResult<()> {
        upsert_by_id(&mut self.write()?.leaves, request, |a, b| a.id == b.id);
        Ok(())
    }

    fn leave(&self, id: &str) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.read()?.leaves.iter().find(|l| l.id == id).cloned())
    }

    fn leaves_for_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveRequest>> {
        let mut out: Vec<LeaveRequest> = self
            .read()?
            .leaves
            .iter()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect();
        out.sort_by_key(|l| std::cmp::Reverse(l.submitted_at));
        Ok(out)
    }

    fn pending_leaves(&self) -> StoreResult<Vec<LeaveRequest>> {
        let mut out: Vec<LeaveRequest> = self
            .read()?
            .leaves
            .iter()
            .filter(|l| l.review.is_pending())
            .cloned()
            .collect();
        out.sort_by_key(|l| l.submitted_at);
        Ok(out)
    }

    fn approved_leaves(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Vec<LeaveRequest>> {
        Ok(self
            .read()?
            .leaves
            .iter()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.review.is_approved()
                    && l.start_date <= month.last_day()
                    && l.end_date >= month.first_day()
            })
            .cloned()
            .collect())
    }

    fn approved_leaves_in_year(
        &self,
        employee_id: &str,
        year: i32,
    ) -> StoreResult<Vec<LeaveRequest>> {
        use chrono::Datelike;
        Ok(self
            .read()?
            .leaves
            .iter()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.review.is_approved()
                    && l.start_date.year() == year
            })
            .cloned()
            .collect())
    }

    fn put_overtime(&self, request: OvertimeRequest) -> StoreResult<()> {
        upsert_by_id(&mut self.write()?.overtimes, request, |a, b| a.id == b.id);
        Ok(())
    }

    fn overtime(&self, id: &str) -> StoreResult<Option<OvertimeRequest>> {
        Ok(self.read()?.overtimes.iter().find(|o| o.id == id).cloned())
    }

    fn overtimes_for_employee(&self, employee_id: &str) -> StoreResult<Vec<OvertimeRequest>> {
        let mut out: Vec<OvertimeRequest> = self
            .read()?
            .overtimes
            .iter()
            .filter(|o| o.employee_id == employee_id)
            .cloned()
            .collect();
        out.sort_by_key(|o| std::cmp::Reverse(o.submitted_at));
        Ok(out)
    }

    fn pending_overtimes(&self) -> StoreResult<Vec<OvertimeRequest>> {
        let mut out: Vec<OvertimeRequest> = self
            .read()?
            .overtimes
            .iter()
            .filter(|o| o.review.is_pending())
            .cloned()
            .collect();
        out.sort_by_key(|o| o.submitted_at);
        Ok(out)
    }

    fn approved_overtimes(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Vec<OvertimeRequest>> {
        Ok(self
            .read()?
            .overtimes
            .iter()
            .filter(|o| {
                o.employee_id == employee_id
                    && o.review.is_approved()
                    && month.contains(o.date)
            })
            .cloned()
            .collect())
    }

    fn put_shift(&self, assignment: ShiftAssignment) -> StoreResult<()> {
        upsert_by_id(&mut self.write()?.shifts, assignment, |a, b| a.id == b.id);
        Ok(())
    }

    fn shift_by_id(&self, id: &str) -> StoreResult<Option<ShiftAssignment>> {
        Ok(self.read()?.shifts.iter().find(|s| s.id == id).cloned())
    }

    fn remove_shift(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.write()?;
        let before = state.shifts.len();
        state.shifts.retain(|s| s.id != id);
        Ok(state.shifts.len() < before)
    }

    fn shift_for(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<ShiftAssignment>> {
        Ok(self
            .read()?
            .shifts
            .iter()
            .rev()
            .find(|s| s.employee_id == employee_id && s.date == date)
            .cloned())
    }

    fn shifts_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<ShiftAssignment>> {
        let mut out: Vec<ShiftAssignment> = self
            .read()?
            .shifts
            .iter()
            .filter(|s| s.date >= start && s.date <= end)
            .cloned()
            .collect();
        out.sort_by(|a, b| (a.date, &a.employee_id).cmp(&(b.date, &b.employee_id)));
        Ok(out)
    }

    fn save_salary_record(&self, record: MonthlySalaryRecord) -> StoreResult<()> {
        self.write()?
            .salaries
            .insert((record.employee_id.clone(), record.year_month), record);
        Ok(())
    }

    fn salary_record(
        &self,
        employee_id: &str,
        month: YearMonth,
    ) -> StoreResult<Option<MonthlySalaryRecord>> {
        Ok(self
            .read()?
            .salaries
            .get(&(employee_id.to_string(), month))
            .cloned())
    }

    fn salary_records_for_month(
        &self,
        month: YearMonth,
    ) -> StoreResult<Vec<MonthlySalaryRecord>> {
        let mut out: Vec<MonthlySalaryRecord> = self
            .read()?
            .salaries
            .values()
            .filter(|r| r.year_month == month)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(out)
    }

    fn salary_history(
        &self,
        employee_id: &str,
        limit: usize,
    ) -> StoreResult<Vec<MonthlySalaryRecord>> {
        let mut out: Vec<MonthlySalaryRecord> = self
            .read()?
            .salaries
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        out.sort_by_key(|r| std::cmp::Reverse(r.year_month));
        out.truncate(limit);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, NaiveTime};

    use super::*;
    use crate::model::attendance::{PunchSource, PunchType};
    use crate::model::leave::LeaveType;
    use crate::model::review::{ReviewState, ReviewStatus};
    use crate::model::salary::{EmployeeType, SalaryStatus, SalaryType};

    fn profile(employee_id: &str) -> SalaryProfile {
        SalaryProfile {
            employee_id: employee_id.into(),
            employee_name: "Chris Lin".into(),
            id_number: None,
            employee_type: EmployeeType::FullTime,
            salary_type: SalaryType::Monthly,
            base_salary: 30000.0,
            bank_code: None,
            bank_account: None,
            hire_date: None,
            payment_day: 5,
            pension_self_rate: 0.0,
            labor_fee: 666.0,
            health_fee: 517.0,
            employment_fee: 70.0,
            income_tax: 0.0,
            note: None,
        }
    }

    fn record(employee_id: &str, month: &str, net: f64) -> MonthlySalaryRecord {
        MonthlySalaryRecord {
            employee_id: employee_id.into(),
            employee_name: "Chris Lin".into(),
            year_month: month.parse().unwrap(),
            base_salary: 30000.0,
            weekday_overtime_pay: 0.0,
            restday_overtime_pay: 0.0,
            holiday_overtime_pay: 0.0,
            labor_fee: 666.0,
            health_fee: 517.0,
            employment_fee: 70.0,
            pension_self: 0.0,
            income_tax: 0.0,
            leave_deduction: 0.0,
            gross_salary: 30000.0,
            total_deductions: 1253.0,
            net_salary: net,
            employer_labor_fee: 2331.0,
            employer_health_fee: 1034.0,
            employer_employment_fee: 245.0,
            employer_pension: 1800.0,
            bank_code: None,
            bank_account: None,
            bank_name: None,
            status: SalaryStatus::Calculated,
        }
    }

    fn leave(id: &str, from: u32, to: u32, status: ReviewStatus) -> LeaveRequest {
        let start_date = NaiveDate::from_ymd_opt(2026, 8, from).unwrap();
        let end_date = NaiveDate::from_ymd_opt(2026, 8, to).unwrap();
        let mut review = ReviewState::pending();
        review.status = status;
        LeaveRequest {
            id: id.into(),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            leave_type: LeaveType::Annual,
            start_date,
            end_date,
            days: (end_date - start_date).num_days() + 1,
            reason: None,
            review,
            submitted_at: NaiveDateTime::new(
                start_date,
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn salary_record_overwrites_by_key() {
        let store = MemStore::default();
        store.save_salary_record(record("E001", "2026-08", 28747.0)).unwrap();
        store.save_salary_record(record("E001", "2026-08", 27000.0)).unwrap();
        store.save_salary_record(record("E001", "2026-07", 28747.0)).unwrap();

        let saved = store.salary_record("E001", "2026-08".parse().unwrap()).unwrap();
        assert_eq!(saved.map(|r| r.net_salary), Some(27000.0), "last write wins");
        assert_eq!(
            store.salary_records_for_month("2026-08".parse().unwrap()).unwrap().len(),
            1
        );
    }

    #[test]
    fn salary_history_is_newest_first_and_limited() {
        let store = MemStore::default();
        for month in ["2026-05", "2026-08", "2026-06", "2026-07"] {
            store.save_salary_record(record("E001", month, 28747.0)).unwrap();
        }
        store.save_salary_record(record("E002", "2026-08", 1.0)).unwrap();

        let history = store.salary_history("E001", 3).unwrap();
        let months: Vec<String> =
            history.iter().map(|r| r.year_month.to_string()).collect();
        assert_eq!(months, ["2026-08", "2026-07", "2026-06"]);
    }

    #[test]
    fn approved_leave_queries_ignore_pending_and_other_months() {
        let store = MemStore::default();
        store.put_leave(leave("L1", 10, 11, ReviewStatus::Approved)).unwrap();
        store.put_leave(leave("L2", 12, 13, ReviewStatus::Pending)).unwrap();
        let mut other_month = leave("L3", 1, 2, ReviewStatus::Approved);
        other_month.start_date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        other_month.end_date = NaiveDate::from_ymd_opt(2026, 7, 2).unwrap();
        store.put_leave(other_month).unwrap();

        let august = store
            .approved_leaves("E001", "2026-08".parse().unwrap())
            .unwrap();
        assert_eq!(august.len(), 1);
        assert_eq!(august[0].id, "L1");

        let year = store.approved_leaves_in_year("E001", 2026).unwrap();
        assert_eq!(year.len(), 2, "year view sees both approved leaves");
    }

    #[test]
    fn put_leave_replaces_by_id() {
        let store = MemStore::default();
        store.put_leave(leave("L1", 10, 11, ReviewStatus::Pending)).unwrap();
        store.put_leave(leave("L1", 10, 11, ReviewStatus::Approved)).unwrap();

        let stored = store.leave("L1").unwrap().unwrap();
        assert_eq!(stored.review.status, ReviewStatus::Approved);
        assert_eq!(store.leaves_for_employee("E001").unwrap().len(), 1);
    }

    #[test]
    fn punches_come_back_time_ordered() {
        let store = MemStore::default();
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        for (id, h) in [("P2", 18), ("P1", 9)] {
            store
                .add_punch(Punch {
                    id: id.into(),
                    employee_id: "E001".into(),
                    date,
                    time: NaiveTime::from_hms_opt(h, 0, 0).unwrap(),
                    punch_type: if h < 12 { PunchType::In } else { PunchType::Out },
                    source: PunchSource::Device,
                    location: None,
                    note: None,
                })
                .unwrap();
        }
        let day = store.punches_for_day("E001", date).unwrap();
        assert_eq!(day[0].id, "P1");
        assert_eq!(day[1].id, "P2");
    }

    #[test]
    fn latest_shift_for_a_day_wins() {
        let store = MemStore::default();
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let shift = |id: &str, start_h: u32| ShiftAssignment {
            id: id.into(),
            employee_id: "E001".into(),
            employee_name: "Chris Lin".into(),
            date,
            shift_type: crate::model::shift::ShiftType::Custom,
            start_time: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(start_h + 8, 0, 0).unwrap(),
            location: None,
            note: None,
        };
        store.put_shift(shift("S1", 8)).unwrap();
        store.put_shift(shift("S2", 12)).unwrap();

        let current = store.shift_for("E001", date).unwrap().unwrap();
        assert_eq!(current.id, "S2");

        assert!(store.remove_shift("S2").unwrap());
        assert!(!store.remove_shift("S2").unwrap(), "second delete is a miss");
        let current = store.shift_for("E001", date).unwrap().unwrap();
        assert_eq!(current.id, "S1");
    }

    #[test]
    fn seed_file_populates_every_section_present() {
        let dir = std::env::temp_dir().join("punchcard-seed-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");
        let mut seed_profile = profile("E001");
        seed_profile.bank_code = Some("822".into());
        let body = serde_json::json!({
            "profiles": [seed_profile],
            "punches": [{
                "id": "P1",
                "employee_id": "E001",
                "date": "2026-08-03",
                "time": "09:00:00",
                "punch_type": "in",
                "source": "device",
                "location": null,
                "note": null
            }]
        });
        std::fs::write(&path, serde_json::to_vec(&body).unwrap()).unwrap();

        let store = MemStore::default();
        let count = store.load_seed(&path).unwrap();
        assert_eq!(count, 2);
        assert!(store.salary_profile("E001").unwrap().is_some());
        assert_eq!(
            store
                .punches_for_day("E001", NaiveDate::from_ymd_opt(2026, 8, 3).unwrap())
                .unwrap()
                .len(),
            1
        );
    }
}
