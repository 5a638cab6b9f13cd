use crate::api::ReviewRequest;
use crate::api::attendance::{AdjustmentSubmitRequest, PunchRequest};
use crate::api::leave::LeaveSubmitRequest;
use crate::api::overtime::OvertimeSubmitRequest;
use crate::api::salary::SaveSalaryRequest;
use crate::api::shift::{BatchShiftRequest, ShiftUpsertRequest};
use crate::model::attendance::{
    AdjustmentRequest, DailyAttendance, DayStatus, Punch, PunchSource, PunchType,
};
use crate::model::leave::{LeaveBalance, LeaveRequest, LeaveType};
use crate::model::overtime::OvertimeRequest;
use crate::model::review::{ReviewAction, ReviewState, ReviewStatus};
use crate::model::salary::{
    EmployeeType, MonthlySalaryRecord, SalaryProfile, SalaryStatus, SalaryType,
};
use crate::model::shift::{ShiftAssignment, ShiftType};
use crate::rules::shift::{Adherence, AdherenceVerdict, ShiftStats};
use utoipa::Modify;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Punchcard API",
        version = "0.1.0",
        description = r#"
## Employee Attendance & Payroll Service

This API powers an **attendance, leave, overtime, shift and payroll** service for a single organization.

### 🔹 Key Features
- **Attendance**
  - Punch clock with repair requests for missing punches
  - Per-day classification of a month's record
- **Leave & Overtime**
  - Submit requests, admin review, per-type yearly balances
- **Shift Scheduling**
  - Assign single or batch shifts, adherence checks against the roster
- **Payroll**
  - Tiered overtime pay, statutory deductions, monthly payslips

### 🔐 Identity
Callers are identified by the **`X-Employee-Id`** header, set by the gateway
after authentication. `X-Employee-Role: admin` unlocks review and payroll
operations.

### 📦 Response Format
Every response carries an `ok` flag; mutations add a stable `code` string.

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::punch,
        crate::api::attendance::details,
        crate::api::attendance::abnormal,
        crate::api::attendance::submit_adjustment,
        crate::api::attendance::pending_adjustments,
        crate::api::attendance::review_adjustment,

        crate::api::leave::submit_leave,
        crate::api::leave::my_leaves,
        crate::api::leave::balance,
        crate::api::leave::pending_leaves,
        crate::api::leave::review_leave,

        crate::api::overtime::submit_overtime,
        crate::api::overtime::my_overtimes,
        crate::api::overtime::pending_overtimes,
        crate::api::overtime::review_overtime,

        crate::api::shift::add_shift,
        crate::api::shift::add_shifts_batch,
        crate::api::shift::list_shifts,
        crate::api::shift::update_shift,
        crate::api::shift::delete_shift,
        crate::api::shift::stats,
        crate::api::shift::my_adherence,

        crate::api::salary::save_profile,
        crate::api::salary::get_profile,
        crate::api::salary::calculate,
        crate::api::salary::save_record,
        crate::api::salary::all_records,
        crate::api::salary::my_record,
        crate::api::salary::history
    ),
    components(
        schemas(
            PunchRequest,
            AdjustmentSubmitRequest,
            LeaveSubmitRequest,
            OvertimeSubmitRequest,
            ShiftUpsertRequest,
            BatchShiftRequest,
            SaveSalaryRequest,
            ReviewRequest,
            Punch,
            PunchType,
            PunchSource,
            DayStatus,
            DailyAttendance,
            AdjustmentRequest,
            LeaveType,
            LeaveRequest,
            LeaveBalance,
            OvertimeRequest,
            ShiftType,
            ShiftAssignment,
            ShiftStats,
            Adherence,
            AdherenceVerdict,
            SalaryType,
            EmployeeType,
            SalaryStatus,
            SalaryProfile,
            MonthlySalaryRecord,
            ReviewStatus,
            ReviewAction,
            ReviewState
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Punch clock and repair APIs"),
        (name = "Leave", description = "Leave request APIs"),
        (name = "Overtime", description = "Overtime request APIs"),
        (name = "Shift", description = "Shift scheduling APIs"),
        (name = "Salary", description = "Payroll APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "employee_id",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Employee-Id"))),
            );
        }
    }
}
