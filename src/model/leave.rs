use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use utoipa::ToSchema;

use crate::model::review::ReviewState;

/// Leave catalogue. Quotas follow the statutory per-year entitlements the
/// service was configured for; only personal leave is unpaid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Marriage,
    Bereavement,
    Maternity,
    Paternity,
    FamilyCare,
    Menstrual,
}

impl LeaveType {
    /// Annual entitlement in days.
    pub fn annual_quota(&self) -> i64 {
        match self {
            LeaveType::Annual => 7,
            LeaveType::Sick => 30,
            LeaveType::Personal => 14,
            LeaveType::Marriage => 8,
            LeaveType::Bereavement => 8,
            LeaveType::Maternity => 56,
            LeaveType::Paternity => 7,
            LeaveType::FamilyCare => 7,
            LeaveType::Menstrual => 12,
        }
    }

    /// Whether days of this type deduct from pay.
    pub fn is_unpaid(&self) -> bool {
        matches!(self, LeaveType::Personal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = "LV9c01b2")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Chris Lin")]
    pub employee_name: String,
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = "date", example = "2026-08-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2026-08-11")]
    pub end_date: NaiveDate,
    /// Whole days, inclusive of both endpoints.
    #[schema(example = 2)]
    pub days: i64,
    pub reason: Option<String>,
    pub review: ReviewState,
    #[schema(value_type = String, format = "date-time")]
    pub submitted_at: NaiveDateTime,
}

/// Per-type balance for one calendar year.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveBalance {
    pub leave_type: LeaveType,
    #[schema(example = 7)]
    pub quota: i64,
    #[schema(example = 2)]
    pub used: i64,
    #[schema(example = 5)]
    pub remaining: i64,
}
