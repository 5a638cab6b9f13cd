use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Shift catalogue. Every non-custom type carries standard times used as
/// defaults when an assignment omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShiftType {
    Early,
    Mid,
    Night,
    Full,
    Custom,
}

impl ShiftType {
    /// Standard start/end for the type, None for custom. The night shift ends
    /// at midnight, expressed as 00:00 under the rollover convention.
    pub fn default_times(&self) -> Option<(NaiveTime, NaiveTime)> {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        match self {
            ShiftType::Early => Some((hm(8, 0), hm(16, 0))),
            ShiftType::Mid => Some((hm(12, 0), hm(20, 0))),
            ShiftType::Night => Some((hm(16, 0), hm(0, 0))),
            ShiftType::Full => Some((hm(9, 0), hm(18, 0))),
            ShiftType::Custom => None,
        }
    }
}

/// One employee's shift for one date. Overlapping assignments for the same
/// (employee, date) are not reconciled; the most recently written one wins
/// at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShiftAssignment {
    #[schema(example = "SH2b77c9")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Chris Lin")]
    pub employee_name: String,
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "16:00:00")]
    pub end_time: NaiveTime,
    pub location: Option<String>,
    pub note: Option<String>,
}
