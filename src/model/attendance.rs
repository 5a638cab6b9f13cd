use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::model::review::ReviewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PunchType {
    In,
    Out,
}

/// How a punch entered the record: from a device at punch time, or appended
/// later by an approved repair request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PunchSource {
    Device,
    Repair,
}

/// A single clock event. Punches are append-only; a day's record is the
/// ordered sequence of its punches.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Punch {
    #[schema(example = "P7f3a2c")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "08:58:00")]
    pub time: NaiveTime,
    pub punch_type: PunchType,
    pub source: PunchSource,
    pub location: Option<String>,
    pub note: Option<String>,
}

/// Status of one attendance day, as produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DayStatus {
    Normal,
    MissingIn,
    MissingOut,
    PendingRepair,
    ApprovedRepair,
}

/// One day of an employee's month view: classification plus the raw punches.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyAttendance {
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    pub status: DayStatus,
    pub punches: Vec<Punch>,
}

/// Employee-submitted backfill for a missing punch. Terminal once reviewed;
/// approval appends the repaired punch to the attendance record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdjustmentRequest {
    #[schema(example = "ADJ4de1f0")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Chris Lin")]
    pub employee_name: String,
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    pub punch_type: PunchType,
    #[schema(value_type = String, format = "date-time", example = "2026-08-03T18:02:00")]
    pub requested_time: NaiveDateTime,
    pub note: Option<String>,
    pub review: ReviewState,
    #[schema(value_type = String, format = "date-time")]
    pub submitted_at: NaiveDateTime,
}
