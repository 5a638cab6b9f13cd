use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::review::ReviewState;

/// An overtime claim for one date. `hours` is always recomputed server-side
/// from the span, never taken from the submitter.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OvertimeRequest {
    #[schema(example = "OT51e8aa")]
    pub id: String,
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Chris Lin")]
    pub employee_name: String,
    #[schema(value_type = String, format = "date", example = "2026-08-07")]
    pub date: NaiveDate,
    #[schema(value_type = String, example = "18:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "21:30:00")]
    pub end_time: NaiveTime,
    /// Elapsed hours with midnight rollover, one decimal.
    #[schema(example = 3.5)]
    pub hours: f64,
    pub reason: Option<String>,
    pub review: ReviewState,
    #[schema(value_type = String, format = "date-time")]
    pub submitted_at: NaiveDateTime,
}
