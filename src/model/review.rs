use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

/// Identity of the admin performing a review, stamped onto the request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reviewer {
    #[schema(example = "E900")]
    pub id: String,
    #[schema(example = "Pat Admin")]
    pub name: String,
}

/// Review lifecycle shared by leave, overtime and punch-adjustment requests.
/// Starts pending; an admin decision fills the remaining fields exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewState {
    pub status: ReviewStatus,
    pub reviewer_id: Option<String>,
    pub reviewer_name: Option<String>,
    pub comment: Option<String>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub reviewed_at: Option<NaiveDateTime>,
}

impl ReviewState {
    pub fn pending() -> Self {
        Self {
            status: ReviewStatus::Pending,
            reviewer_id: None,
            reviewer_name: None,
            comment: None,
            reviewed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }
}
