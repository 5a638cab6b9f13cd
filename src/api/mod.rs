use actix_web::HttpResponse;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::identity::Caller;
use crate::model::review::ReviewAction;
use crate::rules::error::{ErrorKind, RuleError};

pub mod attendance;
pub mod leave;
pub mod overtime;
pub mod salary;
pub mod shift;

/// Admin decision body shared by every review endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub action: ReviewAction,
    pub comment: Option<String>,
}

/// Envelope for a rule violation: `{"ok": false, "code": ...}`, HTTP class
/// chosen by the violation kind.
pub(crate) fn rule_error(err: RuleError) -> HttpResponse {
    let body = serde_json::json!({ "ok": false, "code": err.code() });
    match err.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::NotConfigured => HttpResponse::NotFound().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
    }
}

/// Envelope for a missing record id.
pub(crate) fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "ok": false, "code": "NOT_FOUND" }))
}

/// Employees may only read their own records; admins may name anyone.
pub(crate) fn resolve_target(
    caller: &Caller,
    requested: Option<String>,
) -> actix_web::Result<String> {
    match requested {
        Some(id) if id != caller.employee_id => {
            caller.require_admin()?;
            Ok(id)
        }
        _ => Ok(caller.employee_id.clone()),
    }
}
