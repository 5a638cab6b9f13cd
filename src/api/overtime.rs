use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::{ReviewRequest, not_found, rule_error};
use crate::identity::Caller;
use crate::model::new_id;
use crate::model::overtime::OvertimeRequest;
use crate::model::review::{ReviewAction, ReviewState};
use crate::rules::ledger::{apply_review, validate_overtime_span};
use crate::rules::time::parse_hhmm;
use crate::store::Store;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OvertimeSubmitRequest {
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    /// Start of the worked span, HH:MM
    #[schema(example = "22:00")]
    pub start_time: String,
    /// End of the worked span, HH:MM; earlier than start means past midnight
    #[schema(example = "02:00")]
    pub end_time: String,
    pub reason: Option<String>,
}

/* =========================
Submit overtime
========================= */
/// Swagger doc for overtime submission endpoint
#[utoipa::path(
    post,
    path = "/api/v1/overtime",
    request_body = OvertimeSubmitRequest,
    responses(
        (status = 200, description = "Overtime submitted, hours computed server side", body = Object, example = json!({
            "ok": true,
            "code": "OVERTIME_SUBMIT_SUCCESS"
        })),
        (status = 400, description = "Bad time or zero-length span", body = Object, example = json!({
            "ok": false,
            "code": "INVALID_HOURS"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Overtime"
)]
pub async fn submit_overtime(
    caller: Caller,
    store: web::Data<dyn Store>,
    payload: web::Json<OvertimeSubmitRequest>,
) -> actix_web::Result<impl Responder> {
    let start_time = match parse_hhmm(&payload.start_time) {
        Ok(time) => time,
        Err(err) => return Ok(rule_error(err)),
    };
    let end_time = match parse_hhmm(&payload.end_time) {
        Ok(time) => time,
        Err(err) => return Ok(rule_error(err)),
    };
    let hours = match validate_overtime_span(start_time, end_time) {
        Ok(hours) => hours,
        Err(err) => return Ok(rule_error(err)),
    };

    let request = OvertimeRequest {
        id: new_id("OT"),
        employee_id: caller.employee_id.clone(),
        employee_name: caller.name.clone(),
        date: payload.date,
        start_time,
        end_time,
        hours,
        reason: payload.reason.clone(),
        review: ReviewState::pending(),
        submitted_at: Local::now().naive_local(),
    };

    store.put_overtime(request.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to store overtime request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        employee_id = %caller.employee_id,
        hours,
        "Overtime submitted"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "OVERTIME_SUBMIT_SUCCESS",
        "request": request
    })))
}

/* =========================
My overtime requests
========================= */
/// Swagger doc for own overtime list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/overtime/mine",
    responses(
        (status = 200, description = "Caller's overtime requests, newest first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Overtime"
)]
pub async fn my_overtimes(
    caller: Caller,
    store: web::Data<dyn Store>,
) -> actix_web::Result<impl Responder> {
    let requests = store
        .overtimes_for_employee(&caller.employee_id)
        .map_err(|e| {
            tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to fetch overtime requests");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "requests": requests
    })))
}

/* =========================
Pending overtime (Admin)
========================= */
/// Swagger doc for pending overtime endpoint
#[utoipa::path(
    get,
    path = "/api/v1/overtime/pending",
    responses(
        (status = 200, description = "Open overtime queue, oldest first", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Overtime"
)]
pub async fn pending_overtimes(
    caller: Caller,
    store: web::Data<dyn Store>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let requests = store.pending_overtimes().map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch pending overtime");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "requests": requests
    })))
}

/* =========================
Review overtime (Admin)
========================= */
/// Swagger doc for overtime review endpoint
#[utoipa::path(
    put,
    path = "/api/v1/overtime/{id}/review",
    params(
        ("id" = String, Path, description = "Overtime request id")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Decision applied", body = Object, example = json!({
            "ok": true,
            "code": "OVERTIME_APPROVED"
        })),
        (status = 404, description = "No such request"),
        (status = 409, description = "Already reviewed", body = Object, example = json!({
            "ok": false,
            "code": "ALREADY_REVIEWED"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Overtime"
)]
pub async fn review_overtime(
    caller: Caller,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let id = path.into_inner();
    let mut request = match store.overtime(&id).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch overtime request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(request) => request,
        None => return Ok(not_found()),
    };

    let now = Local::now().naive_local();
    if let Err(err) = apply_review(
        &mut request.review,
        payload.action,
        &caller.reviewer(),
        payload.comment.clone(),
        now,
    ) {
        return Ok(rule_error(err));
    }

    store.put_overtime(request.clone()).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to store review decision");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let code = match payload.action {
        ReviewAction::Approve => "OVERTIME_APPROVED",
        ReviewAction::Reject => "OVERTIME_REJECTED",
    };
    tracing::info!(id, reviewer = %caller.employee_id, code, "Overtime reviewed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": code,
        "request": request
    })))
}
