use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{ReviewRequest, not_found, resolve_target, rule_error};
use crate::identity::Caller;
use crate::model::leave::{LeaveRequest, LeaveType};
use crate::model::new_id;
use crate::model::review::{ReviewAction, ReviewState};
use crate::rules::ledger::{apply_review, leave_balances, validate_leave_span};
use crate::store::Store;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LeaveSubmitRequest {
    pub leave_type: LeaveType,
    #[schema(value_type = String, format = "date", example = "2026-08-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date", example = "2026-08-12")]
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceFilter {
    /// Calendar year, defaults to the current one
    #[param(example = 2026)]
    pub year: Option<i32>,
    /// Another employee's balance (admin only)
    pub employee_id: Option<String>,
}

/* =========================
Submit leave
========================= */
/// Swagger doc for leave submission endpoint
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body = LeaveSubmitRequest,
    responses(
        (status = 200, description = "Leave submitted", body = Object, example = json!({
            "ok": true,
            "code": "LEAVE_SUBMIT_SUCCESS"
        })),
        (status = 400, description = "End before start", body = Object, example = json!({
            "ok": false,
            "code": "END_BEFORE_START"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Leave"
)]
pub async fn submit_leave(
    caller: Caller,
    store: web::Data<dyn Store>,
    payload: web::Json<LeaveSubmitRequest>,
) -> actix_web::Result<impl Responder> {
    let days = match validate_leave_span(payload.start_date, payload.end_date) {
        Ok(days) => days,
        Err(err) => return Ok(rule_error(err)),
    };

    let request = LeaveRequest {
        id: new_id("LV"),
        employee_id: caller.employee_id.clone(),
        employee_name: caller.name.clone(),
        leave_type: payload.leave_type,
        start_date: payload.start_date,
        end_date: payload.end_date,
        days,
        reason: payload.reason.clone(),
        review: ReviewState::pending(),
        submitted_at: Local::now().naive_local(),
    };

    store.put_leave(request.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to store leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        employee_id = %caller.employee_id,
        leave_type = %request.leave_type,
        days,
        "Leave submitted"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "LEAVE_SUBMIT_SUCCESS",
        "request": request
    })))
}

/* =========================
My leave requests
========================= */
/// Swagger doc for own leave list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/mine",
    responses(
        (status = 200, description = "Caller's leave requests, newest first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Leave"
)]
pub async fn my_leaves(
    caller: Caller,
    store: web::Data<dyn Store>,
) -> actix_web::Result<impl Responder> {
    let requests = store.leaves_for_employee(&caller.employee_id).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to fetch leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "requests": requests
    })))
}

/* =========================
Leave balance
========================= */
/// Swagger doc for leave balance endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    params(BalanceFilter),
    responses(
        (status = 200, description = "Per-type quota usage for the year", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Leave"
)]
pub async fn balance(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<BalanceFilter>,
) -> actix_web::Result<impl Responder> {
    let target = resolve_target(&caller, query.employee_id.clone())?;
    let year = query.year.unwrap_or_else(|| Local::now().year());

    let approved = store.approved_leaves_in_year(&target, year).map_err(|e| {
        tracing::error!(error = %e, employee_id = %target, "Failed to fetch approved leaves");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "employee_id": target,
        "year": year,
        "balances": leave_balances(&approved, year)
    })))
}

/* =========================
Pending leaves (Admin)
========================= */
/// Swagger doc for pending leaves endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending",
    responses(
        (status = 200, description = "Open leave queue, oldest first", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Leave"
)]
pub async fn pending_leaves(
    caller: Caller,
    store: web::Data<dyn Store>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let requests = store.pending_leaves().map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch pending leaves");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "requests": requests
    })))
}

/* =========================
Review leave (Admin)
========================= */
/// Swagger doc for leave review endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{id}/review",
    params(
        ("id" = String, Path, description = "Leave request id")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Decision applied", body = Object, example = json!({
            "ok": true,
            "code": "LEAVE_APPROVED"
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
    tag = "Leave"
)]
pub async fn review_leave(
    caller: Caller,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let id = path.into_inner();
    let mut request = match store.leave(&id).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch leave request");
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

    store.put_leave(request.clone()).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to store review decision");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let code = match payload.action {
        ReviewAction::Approve => "LEAVE_APPROVED",
        ReviewAction::Reject => "LEAVE_REJECTED",
    };
    tracing::info!(id, reviewer = %caller.employee_id, code, "Leave reviewed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": code,
        "request": request
    })))
}
