use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{ReviewRequest, not_found, resolve_target, rule_error};
use crate::config::Config;
use crate::identity::Caller;
use crate::model::attendance::{AdjustmentRequest, DailyAttendance, Punch, PunchSource, PunchType};
use crate::model::new_id;
use crate::model::period::YearMonth;
use crate::model::review::{ReviewAction, ReviewState};
use crate::rules::attendance::{abnormal_days, month_summary};
use crate::rules::ledger::{apply_review, validate_adjustment_window};
use crate::rules::shift::check_adherence;
use crate::rules::time::parse_hhmm;
use crate::store::Store;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PunchRequest {
    pub punch_type: PunchType,
    #[schema(example = "HQ lobby")]
    pub location: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthFilter {
    /// Target month, YYYY-MM
    #[param(example = "2026-08")]
    pub year_month: String,
    /// Another employee's record (admin only)
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustmentSubmitRequest {
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    pub punch_type: PunchType,
    /// Time the punch should have happened, HH:MM
    #[schema(example = "18:02")]
    pub time: String,
    pub note: Option<String>,
}

/* =========================
Punch clock
========================= */
/// Swagger doc for punch endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/punch",
    request_body = PunchRequest,
    responses(
        (status = 200, description = "Punch recorded", body = Object, example = json!({
            "ok": true,
            "code": "PUNCH_SUCCESS"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch(
    caller: Caller,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    payload: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let now = Local::now().naive_local();
    let punch = Punch {
        id: new_id("P"),
        employee_id: caller.employee_id.clone(),
        date: now.date(),
        time: now.time(),
        punch_type: payload.punch_type,
        source: PunchSource::Device,
        location: payload.location.clone(),
        note: payload.note.clone(),
    };

    store.add_punch(punch.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to record punch");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Advisory only: a late clock-in is still recorded.
    let adherence = match payload.punch_type {
        PunchType::In => store
            .shift_for(&caller.employee_id, punch.date)
            .map_err(|e| {
                tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to look up shift");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?
            .map(|shift| {
                check_adherence(punch.time, shift.start_time, config.adherence_threshold_min)
            }),
        PunchType::Out => None,
    };

    tracing::info!(
        employee_id = %caller.employee_id,
        punch_type = %punch.punch_type,
        "Punch recorded"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "PUNCH_SUCCESS",
        "punch": punch,
        "adherence": adherence
    })))
}

/* =========================
Month detail view
========================= */
/// Swagger doc for attendance details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/details",
    params(MonthFilter),
    responses(
        (status = 200, description = "Daily classification for the month", body = Object),
        (status = 400, description = "Malformed year_month", body = Object, example = json!({
            "ok": false,
            "code": "INVALID_YEAR_MONTH"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Attendance"
)]
pub async fn details(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<MonthFilter>,
) -> actix_web::Result<impl Responder> {
    let target = resolve_target(&caller, query.employee_id.clone())?;
    let month: YearMonth = match query.year_month.parse() {
        Ok(month) => month,
        Err(err) => return Ok(rule_error(err)),
    };

    let days = load_month_summary(&store, &target, month)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "employee_id": target,
        "year_month": month,
        "days": days
    })))
}

/* =========================
Abnormal days
========================= */
/// Swagger doc for abnormal attendance endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/abnormal",
    params(MonthFilter),
    responses(
        (status = 200, description = "Days missing an IN or OUT punch", body = Object),
        (status = 400, description = "Malformed year_month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Attendance"
)]
pub async fn abnormal(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<MonthFilter>,
) -> actix_web::Result<impl Responder> {
    let target = resolve_target(&caller, query.employee_id.clone())?;
    let month: YearMonth = match query.year_month.parse() {
        Ok(month) => month,
        Err(err) => return Ok(rule_error(err)),
    };

    let days = abnormal_days(load_month_summary(&store, &target, month)?);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "employee_id": target,
        "year_month": month,
        "days": days
    })))
}

fn load_month_summary(
    store: &web::Data<dyn Store>,
    employee_id: &str,
    month: YearMonth,
) -> actix_web::Result<Vec<DailyAttendance>> {
    let punches = store.punches_for_month(employee_id, month).map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch punches");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let adjustments = store.adjustments_for_month(employee_id, month).map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to fetch adjustment requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let today = Local::now().date_naive();
    Ok(month_summary(&punches, &adjustments, month, today))
}

/* =========================
Submit punch adjustment
========================= */
/// Swagger doc for adjustment submission endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/adjust",
    request_body = AdjustmentSubmitRequest,
    responses(
        (status = 200, description = "Adjustment submitted", body = Object, example = json!({
            "ok": true,
            "code": "ADJUST_SUBMIT_SUCCESS"
        })),
        (status = 400, description = "Bad time or out-of-window date", body = Object, example = json!({
            "ok": false,
            "code": "ERR_AFTER_TODAY"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Attendance"
)]
pub async fn submit_adjustment(
    caller: Caller,
    store: web::Data<dyn Store>,
    payload: web::Json<AdjustmentSubmitRequest>,
) -> actix_web::Result<impl Responder> {
    let time = match parse_hhmm(&payload.time) {
        Ok(time) => time,
        Err(err) => return Ok(rule_error(err)),
    };
    let requested_time = NaiveDateTime::new(payload.date, time);
    let today = Local::now().date_naive();
    if let Err(err) = validate_adjustment_window(requested_time, today) {
        return Ok(rule_error(err));
    }

    let request = AdjustmentRequest {
        id: new_id("ADJ"),
        employee_id: caller.employee_id.clone(),
        employee_name: caller.name.clone(),
        date: payload.date,
        punch_type: payload.punch_type,
        requested_time,
        note: payload.note.clone(),
        review: ReviewState::pending(),
        submitted_at: Local::now().naive_local(),
    };

    store.put_adjustment(request.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to store adjustment request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "ADJUST_SUBMIT_SUCCESS",
        "request": request
    })))
}

/* =========================
Pending adjustments (Admin)
========================= */
/// Swagger doc for pending adjustments endpoint
#[utoipa::path(
    get,
    path = "/api/v1/attendance/adjustments/pending",
    responses(
        (status = 200, description = "Open adjustment queue, oldest first", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Attendance"
)]
pub async fn pending_adjustments(
    caller: Caller,
    store: web::Data<dyn Store>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let requests = store.pending_adjustments().map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch pending adjustments");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "requests": requests
    })))
}

/* =========================
Review adjustment (Admin)
========================= */
/// Swagger doc for adjustment review endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/adjustments/{id}/review",
    params(
        ("id" = String, Path, description = "Adjustment request id")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Decision applied", body = Object, example = json!({
            "ok": true,
            "code": "REQUEST_APPROVED"
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
    tag = "Attendance"
)]
pub async fn review_adjustment(
    caller: Caller,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let id = path.into_inner();
    let mut request = match store.adjustment(&id).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch adjustment request");
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

    store.put_adjustment(request.clone()).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to store review decision");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Approval writes the missing punch back into the attendance record.
    if payload.action == ReviewAction::Approve {
        let repaired = Punch {
            id: new_id("P"),
            employee_id: request.employee_id.clone(),
            date: request.date,
            time: request.requested_time.time(),
            punch_type: request.punch_type,
            source: PunchSource::Repair,
            location: None,
            note: request.note.clone(),
        };
        store.add_punch(repaired).map_err(|e| {
            tracing::error!(error = %e, id, "Failed to append repaired punch");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    let code = match payload.action {
        ReviewAction::Approve => "REQUEST_APPROVED",
        ReviewAction::Reject => "REQUEST_REJECTED",
    };
    tracing::info!(id, reviewer = %caller.employee_id, code, "Adjustment reviewed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": code,
        "request": request
    })))
}
