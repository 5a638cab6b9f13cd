use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{not_found, rule_error};
use crate::config::Config;
use crate::identity::Caller;
use crate::model::new_id;
use crate::model::period::YearMonth;
use crate::model::shift::{ShiftAssignment, ShiftType};
use crate::rules::attendance::first_in;
use crate::rules::error::RuleError;
use crate::rules::shift::{check_adherence, resolve_shift_times, shift_stats};
use crate::rules::time::parse_hhmm;
use crate::store::Store;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShiftUpsertRequest {
    #[schema(example = "E001")]
    pub employee_id: String,
    pub employee_name: Option<String>,
    #[schema(value_type = String, format = "date", example = "2026-08-03")]
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    /// HH:MM; named types fill in whichever side is omitted
    #[schema(example = "08:00")]
    pub start_time: Option<String>,
    #[schema(example = "16:00")]
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchShiftRequest {
    pub assignments: Vec<ShiftUpsertRequest>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShiftFilter {
    /// Range start, defaults to the current month
    #[param(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    /// Range end, defaults to the current month
    #[param(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
    /// Limit to one employee (admin only; employees always see their own)
    pub employee_id: Option<String>,
    pub shift_type: Option<ShiftType>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsFilter {
    #[param(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdherenceFilter {
    /// Date to check, defaults to today
    #[param(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
}

fn build_assignment(id: String, req: &ShiftUpsertRequest) -> Result<ShiftAssignment, RuleError> {
    let start = req.start_time.as_deref().map(parse_hhmm).transpose()?;
    let end = req.end_time.as_deref().map(parse_hhmm).transpose()?;
    let (start_time, end_time) = resolve_shift_times(req.shift_type, start, end)?;
    Ok(ShiftAssignment {
        id,
        employee_id: req.employee_id.clone(),
        employee_name: req
            .employee_name
            .clone()
            .unwrap_or_else(|| req.employee_id.clone()),
        date: req.date,
        shift_type: req.shift_type,
        start_time,
        end_time,
        location: req.location.clone(),
        note: req.note.clone(),
    })
}

fn range_or_current_month(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), RuleError> {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            let month = YearMonth::of(Local::now().date_naive());
            (month.first_day(), month.last_day())
        }
    };
    if end < start {
        return Err(RuleError::EndBeforeStart);
    }
    Ok((start, end))
}

/* =========================
Add shift (Admin)
========================= */
/// Swagger doc for shift creation endpoint
#[utoipa::path(
    post,
    path = "/api/v1/shift",
    request_body = ShiftUpsertRequest,
    responses(
        (status = 200, description = "Shift assigned", body = Object, example = json!({
            "ok": true,
            "code": "SHIFT_ADDED"
        })),
        (status = 400, description = "Custom shift without times", body = Object, example = json!({
            "ok": false,
            "code": "ERR_MISSING_FIELDS"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn add_shift(
    caller: Caller,
    store: web::Data<dyn Store>,
    payload: web::Json<ShiftUpsertRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let assignment = match build_assignment(new_id("SH"), &payload) {
        Ok(assignment) => assignment,
        Err(err) => return Ok(rule_error(err)),
    };

    store.put_shift(assignment.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %assignment.employee_id, "Failed to store shift");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        employee_id = %assignment.employee_id,
        date = %assignment.date,
        shift_type = %assignment.shift_type,
        "Shift assigned"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "SHIFT_ADDED",
        "assignment": assignment
    })))
}

/* =========================
Batch add shifts (Admin)
========================= */
/// Swagger doc for batch shift creation endpoint
#[utoipa::path(
    post,
    path = "/api/v1/shift/batch",
    request_body = BatchShiftRequest,
    responses(
        (status = 200, description = "All rows assigned", body = Object, example = json!({
            "ok": true,
            "code": "BATCH_SHIFTS_ADDED",
            "added": 3
        })),
        (status = 400, description = "Any invalid row rejects the whole batch"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn add_shifts_batch(
    caller: Caller,
    store: web::Data<dyn Store>,
    payload: web::Json<BatchShiftRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    if payload.assignments.is_empty() {
        return Ok(rule_error(RuleError::MissingFields));
    }

    // Validate every row before writing any.
    let mut prepared = Vec::with_capacity(payload.assignments.len());
    for row in &payload.assignments {
        match build_assignment(new_id("SH"), row) {
            Ok(assignment) => prepared.push(assignment),
            Err(err) => return Ok(rule_error(err)),
        }
    }

    for assignment in &prepared {
        store.put_shift(assignment.clone()).map_err(|e| {
            tracing::error!(error = %e, employee_id = %assignment.employee_id, "Failed to store shift");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    tracing::info!(added = prepared.len(), "Batch shifts assigned");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "BATCH_SHIFTS_ADDED",
        "added": prepared.len(),
        "assignments": prepared
    })))
}

/* =========================
List shifts
========================= */
/// Swagger doc for shift listing endpoint
#[utoipa::path(
    get,
    path = "/api/v1/shift",
    params(ShiftFilter),
    responses(
        (status = 200, description = "Assignments in the range, date ordered", body = Object),
        (status = 400, description = "Range end before start"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn list_shifts(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<ShiftFilter>,
) -> actix_web::Result<impl Responder> {
    let (start, end) = match range_or_current_month(query.start_date, query.end_date) {
        Ok(range) => range,
        Err(err) => return Ok(rule_error(err)),
    };

    let mut assignments = store.shifts_in_range(start, end).map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch shifts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // Employees see their own schedule; admins see everyone's.
    if caller.is_admin() {
        if let Some(employee_id) = query.employee_id.as_deref() {
            assignments.retain(|a| a.employee_id == employee_id);
        }
    } else {
        assignments.retain(|a| a.employee_id == caller.employee_id);
    }
    if let Some(shift_type) = query.shift_type {
        assignments.retain(|a| a.shift_type == shift_type);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "start_date": start,
        "end_date": end,
        "assignments": assignments
    })))
}

/* =========================
Update shift (Admin)
========================= */
/// Swagger doc for shift update endpoint
#[utoipa::path(
    put,
    path = "/api/v1/shift/{id}",
    params(
        ("id" = String, Path, description = "Assignment id")
    ),
    request_body = ShiftUpsertRequest,
    responses(
        (status = 200, description = "Shift replaced", body = Object, example = json!({
            "ok": true,
            "code": "SHIFT_UPDATED"
        })),
        (status = 404, description = "No such assignment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn update_shift(
    caller: Caller,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    payload: web::Json<ShiftUpsertRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let id = path.into_inner();
    let exists = store.shift_by_id(&id).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to fetch shift");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    if exists.is_none() {
        return Ok(not_found());
    }

    let assignment = match build_assignment(id.clone(), &payload) {
        Ok(assignment) => assignment,
        Err(err) => return Ok(rule_error(err)),
    };

    store.put_shift(assignment.clone()).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to store shift");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "SHIFT_UPDATED",
        "assignment": assignment
    })))
}

/* =========================
Delete shift (Admin)
========================= */
/// Swagger doc for shift deletion endpoint
#[utoipa::path(
    delete,
    path = "/api/v1/shift/{id}",
    params(
        ("id" = String, Path, description = "Assignment id")
    ),
    responses(
        (status = 200, description = "Shift removed", body = Object, example = json!({
            "ok": true,
            "code": "SHIFT_DELETED"
        })),
        (status = 404, description = "No such assignment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn delete_shift(
    caller: Caller,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let id = path.into_inner();
    let removed = store.remove_shift(&id).map_err(|e| {
        tracing::error!(error = %e, id, "Failed to delete shift");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    if !removed {
        return Ok(not_found());
    }

    tracing::info!(id, "Shift deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "SHIFT_DELETED"
    })))
}

/* =========================
Shift stats (Admin)
========================= */
/// Swagger doc for shift statistics endpoint
#[utoipa::path(
    get,
    path = "/api/v1/shift/stats",
    params(StatsFilter),
    responses(
        (status = 200, description = "Assignment counts by type over the range", body = Object),
        (status = 400, description = "Range end before start"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn stats(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<StatsFilter>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let (start, end) = match range_or_current_month(query.start_date, query.end_date) {
        Ok(range) => range,
        Err(err) => return Ok(rule_error(err)),
    };

    let assignments = store.shifts_in_range(start, end).map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch shifts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "start_date": start,
        "end_date": end,
        "stats": shift_stats(&assignments)
    })))
}

/* =========================
My adherence
========================= */
/// Swagger doc for shift adherence endpoint
#[utoipa::path(
    get,
    path = "/api/v1/shift/adherence",
    params(AdherenceFilter),
    responses(
        (status = 200, description = "First IN against the assigned start", body = Object),
        (status = 404, description = "No shift assigned, or no IN punch yet", body = Object, example = json!({
            "ok": false,
            "code": "NO_SHIFT_CONFIG"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Shift"
)]
pub async fn my_adherence(
    caller: Caller,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    query: web::Query<AdherenceFilter>,
) -> actix_web::Result<impl Responder> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());

    let shift = match store.shift_for(&caller.employee_id, date).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to look up shift");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(shift) => shift,
        None => return Ok(rule_error(RuleError::NoShiftConfig)),
    };

    let punches = store.punches_for_day(&caller.employee_id, date).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to fetch punches");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    let arrival = match first_in(&punches) {
        Some(time) => time,
        None => return Ok(not_found()),
    };

    let adherence = check_adherence(arrival, shift.start_time, config.adherence_threshold_min);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "date": date,
        "shift": shift,
        "first_in": arrival,
        "adherence": adherence
    })))
}
