use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::api::{not_found, resolve_target, rule_error};
use crate::config::Config;
use crate::identity::Caller;
use crate::model::period::YearMonth;
use crate::model::salary::{MonthlySalaryRecord, SalaryProfile, SalaryStatus};
use crate::rules::error::RuleError;
use crate::rules::payroll::calculate_monthly_salary;
use crate::store::Store;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SalaryMonthFilter {
    /// Employee whose payslip to compute
    #[param(example = "E001")]
    pub employee_id: String,
    /// Target month, YYYY-MM
    #[param(example = "2026-08")]
    pub year_month: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthOnlyFilter {
    /// Target month, YYYY-MM
    #[param(example = "2026-08")]
    pub year_month: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryFilter {
    /// Months to return, newest first; default 12, capped at 100
    #[param(example = 12)]
    pub limit: Option<usize>,
    /// Another employee's history (admin only)
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveSalaryRequest {
    #[schema(example = "E001")]
    pub employee_id: String,
    /// Target month, YYYY-MM
    #[schema(example = "2026-08")]
    pub year_month: String,
}

/// Runs the payroll engine over the month's stored facts. `Err` is a rule
/// violation for the caller, the outer error an internal one.
fn compute_salary(
    store: &web::Data<dyn Store>,
    config: &Config,
    employee_id: &str,
    month: YearMonth,
) -> actix_web::Result<Result<MonthlySalaryRecord, RuleError>> {
    let internal = |e: crate::store::StoreError, what: &'static str| {
        tracing::error!(error = %e, employee_id, what, "Failed to load payroll inputs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    };

    let profile = match store
        .salary_profile(employee_id)
        .map_err(|e| internal(e, "profile"))?
    {
        Some(profile) => profile,
        None => return Ok(Err(RuleError::NoSalaryConfig)),
    };
    let punches = store
        .punches_for_month(employee_id, month)
        .map_err(|e| internal(e, "punches"))?;
    let leaves = store
        .approved_leaves(employee_id, month)
        .map_err(|e| internal(e, "leaves"))?;
    let overtimes = store
        .approved_overtimes(employee_id, month)
        .map_err(|e| internal(e, "overtimes"))?;

    Ok(Ok(calculate_monthly_salary(
        &profile,
        &punches,
        &leaves,
        &overtimes,
        month,
        &config.pay_policy(),
    )))
}

/* =========================
Save salary profile (Admin)
========================= */
/// Swagger doc for salary profile upsert endpoint
#[utoipa::path(
    put,
    path = "/api/v1/salary/profile",
    request_body = SalaryProfile,
    responses(
        (status = 200, description = "Profile saved", body = Object, example = json!({
            "ok": true,
            "code": "SALARY_CONFIG_SAVED"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn save_profile(
    caller: Caller,
    store: web::Data<dyn Store>,
    payload: web::Json<SalaryProfile>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let profile = payload.into_inner();
    store.put_salary_profile(profile.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %profile.employee_id, "Failed to store salary profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(employee_id = %profile.employee_id, "Salary profile saved");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "SALARY_CONFIG_SAVED",
        "profile": profile
    })))
}

/* =========================
Get salary profile (Admin)
========================= */
/// Swagger doc for salary profile fetch endpoint
#[utoipa::path(
    get,
    path = "/api/v1/salary/profile/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee id")
    ),
    responses(
        (status = 200, description = "Stored profile", body = Object),
        (status = 404, description = "No profile yet", body = Object, example = json!({
            "ok": false,
            "code": "NO_SALARY_CONFIG"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn get_profile(
    caller: Caller,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;
    let target = path.into_inner();

    let profile = match store.salary_profile(&target).map_err(|e| {
        tracing::error!(error = %e, employee_id = %target, "Failed to fetch salary profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(profile) => profile,
        None => return Ok(rule_error(RuleError::NoSalaryConfig)),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "profile": profile
    })))
}

/* =========================
Calculate salary (Admin)
========================= */
/// Swagger doc for salary calculation endpoint
#[utoipa::path(
    get,
    path = "/api/v1/salary/calculate",
    params(SalaryMonthFilter),
    responses(
        (status = 200, description = "Computed payslip, not persisted", body = Object),
        (status = 400, description = "Malformed year_month"),
        (status = 404, description = "No salary profile", body = Object, example = json!({
            "ok": false,
            "code": "NO_SALARY_CONFIG"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn calculate(
    caller: Caller,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    query: web::Query<SalaryMonthFilter>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let month: YearMonth = match query.year_month.parse() {
        Ok(month) => month,
        Err(err) => return Ok(rule_error(err)),
    };

    let record = match compute_salary(&store, &config, &query.employee_id, month)? {
        Ok(record) => record,
        Err(err) => return Ok(rule_error(err)),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "record": record
    })))
}

/* =========================
Confirm and save salary (Admin)
========================= */
/// Swagger doc for salary save endpoint
#[utoipa::path(
    post,
    path = "/api/v1/salary/record",
    request_body = SaveSalaryRequest,
    responses(
        (status = 200, description = "Payslip recalculated and saved", body = Object, example = json!({
            "ok": true,
            "code": "SALARY_SAVED"
        })),
        (status = 400, description = "Malformed year_month"),
        (status = 404, description = "No salary profile"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn save_record(
    caller: Caller,
    store: web::Data<dyn Store>,
    config: web::Data<Config>,
    payload: web::Json<SaveSalaryRequest>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let month: YearMonth = match payload.year_month.parse() {
        Ok(month) => month,
        Err(err) => return Ok(rule_error(err)),
    };

    let mut record = match compute_salary(&store, &config, &payload.employee_id, month)? {
        Ok(record) => record,
        Err(err) => return Ok(rule_error(err)),
    };
    record.status = SalaryStatus::Confirmed;

    // Keyed by (employee, month): saving again simply overwrites.
    store.save_salary_record(record.clone()).map_err(|e| {
        tracing::error!(error = %e, employee_id = %payload.employee_id, "Failed to store salary record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    tracing::info!(
        employee_id = %payload.employee_id,
        year_month = %month,
        net = record.net_salary,
        "Salary saved"
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "code": "SALARY_SAVED",
        "record": record
    })))
}

/* =========================
All saved salaries (Admin)
========================= */
/// Swagger doc for monthly payroll listing endpoint
#[utoipa::path(
    get,
    path = "/api/v1/salary/all",
    params(MonthOnlyFilter),
    responses(
        (status = 200, description = "Every saved record for the month", body = Object),
        (status = 400, description = "Malformed year_month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn all_records(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<MonthOnlyFilter>,
) -> actix_web::Result<impl Responder> {
    caller.require_admin()?;

    let month: YearMonth = match query.year_month.parse() {
        Ok(month) => month,
        Err(err) => return Ok(rule_error(err)),
    };

    let records = store.salary_records_for_month(month).map_err(|e| {
        tracing::error!(error = %e, year_month = %month, "Failed to fetch salary records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "year_month": month,
        "records": records
    })))
}

/* =========================
My saved salary
========================= */
/// Swagger doc for own payslip endpoint
#[utoipa::path(
    get,
    path = "/api/v1/salary/mine",
    params(MonthOnlyFilter),
    responses(
        (status = 200, description = "Caller's saved record for the month", body = Object),
        (status = 400, description = "Malformed year_month"),
        (status = 404, description = "Nothing saved for that month"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn my_record(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<MonthOnlyFilter>,
) -> actix_web::Result<impl Responder> {
    let month: YearMonth = match query.year_month.parse() {
        Ok(month) => month,
        Err(err) => return Ok(rule_error(err)),
    };

    let record = match store.salary_record(&caller.employee_id, month).map_err(|e| {
        tracing::error!(error = %e, employee_id = %caller.employee_id, "Failed to fetch salary record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })? {
        Some(record) => record,
        None => return Ok(not_found()),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "record": record
    })))
}

/* =========================
Salary history
========================= */
/// Swagger doc for salary history endpoint
#[utoipa::path(
    get,
    path = "/api/v1/salary/history",
    params(HistoryFilter),
    responses(
        (status = 200, description = "Saved records, newest month first", body = Object),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("employee_id" = [])
    ),
    tag = "Salary"
)]
pub async fn history(
    caller: Caller,
    store: web::Data<dyn Store>,
    query: web::Query<HistoryFilter>,
) -> actix_web::Result<impl Responder> {
    let target = resolve_target(&caller, query.employee_id.clone())?;
    let limit = query.limit.unwrap_or(12).clamp(1, 100);

    let records = store.salary_history(&target, limit).map_err(|e| {
        tracing::error!(error = %e, employee_id = %target, "Failed to fetch salary history");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "employee_id": target,
        "records": records
    })))
}
