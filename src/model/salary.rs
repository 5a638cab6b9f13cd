use std::collections::HashMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::model::period::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SalaryType {
    /// `base_salary` is the monthly wage.
    Monthly,
    /// `base_salary` is the hourly rate; base pay comes from punched hours.
    Hourly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmployeeType {
    FullTime,
    PartTime,
    Contractor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SalaryStatus {
    /// Computed and returned to the caller, not persisted.
    Calculated,
    /// Persisted payslip.
    Confirmed,
}

/// Per-employee payroll configuration, maintained by an admin. The four
/// statutory fees and the income tax are flat monthly amounts; the pension
/// self-contribution is a percentage of base pay.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalaryProfile {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Chris Lin")]
    pub employee_name: String,
    pub id_number: Option<String>,
    pub employee_type: EmployeeType,
    pub salary_type: SalaryType,
    #[schema(example = 30000.0)]
    pub base_salary: f64,
    #[schema(example = "822")]
    pub bank_code: Option<String>,
    pub bank_account: Option<String>,
    #[schema(value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,
    /// Day of month wages are disbursed.
    #[schema(example = 5)]
    pub payment_day: u8,
    /// Pension self-contribution rate in percent, 0..=6.
    #[schema(example = 0.0)]
    pub pension_self_rate: f64,
    #[schema(example = 666.0)]
    pub labor_fee: f64,
    #[schema(example = 517.0)]
    pub health_fee: f64,
    #[schema(example = 70.0)]
    pub employment_fee: f64,
    #[schema(example = 0.0)]
    pub income_tax: f64,
    pub note: Option<String>,
}

/// One employee's payslip for one month; keyed by (employee_id, year_month),
/// saving again overwrites. Employer-side fields are reporting mirrors and
/// never reduce `net_salary`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlySalaryRecord {
    #[schema(example = "E001")]
    pub employee_id: String,
    #[schema(example = "Chris Lin")]
    pub employee_name: String,
    #[schema(value_type = String, example = "2026-08")]
    pub year_month: YearMonth,
    #[schema(example = 30000.0)]
    pub base_salary: f64,
    pub weekday_overtime_pay: f64,
    pub restday_overtime_pay: f64,
    pub holiday_overtime_pay: f64,
    pub labor_fee: f64,
    pub health_fee: f64,
    pub employment_fee: f64,
    pub pension_self: f64,
    pub income_tax: f64,
    pub leave_deduction: f64,
    #[schema(example = 30000.0)]
    pub gross_salary: f64,
    #[schema(example = 1253.0)]
    pub total_deductions: f64,
    #[schema(example = 28747.0)]
    pub net_salary: f64,
    pub employer_labor_fee: f64,
    pub employer_health_fee: f64,
    pub employer_employment_fee: f64,
    pub employer_pension: f64,
    pub bank_code: Option<String>,
    pub bank_account: Option<String>,
    pub bank_name: Option<String>,
    pub status: SalaryStatus,
}

static BANK_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("004", "Bank of Taiwan"),
        ("005", "Land Bank of Taiwan"),
        ("006", "Taiwan Cooperative Bank"),
        ("007", "First Commercial Bank"),
        ("008", "Hua Nan Commercial Bank"),
        ("009", "Chang Hwa Bank"),
        ("012", "Taipei Fubon Bank"),
        ("013", "Cathay United Bank"),
        ("017", "Mega International Commercial Bank"),
        ("050", "Taiwan Business Bank"),
        ("103", "Taiwan Shin Kong Commercial Bank"),
        ("700", "Chunghwa Post"),
        ("803", "Union Bank of Taiwan"),
        ("806", "Yuanta Commercial Bank"),
        ("807", "Bank SinoPac"),
        ("808", "E.SUN Commercial Bank"),
        ("809", "KGI Bank"),
        ("812", "Taishin International Bank"),
        ("822", "CTBC Bank"),
    ])
});

/// Display name for a clearing bank code, if known.
pub fn bank_name(code: &str) -> Option<&'static str> {
    BANK_NAMES.get(code).copied()
}
