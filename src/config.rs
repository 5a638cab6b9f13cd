use std::collections::BTreeSet;
use std::env;

use chrono::NaiveDate;
use dotenvy::dotenv;

use crate::rules::payroll::PayPolicy;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_punch_per_min: u32,
    pub rate_submit_per_min: u32,
    pub rate_general_per_min: u32,

    // Payroll policy
    pub standard_monthly_days: f64,
    pub daily_work_hours: f64,
    pub weekday_ot_multiplier: f64,
    pub restday_ot_multiplier: f64,
    pub holiday_ot_multiplier: f64,
    pub employer_labor_factor: f64,
    pub employer_health_factor: f64,
    pub employer_employment_factor: f64,
    pub employer_pension_rate: f64,

    // Shift adherence
    pub adherence_threshold_min: i64,

    /// Statutory holidays, `YYYY-MM-DD` comma separated in `HOLIDAY_DATES`.
    pub holidays: BTreeSet<NaiveDate>,

    /// Optional JSON fixture loaded into the store at startup.
    pub seed_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_punch_per_min: env::var("RATE_PUNCH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_general_per_min: env::var("RATE_GENERAL_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            standard_monthly_days: env::var("STANDARD_MONTHLY_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            daily_work_hours: env::var("DAILY_WORK_HOURS")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .unwrap(),
            weekday_ot_multiplier: env::var("WEEKDAY_OT_MULTIPLIER")
                .unwrap_or_else(|_| "1.34".to_string())
                .parse()
                .unwrap(),
            restday_ot_multiplier: env::var("RESTDAY_OT_MULTIPLIER")
                .unwrap_or_else(|_| "1.67".to_string())
                .parse()
                .unwrap(),
            holiday_ot_multiplier: env::var("HOLIDAY_OT_MULTIPLIER")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse()
                .unwrap(),
            employer_labor_factor: env::var("EMPLOYER_LABOR_FACTOR")
                .unwrap_or_else(|_| "3.5".to_string())
                .parse()
                .unwrap(),
            employer_health_factor: env::var("EMPLOYER_HEALTH_FACTOR")
                .unwrap_or_else(|_| "2.0".to_string())
                .parse()
                .unwrap(),
            employer_employment_factor: env::var("EMPLOYER_EMPLOYMENT_FACTOR")
                .unwrap_or_else(|_| "3.5".to_string())
                .parse()
                .unwrap(),
            employer_pension_rate: env::var("EMPLOYER_PENSION_RATE")
                .unwrap_or_else(|_| "0.06".to_string())
                .parse()
                .unwrap(),

            adherence_threshold_min: env::var("ADHERENCE_THRESHOLD_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),

            holidays: env::var("HOLIDAY_DATES")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse().expect("HOLIDAY_DATES entries must be YYYY-MM-DD"))
                .collect(),

            seed_file: env::var("SEED_FILE").ok(),
        }
    }

    pub fn pay_policy(&self) -> PayPolicy {
        PayPolicy {
            standard_monthly_days: self.standard_monthly_days,
            daily_work_hours: self.daily_work_hours,
            weekday_multiplier: self.weekday_ot_multiplier,
            restday_multiplier: self.restday_ot_multiplier,
            holiday_multiplier: self.holiday_ot_multiplier,
            employer_labor_factor: self.employer_labor_factor,
            employer_health_factor: self.employer_health_factor,
            employer_employment_factor: self.employer_employment_factor,
            employer_pension_rate: self.employer_pension_rate,
            holidays: self.holidays.clone(),
        }
    }
}
