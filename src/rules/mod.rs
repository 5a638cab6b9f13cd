pub mod attendance;
pub mod error;
pub mod ledger;
pub mod payroll;
pub mod shift;
pub mod time;
