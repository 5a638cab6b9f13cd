use derive_more::{Display, Error};

/// Maps a rule failure onto the HTTP class the caller should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; fix the request.
    Validation,
    /// Nothing configured for this employee/date; ask an admin.
    NotConfigured,
    /// Illegal state transition.
    Conflict,
}

/// Every failure a core rule can produce. Each variant carries a stable
/// string code used in `{ok, code}` response envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum RuleError {
    #[display(fmt = "end date precedes start date")]
    EndBeforeStart,
    #[display(fmt = "overtime span is zero or negative")]
    InvalidHours,
    #[display(fmt = "time must be HH:MM")]
    InvalidTime,
    #[display(fmt = "year-month must be YYYY-MM")]
    InvalidYearMonth,
    #[display(fmt = "required field missing")]
    MissingFields,
    #[display(fmt = "datetime precedes the start of the current month")]
    BeforeMonthStart,
    #[display(fmt = "datetime is in the future")]
    AfterToday,
    #[display(fmt = "request already reviewed")]
    AlreadyReviewed,
    #[display(fmt = "no salary profile configured")]
    NoSalaryConfig,
    #[display(fmt = "no shift assignment configured")]
    NoShiftConfig,
}

impl RuleError {
    /// Stable code carried to API callers; never renamed once shipped.
    pub fn code(&self) -> &'static str {
        match self {
            RuleError::EndBeforeStart => "END_BEFORE_START",
            RuleError::InvalidHours => "INVALID_HOURS",
            RuleError::InvalidTime => "INVALID_TIME",
            RuleError::InvalidYearMonth => "INVALID_YEAR_MONTH",
            RuleError::MissingFields => "ERR_MISSING_FIELDS",
            RuleError::BeforeMonthStart => "ERR_BEFORE_MONTH_START",
            RuleError::AfterToday => "ERR_AFTER_TODAY",
            RuleError::AlreadyReviewed => "ALREADY_REVIEWED",
            RuleError::NoSalaryConfig => "NO_SALARY_CONFIG",
            RuleError::NoShiftConfig => "NO_SHIFT_CONFIG",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuleError::EndBeforeStart
            | RuleError::InvalidHours
            | RuleError::InvalidTime
            | RuleError::InvalidYearMonth
            | RuleError::MissingFields
            | RuleError::BeforeMonthStart
            | RuleError::AfterToday => ErrorKind::Validation,
            RuleError::NoSalaryConfig | RuleError::NoShiftConfig => ErrorKind::NotConfigured,
            RuleError::AlreadyReviewed => ErrorKind::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(RuleError::EndBeforeStart.code(), "END_BEFORE_START");
        assert_eq!(RuleError::NoSalaryConfig.code(), "NO_SALARY_CONFIG");
        assert_eq!(RuleError::AlreadyReviewed.code(), "ALREADY_REVIEWED");
    }

    #[test]
    fn kinds_map_to_distinct_classes() {
        assert_eq!(RuleError::InvalidHours.kind(), ErrorKind::Validation);
        assert_eq!(RuleError::NoShiftConfig.kind(), ErrorKind::NotConfigured);
        assert_eq!(RuleError::AlreadyReviewed.kind(), ErrorKind::Conflict);
    }
}
