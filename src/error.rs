//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll processing.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::CycleStatus;

/// The main error type for the payroll engine.
///
/// All payroll operations return this error type, making it easy to handle
/// errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::TemplateNotFound {
///     name: "night-shift".to_string(),
/// };
/// assert_eq!(error.to_string(), "Payroll template not found: night-shift");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Template configuration file was not found at the specified path.
    #[error("Template file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Template configuration file could not be parsed.
    #[error("Failed to parse template file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No template with the given name is loaded.
    #[error("Payroll template not found: {name}")]
    TemplateNotFound {
        /// The requested template name.
        name: String,
    },

    /// The requested pay period was invalid.
    #[error("Invalid pay period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// An employee has no attendance data at all for the cycle's range.
    ///
    /// Generation is blocked for that employee and the condition is surfaced
    /// as a per-employee warning rather than a zeroed-out record.
    #[error("No attendance data for employee '{employee_id}' in the requested period")]
    MissingAttendance {
        /// The employee without attendance data.
        employee_id: String,
    },

    /// No pay cycle exists with the given ID.
    #[error("Pay cycle not found: {id}")]
    CycleNotFound {
        /// The requested cycle ID.
        id: Uuid,
    },

    /// No payroll record exists with the given ID.
    #[error("Payroll record not found: {id}")]
    RecordNotFound {
        /// The requested record ID.
        id: Uuid,
    },

    /// No adjustment exists with the given ID on the record.
    #[error("Adjustment not found: {id}")]
    AdjustmentNotFound {
        /// The requested adjustment ID.
        id: Uuid,
    },

    /// A cycle status change would move backwards in the lifecycle.
    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidStatusTransition {
        /// The cycle's current status.
        from: CycleStatus,
        /// The requested status.
        to: CycleStatus,
    },

    /// Another generation for the same pay period is already running.
    #[error("Payroll generation already in progress for {start} to {end}")]
    GenerationInProgress {
        /// The period start date.
        start: NaiveDate,
        /// The period end date.
        end: NaiveDate,
    },

    /// The cycle has advanced past the point where records may be replaced.
    #[error("Pay cycle {id} is '{status}' and can no longer be regenerated")]
    CycleLocked {
        /// The cycle ID.
        id: Uuid,
        /// The cycle's current status.
        status: CycleStatus,
    },

    /// An adjustment was rejected during validation.
    #[error("Invalid adjustment: {message}")]
    InvalidAdjustment {
        /// A description of what made the adjustment invalid.
        message: String,
    },

    /// A payment would push the total paid for a record past its net salary.
    #[error("Payment of {amount} exceeds remaining net salary for record {record_id}")]
    PaymentExceedsNet {
        /// The record the payment was for.
        record_id: Uuid,
        /// The rejected payment amount.
        amount: rust_decimal::Decimal,
    },

    /// A request failed field-level validation.
    #[error("Validation failed for '{field}': {message}")]
    ValidationError {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_not_found_displays_name() {
        let error = EngineError::TemplateNotFound {
            name: "ramadan-hours".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll template not found: ramadan-hours"
        );
    }

    #[test]
    fn test_missing_attendance_displays_employee() {
        let error = EngineError::MissingAttendance {
            employee_id: "EMP-017".to_string(),
        };
        assert!(error.to_string().contains("EMP-017"));
    }

    #[test]
    fn test_status_transition_displays_both_states() {
        let error = EngineError::InvalidStatusTransition {
            from: CycleStatus::Paid,
            to: CycleStatus::Draft,
        };
        assert_eq!(error.to_string(), "Invalid status transition from 'paid' to 'draft'");
    }

    #[test]
    fn test_generation_in_progress_displays_period() {
        let error = EngineError::GenerationInProgress {
            start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll generation already in progress for 2026-03-01 to 2026-03-31"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_period() -> EngineResult<()> {
            Err(EngineError::InvalidPeriod {
                message: "end before start".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_period()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
