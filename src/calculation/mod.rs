//! Calculation logic for the payroll engine.
//!
//! This module contains the pure functions that turn an employee's
//! attendance log and a rule set into a payroll record draft: attendance
//! summarisation, overtime calculation, absence and late-arrival
//! deductions, the attendance bonus, and the record assembly that ties
//! them together. Nothing in here touches shared state; the store layer
//! owns persistence.

mod attendance_bonus;
mod attendance_summary;
mod deductions;
mod overtime;
mod record;

pub use attendance_bonus::{AttendanceBonusResult, calculate_attendance_bonus};
pub use attendance_summary::{AttendanceSummary, summarize_attendance};
pub use deductions::{AbsenceDeductionResult, calculate_absence_deduction};
pub use overtime::{OvertimeResult, calculate_overtime};
pub use record::{PreviewOutcome, PreviewWarning, RecordDraft, calculate_record, run_preview};
