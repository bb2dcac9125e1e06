//! Pay period, holiday, and attendance log models.
//!
//! These types define the calculation context for a payroll run: the date
//! range being paid, the holidays inside it, and the per-day attendance log
//! for each employee.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The attendance status recorded for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee was present and worked.
    Present,
    /// The employee was absent without approved leave.
    Absent,
    /// The employee was on approved leave (payable, no deduction).
    Leave,
}

/// One day of an employee's attendance log.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceEntry, AttendanceStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let entry = AttendanceEntry {
///     employee_id: "EMP-001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     status: AttendanceStatus::Present,
///     hours_worked: Decimal::new(95, 1), // 9.5 hours
///     late: false,
/// };
/// assert_eq!(entry.status, AttendanceStatus::Present);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// The employee this entry belongs to.
    pub employee_id: String,
    /// The calendar date of the entry.
    pub date: NaiveDate,
    /// The recorded status for the day.
    pub status: AttendanceStatus,
    /// Hours worked on the day (zero for absent/leave days).
    #[serde(default)]
    pub hours_worked: Decimal,
    /// Whether the employee arrived after the grace period.
    #[serde(default)]
    pub late: bool,
}

/// A holiday falling inside a pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday (e.g., "Victory Day").
    pub name: String,
}

/// The date range a payroll run covers.
///
/// Periods are inclusive of both endpoints and need not align to calendar
/// month boundaries; partial-month runs are first-class.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
/// assert_eq!(period.total_days(), 31);
/// assert!(period.contains(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Returns the number of calendar days in the period, inclusive.
    pub fn total_days(&self) -> u32 {
        (self.end_date - self.start_date).num_days() as u32 + 1
    }

    /// Checks whether a date falls within the period (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterates over every calendar day in the period.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date.iter_days().take(self.total_days() as usize)
    }
}
