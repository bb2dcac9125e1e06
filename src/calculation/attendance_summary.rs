//! Attendance summarisation for a single employee over a pay period.
//!
//! This module reduces a per-day attendance log to the day counts and
//! attendance percentage the rest of the calculation pipeline works with.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceEntry, AttendanceStatus, Holiday, PayPeriod};

/// The summarised attendance for one employee over one pay period.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::AttendanceSummary;
/// use rust_decimal::Decimal;
///
/// let summary = AttendanceSummary {
///     total_days: 31,
///     working_days: 26,
///     present_days: 24,
///     absent_days: 2,
///     leave_days: 0,
///     holiday_days: 5,
///     late_arrivals: 1,
///     attendance_percentage: Decimal::new(9231, 2),
/// };
/// assert_eq!(summary.working_days, 26);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Calendar days in the period, inclusive of both endpoints.
    pub total_days: u32,
    /// Payable days: total days minus holidays.
    pub working_days: u32,
    /// Days recorded present.
    pub present_days: u32,
    /// Days recorded absent.
    pub absent_days: u32,
    /// Days recorded on approved leave.
    pub leave_days: u32,
    /// Holidays falling inside the period.
    pub holiday_days: u32,
    /// Present days flagged as late arrivals.
    pub late_arrivals: u32,
    /// present / working × 100, rounded to two decimal places.
    /// Zero when the period has no working days.
    pub attendance_percentage: Decimal,
}

/// Summarises an employee's attendance log over a pay period.
///
/// Only entries dated inside the period are counted, and entries falling
/// on a holiday are ignored since holidays are not payable working days.
/// Late arrivals are counted on present days only. Working days with no
/// entry at all count as absent, so a sparse log never inflates the
/// attendance percentage.
///
/// The attendance percentage is present days over working days, scaled to
/// 0-100 and rounded to two decimal places. A period consisting entirely
/// of holidays has zero working days and yields a percentage of zero
/// rather than a division error.
///
/// # Arguments
///
/// * `entries` - The employee's attendance log (any dates; filtered here)
/// * `holidays` - Holidays that may fall inside the period
/// * `period` - The pay period being summarised
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::summarize_attendance;
/// use payroll_engine::models::{AttendanceEntry, AttendanceStatus, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
/// };
/// let entries = vec![
///     AttendanceEntry {
///         employee_id: "EMP-001".to_string(),
///         date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///         status: AttendanceStatus::Present,
///         hours_worked: Decimal::new(8, 0),
///         late: false,
///     },
///     AttendanceEntry {
///         employee_id: "EMP-001".to_string(),
///         date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///         status: AttendanceStatus::Absent,
///         hours_worked: Decimal::ZERO,
///         late: false,
///     },
/// ];
///
/// let summary = summarize_attendance(&entries, &[], &period);
/// assert_eq!(summary.present_days, 1);
/// assert_eq!(summary.absent_days, 1);
/// assert_eq!(summary.attendance_percentage, Decimal::new(50, 0));
/// ```
pub fn summarize_attendance(
    entries: &[AttendanceEntry],
    holidays: &[Holiday],
    period: &PayPeriod,
) -> AttendanceSummary {
    let holiday_dates: Vec<_> = holidays
        .iter()
        .filter(|h| period.contains(h.date))
        .map(|h| h.date)
        .collect();

    let total_days = period.total_days();
    let holiday_days = holiday_dates.len() as u32;
    let working_days = total_days.saturating_sub(holiday_days);

    let mut present_days = 0u32;
    let mut leave_days = 0u32;
    let mut late_arrivals = 0u32;

    for entry in entries {
        if !period.contains(entry.date) || holiday_dates.contains(&entry.date) {
            continue;
        }
        match entry.status {
            AttendanceStatus::Present => {
                present_days += 1;
                if entry.late {
                    late_arrivals += 1;
                }
            }
            AttendanceStatus::Absent => {}
            AttendanceStatus::Leave => leave_days += 1,
        }
    }

    // Unrecorded working days count as absent, same as explicit entries
    let absent_days = working_days.saturating_sub(present_days + leave_days);

    let attendance_percentage = if working_days == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(present_days) / Decimal::from(working_days) * Decimal::ONE_HUNDRED)
            .round_dp(2)
    };

    AttendanceSummary {
        total_days,
        working_days,
        present_days,
        absent_days,
        leave_days,
        holiday_days,
        late_arrivals,
        attendance_percentage,
    }
}
