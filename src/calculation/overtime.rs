//! Overtime calculation from attendance logs.
//!
//! Overtime accrues per present day: any hours worked beyond the standard
//! daily hours count towards the overtime total, paid at the employee's
//! hourly overtime rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceEntry, AttendanceStatus, PayPeriod};

/// The result of an overtime calculation for one employee.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::OvertimeResult;
/// use rust_decimal::Decimal;
///
/// let result = OvertimeResult {
///     overtime_hours: Decimal::new(35, 1),  // 3.5 hours
///     overtime_amount: Decimal::new(525, 0), // at 150/hour
/// };
/// assert_eq!(result.overtime_amount, Decimal::new(525, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeResult {
    /// Total hours worked beyond the daily standard across the period.
    pub overtime_hours: Decimal,
    /// overtime_hours × the employee's overtime rate.
    pub overtime_amount: Decimal,
}

/// Calculates overtime hours and pay over a pay period.
///
/// Each present-day entry inside the period contributes
/// `max(hours_worked - standard_daily_hours, 0)` hours. Absent and leave
/// days never contribute, whatever their recorded hours. The amount is
/// the summed hours times `overtime_rate`; an employee with a zero rate
/// accrues hours but no pay.
///
/// # Arguments
///
/// * `entries` - The employee's attendance log
/// * `period` - The pay period being calculated
/// * `standard_daily_hours` - Hours per day before overtime starts
/// * `overtime_rate` - The employee's hourly overtime rate
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_overtime;
/// use payroll_engine::models::{AttendanceEntry, AttendanceStatus, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// };
/// let entries = vec![AttendanceEntry {
///     employee_id: "EMP-001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     status: AttendanceStatus::Present,
///     hours_worked: Decimal::new(10, 0),
///     late: false,
/// }];
///
/// let result = calculate_overtime(
///     &entries,
///     &period,
///     Decimal::new(8, 0),
///     Decimal::new(150, 0),
/// );
/// assert_eq!(result.overtime_hours, Decimal::new(2, 0));
/// assert_eq!(result.overtime_amount, Decimal::new(300, 0));
/// ```
pub fn calculate_overtime(
    entries: &[AttendanceEntry],
    period: &PayPeriod,
    standard_daily_hours: Decimal,
    overtime_rate: Decimal,
) -> OvertimeResult {
    let overtime_hours: Decimal = entries
        .iter()
        .filter(|e| e.status == AttendanceStatus::Present && period.contains(e.date))
        .map(|e| {
            if e.hours_worked > standard_daily_hours {
                e.hours_worked - standard_daily_hours
            } else {
                Decimal::ZERO
            }
        })
        .sum();

    OvertimeResult {
        overtime_hours,
        overtime_amount: overtime_hours * overtime_rate,
    }
}
