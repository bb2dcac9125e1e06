//! The rule bundle driving a payroll calculation.
//!
//! A [`RuleSet`] is an immutable configuration passed into the calculator,
//! either loaded from a named template file or embedded inline in a request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CycleType;

/// A named, reusable bundle of payroll calculation rules.
///
/// Rule sets are immutable once loaded; callers pass them by reference into
/// the calculator rather than mutating shared state.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RuleSet;
///
/// let rules = RuleSet::default();
/// assert!(rules.auto_calculate_overtime);
/// assert_eq!(rules.standard_daily_hours, rust_decimal::Decimal::new(8, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// The template name (informational in inline rule sets).
    #[serde(default)]
    pub name: String,
    /// A free-form description of when to use this template.
    #[serde(default)]
    pub description: String,
    /// The default cycle type for cycles generated with this template.
    #[serde(default)]
    pub default_cycle_type: CycleType,
    /// Day of month salaries are normally disbursed on.
    #[serde(default = "default_payment_day")]
    pub payment_day: u32,
    /// Whether overtime hours/amounts are computed from attendance.
    #[serde(default = "default_true")]
    pub auto_calculate_overtime: bool,
    /// Whether absence and late deductions are computed from attendance.
    #[serde(default = "default_true")]
    pub auto_calculate_deductions: bool,
    /// Whether the attendance bonus is computed from attendance.
    #[serde(default = "default_true")]
    pub auto_calculate_bonuses: bool,
    /// Hours per day beyond which worked time counts as overtime.
    #[serde(default = "default_standard_daily_hours")]
    pub standard_daily_hours: Decimal,
    /// Bonus amount granted for sufficient attendance.
    #[serde(default)]
    pub perfect_attendance_bonus: Decimal,
    /// Minimum attendance percentage (0-100) to qualify for the bonus.
    /// The boundary is inclusive: exactly this percentage qualifies.
    #[serde(default = "default_minimum_attendance")]
    pub minimum_attendance_for_bonus: Decimal,
    /// Flat amount deducted per absent day.
    #[serde(default)]
    pub per_day_absence_deduction_rate: Decimal,
    /// Flat amount deducted per late arrival.
    #[serde(default)]
    pub late_arrival_penalty: Decimal,
}

fn default_true() -> bool {
    true
}

fn default_payment_day() -> u32 {
    1
}

fn default_standard_daily_hours() -> Decimal {
    Decimal::new(8, 0)
}

fn default_minimum_attendance() -> Decimal {
    Decimal::new(95, 0)
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            default_cycle_type: CycleType::default(),
            payment_day: default_payment_day(),
            auto_calculate_overtime: true,
            auto_calculate_deductions: true,
            auto_calculate_bonuses: true,
            standard_daily_hours: default_standard_daily_hours(),
            perfect_attendance_bonus: Decimal::ZERO,
            minimum_attendance_for_bonus: default_minimum_attendance(),
            per_day_absence_deduction_rate: Decimal::ZERO,
            late_arrival_penalty: Decimal::ZERO,
        }
    }
}
