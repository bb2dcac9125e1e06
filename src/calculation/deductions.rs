//! Absence and late-arrival deductions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The automatic deductions computed from an attendance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceDeductionResult {
    /// absent_days × the per-day deduction rate.
    pub absence_deduction: Decimal,
    /// late_arrivals × the per-occurrence penalty.
    pub late_penalty: Decimal,
}

impl AbsenceDeductionResult {
    /// The combined automatic deduction.
    pub fn total(&self) -> Decimal {
        self.absence_deduction + self.late_penalty
    }
}

/// Calculates the automatic deductions for a pay period.
///
/// Both components are flat rates, not salary fractions: each absent day
/// deducts `per_day_rate` and each late arrival deducts `late_penalty`.
/// Leave days never attract a deduction.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_absence_deduction;
/// use rust_decimal::Decimal;
///
/// let result = calculate_absence_deduction(
///     2,
///     1,
///     Decimal::new(100, 0),
///     Decimal::new(50, 0),
/// );
/// assert_eq!(result.absence_deduction, Decimal::new(200, 0));
/// assert_eq!(result.late_penalty, Decimal::new(50, 0));
/// assert_eq!(result.total(), Decimal::new(250, 0));
/// ```
pub fn calculate_absence_deduction(
    absent_days: u32,
    late_arrivals: u32,
    per_day_rate: Decimal,
    late_penalty: Decimal,
) -> AbsenceDeductionResult {
    AbsenceDeductionResult {
        absence_deduction: Decimal::from(absent_days) * per_day_rate,
        late_penalty: Decimal::from(late_arrivals) * late_penalty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_no_absences_no_deduction() {
        let result = calculate_absence_deduction(0, 0, dec(100), dec(50));
        assert_eq!(result.total(), Decimal::ZERO);
    }

    #[test]
    fn test_two_absences_at_100_deduct_200() {
        let result = calculate_absence_deduction(2, 0, dec(100), dec(50));
        assert_eq!(result.absence_deduction, dec(200));
        assert_eq!(result.late_penalty, Decimal::ZERO);
        assert_eq!(result.total(), dec(200));
    }

    #[test]
    fn test_late_arrivals_penalized_per_occurrence() {
        let result = calculate_absence_deduction(0, 3, dec(100), dec(50));
        assert_eq!(result.late_penalty, dec(150));
    }

    #[test]
    fn test_combined_absences_and_lates() {
        let result = calculate_absence_deduction(2, 1, dec(100), dec(50));
        assert_eq!(result.total(), dec(250));
    }

    #[test]
    fn test_zero_rates_deduct_nothing() {
        let result = calculate_absence_deduction(5, 5, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(result.total(), Decimal::ZERO);
    }

    #[test]
    fn test_deduction_scales_with_absent_days() {
        for days in 0..10u32 {
            let result = calculate_absence_deduction(days, 0, dec(100), Decimal::ZERO);
            assert_eq!(result.absence_deduction, dec(days as i64 * 100));
        }
    }
}
