//! Attendance bonus qualification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The result of an attendance bonus check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceBonusResult {
    /// Whether the employee met the attendance threshold.
    pub qualified: bool,
    /// The bonus amount (zero when not qualified).
    pub amount: Decimal,
}

/// Grants the attendance bonus when the attendance percentage meets the
/// minimum threshold.
///
/// The boundary is inclusive: an attendance percentage exactly equal to
/// the threshold qualifies.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_attendance_bonus;
/// use rust_decimal::Decimal;
///
/// // Exactly at the threshold qualifies
/// let result = calculate_attendance_bonus(
///     Decimal::new(95, 0),
///     Decimal::new(95, 0),
///     Decimal::new(1_000, 0),
/// );
/// assert!(result.qualified);
/// assert_eq!(result.amount, Decimal::new(1_000, 0));
/// ```
pub fn calculate_attendance_bonus(
    attendance_percentage: Decimal,
    minimum_attendance: Decimal,
    bonus_amount: Decimal,
) -> AttendanceBonusResult {
    let qualified = attendance_percentage >= minimum_attendance;
    AttendanceBonusResult {
        qualified,
        amount: if qualified { bonus_amount } else { Decimal::ZERO },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_above_threshold_qualifies() {
        let result = calculate_attendance_bonus(dec("98.5"), dec("95"), dec("1000"));
        assert!(result.qualified);
        assert_eq!(result.amount, dec("1000"));
    }

    #[test]
    fn test_exactly_at_threshold_qualifies() {
        let result = calculate_attendance_bonus(dec("95.0"), dec("95"), dec("1000"));
        assert!(result.qualified);
        assert_eq!(result.amount, dec("1000"));
    }

    #[test]
    fn test_just_below_threshold_does_not_qualify() {
        let result = calculate_attendance_bonus(dec("94.99"), dec("95"), dec("1000"));
        assert!(!result.qualified);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_zero_bonus_amount_still_tracks_qualification() {
        let result = calculate_attendance_bonus(dec("100"), dec("95"), Decimal::ZERO);
        assert!(result.qualified);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_zero_threshold_always_qualifies() {
        let result = calculate_attendance_bonus(Decimal::ZERO, Decimal::ZERO, dec("500"));
        assert!(result.qualified);
        assert_eq!(result.amount, dec("500"));
    }
}
