//! Payroll record, adjustment, and payment models.
//!
//! A [`PayrollRecord`] is one employee's computed payroll result within a
//! cycle. Manual [`Adjustment`]s and disbursed [`Payment`]s hang off the
//! record, and the record's derived totals are recomputed whenever either
//! changes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an adjustment adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Adds to the record's bonus total.
    Addition,
    /// Adds to the record's deduction total.
    Deduction,
}

/// A manual addition or deduction applied to a record outside the
/// automatic rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Unique identifier for the adjustment.
    pub id: Uuid,
    /// Whether this adds to or subtracts from pay.
    pub adjustment_type: AdjustmentType,
    /// A short title (e.g., "Eid bonus", "Canteen dues").
    pub title: String,
    /// The adjustment amount; always positive, the type gives the sign.
    pub amount: Decimal,
    /// Optional longer description.
    #[serde(default)]
    pub description: String,
    /// When the adjustment was recorded.
    pub created_at: DateTime<Utc>,
}

/// The settlement state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet disbursed.
    Pending,
    /// Fully disbursed.
    Paid,
}

/// The state of an individual disbursement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// The disbursement went through.
    Completed,
}

/// An actual disbursement made against a payroll record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for the payment.
    pub id: Uuid,
    /// The disbursed amount.
    pub amount: Decimal,
    /// The date the disbursement was made.
    pub payment_date: NaiveDate,
    /// The payment method (e.g., "cash", "bank_transfer").
    pub method: String,
    /// An external reference such as a bank transaction number.
    #[serde(default)]
    pub reference: String,
    /// The state of the disbursement.
    pub status: PaymentState,
    /// When the payment was recorded.
    pub created_at: DateTime<Utc>,
}

/// One employee's computed payroll result within a cycle.
///
/// The derived fields (`bonuses`, `deductions`, `gross_salary`,
/// `net_salary`) are maintained by [`PayrollRecord::recalculate`] so that
/// the invariants gross = basic + allowances + overtime + bonuses and
/// net = gross − deductions always hold, including after adjustments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The cycle this record belongs to.
    pub cycle_id: Uuid,
    /// The employee's caller-assigned identifier.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The employee's department, if any.
    pub department: Option<String>,

    /// Payable working days in the period (total minus holidays).
    pub working_days: u32,
    /// Days the employee was present.
    pub present_days: u32,
    /// Days the employee was absent.
    pub absent_days: u32,
    /// Days the employee was on approved leave.
    pub leave_days: u32,
    /// Holidays in the period.
    pub holiday_days: u32,
    /// Number of late arrivals.
    pub late_arrivals: u32,
    /// Attendance percentage over the payable days (0 when undefined).
    pub attendance_percentage: Decimal,

    /// The monthly basic salary.
    pub basic_salary: Decimal,
    /// The summed allowance components.
    pub allowances: Decimal,
    /// Overtime hours worked beyond the daily standard.
    pub overtime_hours: Decimal,
    /// Overtime pay (hours × rate).
    pub overtime_amount: Decimal,
    /// The automatic attendance bonus, if qualified.
    pub attendance_bonus: Decimal,
    /// The automatic per-day absence deduction.
    pub absence_deduction: Decimal,
    /// The automatic late-arrival penalty total.
    pub late_penalty: Decimal,

    /// Total bonuses: attendance bonus plus addition adjustments.
    pub bonuses: Decimal,
    /// Total deductions: automatic deductions plus deduction adjustments.
    pub deductions: Decimal,
    /// basic + allowances + overtime_amount + bonuses.
    pub gross_salary: Decimal,
    /// gross − deductions.
    pub net_salary: Decimal,

    /// The settlement state of the record.
    pub payment_status: PaymentStatus,
    /// The date the record was settled, once paid.
    pub payment_date: Option<NaiveDate>,
    /// The method the record was settled with, once paid.
    pub payment_method: Option<String>,
    /// An external reference for the settlement, once paid.
    pub payment_reference: Option<String>,

    /// Manual adjustments applied to this record.
    pub adjustments: Vec<Adjustment>,
    /// Disbursements recorded against this record.
    pub payments: Vec<Payment>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// Sum of addition-type adjustments.
    pub fn adjustment_additions(&self) -> Decimal {
        self.adjustments
            .iter()
            .filter(|a| a.adjustment_type == AdjustmentType::Addition)
            .map(|a| a.amount)
            .sum()
    }

    /// Sum of deduction-type adjustments.
    pub fn adjustment_deductions(&self) -> Decimal {
        self.adjustments
            .iter()
            .filter(|a| a.adjustment_type == AdjustmentType::Deduction)
            .map(|a| a.amount)
            .sum()
    }

    /// Sum of completed payments against this record.
    pub fn paid_total(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|p| p.status == PaymentState::Completed)
            .map(|p| p.amount)
            .sum()
    }

    /// Recomputes the derived totals from the stored components.
    ///
    /// Must be called after adding or removing an adjustment.
    pub fn recalculate(&mut self) {
        self.bonuses = self.attendance_bonus + self.adjustment_additions();
        self.deductions =
            self.absence_deduction + self.late_penalty + self.adjustment_deductions();
        self.gross_salary =
            self.basic_salary + self.allowances + self.overtime_amount + self.bonuses;
        self.net_salary = self.gross_salary - self.deductions;
    }

    /// Returns true once the record has been settled.
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    fn base_record() -> PayrollRecord {
        let mut record = PayrollRecord {
            id: Uuid::new_v4(),
            cycle_id: Uuid::new_v4(),
            employee_id: "EMP-001".to_string(),
            employee_name: "Rahim Uddin".to_string(),
            department: None,
            working_days: 26,
            present_days: 24,
            absent_days: 2,
            leave_days: 0,
            holiday_days: 5,
            late_arrivals: 0,
            attendance_percentage: Decimal::new(9231, 2),
            basic_salary: dec(30_000),
            allowances: dec(5_000),
            overtime_hours: Decimal::ZERO,
            overtime_amount: Decimal::ZERO,
            attendance_bonus: Decimal::ZERO,
            absence_deduction: dec(200),
            late_penalty: Decimal::ZERO,
            bonuses: Decimal::ZERO,
            deductions: Decimal::ZERO,
            gross_salary: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            payment_status: PaymentStatus::Pending,
            payment_date: None,
            payment_method: None,
            payment_reference: None,
            adjustments: vec![],
            payments: vec![],
            created_at: Utc::now(),
        };
        record.recalculate();
        record
    }

    fn adjustment(kind: AdjustmentType, amount: i64) -> Adjustment {
        Adjustment {
            id: Uuid::new_v4(),
            adjustment_type: kind,
            title: "test".to_string(),
            amount: dec(amount),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_recalculate_maintains_gross_and_net_invariants() {
        let record = base_record();
        assert_eq!(record.gross_salary, dec(35_000));
        assert_eq!(record.net_salary, dec(34_800));
    }

    #[test]
    fn test_addition_adjustment_raises_bonus_total() {
        let mut record = base_record();
        record.adjustments.push(adjustment(AdjustmentType::Addition, 1_500));
        record.recalculate();

        assert_eq!(record.bonuses, dec(1_500));
        assert_eq!(record.gross_salary, dec(36_500));
        assert_eq!(record.net_salary, dec(36_300));
    }

    #[test]
    fn test_deduction_adjustment_raises_deduction_total() {
        let mut record = base_record();
        record.adjustments.push(adjustment(AdjustmentType::Deduction, 700));
        record.recalculate();

        assert_eq!(record.deductions, dec(900));
        assert_eq!(record.net_salary, dec(34_100));
    }

    #[test]
    fn test_totals_reflect_sum_of_matching_adjustments() {
        let mut record = base_record();
        record.adjustments.push(adjustment(AdjustmentType::Addition, 500));
        record.adjustments.push(adjustment(AdjustmentType::Addition, 300));
        record.adjustments.push(adjustment(AdjustmentType::Deduction, 100));
        record.recalculate();

        assert_eq!(record.bonuses, record.attendance_bonus + dec(800));
        assert_eq!(
            record.deductions,
            record.absence_deduction + record.late_penalty + dec(100)
        );
    }

    #[test]
    fn test_paid_total_sums_completed_payments() {
        let mut record = base_record();
        record.payments.push(Payment {
            id: Uuid::new_v4(),
            amount: dec(10_000),
            payment_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            method: "bank_transfer".to_string(),
            reference: "TRX-1".to_string(),
            status: PaymentState::Completed,
            created_at: Utc::now(),
        });
        record.payments.push(Payment {
            id: Uuid::new_v4(),
            amount: dec(24_800),
            payment_date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            method: "cash".to_string(),
            reference: String::new(),
            status: PaymentState::Completed,
            created_at: Utc::now(),
        });

        assert_eq!(record.paid_total(), dec(34_800));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = base_record();
        let json = serde_json::to_string(&record).unwrap();
        let back: PayrollRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_adjustment_type_serialization() {
        assert_eq!(
            serde_json::to_string(&AdjustmentType::Addition).unwrap(),
            "\"addition\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentState::Completed).unwrap(),
            "\"completed\""
        );
    }
}
