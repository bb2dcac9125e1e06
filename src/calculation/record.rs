//! Record assembly: the full per-employee calculation pipeline.
//!
//! [`calculate_record`] wires the attendance summary, overtime, deduction,
//! and bonus calculations together into a [`RecordDraft`], and
//! [`run_preview`] maps that over a whole workforce, collecting per-employee
//! warnings instead of failing the run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceEntry, Employee, Holiday, PayPeriod, RuleSet};

use super::{
    calculate_absence_deduction, calculate_attendance_bonus, calculate_overtime,
    summarize_attendance,
};

/// A fully calculated payroll result for one employee, before persistence.
///
/// Drafts are what the preview endpoint returns and what the generate
/// endpoint persists as records. They carry no identity or payment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    /// The employee's caller-assigned identifier.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The employee's department, if any.
    pub department: Option<String>,

    /// Payable working days in the period.
    pub working_days: u32,
    /// Days recorded present.
    pub present_days: u32,
    /// Days recorded absent.
    pub absent_days: u32,
    /// Days recorded on approved leave.
    pub leave_days: u32,
    /// Holidays in the period.
    pub holiday_days: u32,
    /// Late arrivals on present days.
    pub late_arrivals: u32,
    /// present / working × 100, rounded to two decimal places.
    pub attendance_percentage: Decimal,

    /// The monthly basic salary.
    pub basic_salary: Decimal,
    /// The summed allowance components.
    pub allowances: Decimal,
    /// Overtime hours beyond the daily standard.
    pub overtime_hours: Decimal,
    /// Overtime pay.
    pub overtime_amount: Decimal,
    /// The attendance bonus, when qualified.
    pub attendance_bonus: Decimal,
    /// absent_days × the per-day deduction rate.
    pub absence_deduction: Decimal,
    /// late_arrivals × the per-occurrence penalty.
    pub late_penalty: Decimal,

    /// Total bonuses (the attendance bonus; adjustments come later).
    pub bonuses: Decimal,
    /// Total deductions.
    pub deductions: Decimal,
    /// basic + allowances + overtime_amount + bonuses.
    pub gross_salary: Decimal,
    /// gross − deductions.
    pub net_salary: Decimal,
}

/// A non-fatal problem encountered while previewing or generating payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewWarning {
    /// The employee the warning concerns.
    pub employee_id: String,
    /// A human-readable description of the problem.
    pub message: String,
}

/// The result of a payroll preview over a workforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewOutcome {
    /// One draft per successfully calculated active employee.
    pub records: Vec<RecordDraft>,
    /// Employees skipped, with the reason.
    pub warnings: Vec<PreviewWarning>,
}

impl PreviewOutcome {
    /// Sum of gross salaries across the drafts.
    pub fn total_gross(&self) -> Decimal {
        self.records.iter().map(|r| r.gross_salary).sum()
    }

    /// Sum of net salaries across the drafts.
    pub fn total_net(&self) -> Decimal {
        self.records.iter().map(|r| r.net_salary).sum()
    }

    /// Sum of deductions across the drafts.
    pub fn total_deductions(&self) -> Decimal {
        self.records.iter().map(|r| r.deductions).sum()
    }
}

/// Calculates a payroll record draft for a single employee.
///
/// The pipeline runs in a fixed order: attendance summary, then overtime,
/// then deductions, then the attendance bonus, then the gross and net
/// totals. Each automatic component is gated by the corresponding
/// `auto_calculate_*` flag in the rule set; a disabled component
/// contributes zero.
///
/// `entries` must already be filtered to this employee. An employee with
/// no attendance entries inside the period cannot be calculated and
/// yields [`EngineError::MissingAttendance`].
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_record;
/// use payroll_engine::models::{
///     AttendanceEntry, AttendanceStatus, Employee, PayPeriod, RuleSet,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "EMP-001".to_string(),
///     name: "Rahim Uddin".to_string(),
///     department: None,
///     basic_salary: Decimal::new(30_000, 0),
///     allowances: vec![],
///     overtime_rate: Decimal::ZERO,
///     active: true,
/// };
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
/// };
/// let entries: Vec<_> = period
///     .days()
///     .map(|date| AttendanceEntry {
///         employee_id: "EMP-001".to_string(),
///         date,
///         status: AttendanceStatus::Present,
///         hours_worked: Decimal::new(8, 0),
///         late: false,
///     })
///     .collect();
///
/// let draft = calculate_record(&employee, &entries, &[], &period, &RuleSet::default()).unwrap();
/// assert_eq!(draft.gross_salary, Decimal::new(30_000, 0));
/// assert_eq!(draft.net_salary, Decimal::new(30_000, 0));
/// ```
pub fn calculate_record(
    employee: &Employee,
    entries: &[AttendanceEntry],
    holidays: &[Holiday],
    period: &PayPeriod,
    rules: &RuleSet,
) -> EngineResult<RecordDraft> {
    if !entries.iter().any(|e| period.contains(e.date)) {
        return Err(EngineError::MissingAttendance {
            employee_id: employee.id.clone(),
        });
    }

    let summary = summarize_attendance(entries, holidays, period);

    let overtime = if rules.auto_calculate_overtime {
        calculate_overtime(
            entries,
            period,
            rules.standard_daily_hours,
            employee.overtime_rate,
        )
    } else {
        super::OvertimeResult {
            overtime_hours: Decimal::ZERO,
            overtime_amount: Decimal::ZERO,
        }
    };

    let deduction = if rules.auto_calculate_deductions {
        calculate_absence_deduction(
            summary.absent_days,
            summary.late_arrivals,
            rules.per_day_absence_deduction_rate,
            rules.late_arrival_penalty,
        )
    } else {
        super::AbsenceDeductionResult {
            absence_deduction: Decimal::ZERO,
            late_penalty: Decimal::ZERO,
        }
    };

    let bonus = if rules.auto_calculate_bonuses {
        calculate_attendance_bonus(
            summary.attendance_percentage,
            rules.minimum_attendance_for_bonus,
            rules.perfect_attendance_bonus,
        )
        .amount
    } else {
        Decimal::ZERO
    };

    let allowances = employee.total_allowances();
    let bonuses = bonus;
    let deductions = deduction.total();
    let gross_salary = employee.basic_salary + allowances + overtime.overtime_amount + bonuses;
    let net_salary = gross_salary - deductions;

    Ok(RecordDraft {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        department: employee.department.clone(),
        working_days: summary.working_days,
        present_days: summary.present_days,
        absent_days: summary.absent_days,
        leave_days: summary.leave_days,
        holiday_days: summary.holiday_days,
        late_arrivals: summary.late_arrivals,
        attendance_percentage: summary.attendance_percentage,
        basic_salary: employee.basic_salary,
        allowances,
        overtime_hours: overtime.overtime_hours,
        overtime_amount: overtime.overtime_amount,
        attendance_bonus: bonus,
        absence_deduction: deduction.absence_deduction,
        late_penalty: deduction.late_penalty,
        bonuses,
        deductions,
        gross_salary,
        net_salary,
    })
}

/// Runs the calculation over a whole workforce.
///
/// Inactive employees are skipped silently. An employee whose attendance
/// log is empty for the period is skipped with a warning rather than
/// failing the entire run, so one missing timesheet never blocks payroll
/// for everyone else.
pub fn run_preview(
    employees: &[Employee],
    attendance: &[AttendanceEntry],
    holidays: &[Holiday],
    period: &PayPeriod,
    rules: &RuleSet,
) -> PreviewOutcome {
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for employee in employees.iter().filter(|e| e.active) {
        let entries: Vec<AttendanceEntry> = attendance
            .iter()
            .filter(|e| e.employee_id == employee.id)
            .cloned()
            .collect();

        match calculate_record(employee, &entries, holidays, period, rules) {
            Ok(draft) => records.push(draft),
            Err(err) => warnings.push(PreviewWarning {
                employee_id: employee.id.clone(),
                message: err.to_string(),
            }),
        }
    }

    PreviewOutcome { records, warnings }
}
