//! Property tests for the payroll calculator.
//!
//! Checks the arithmetic invariants over randomly generated attendance
//! logs: the gross/net identities always hold, the attendance percentage
//! stays in range, and losing a present day never increases pay.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use payroll_engine::calculation::calculate_record;
use payroll_engine::models::{
    AttendanceEntry, AttendanceStatus, Employee, PayPeriod, RuleSet,
};

fn february() -> PayPeriod {
    PayPeriod {
        start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
    }
}

fn employee(basic: i64, overtime_rate: i64) -> Employee {
    Employee {
        id: "EMP-001".to_string(),
        name: "Rahim Uddin".to_string(),
        department: None,
        basic_salary: Decimal::new(basic, 0),
        allowances: vec![],
        overtime_rate: Decimal::new(overtime_rate, 0),
        active: true,
    }
}

#[derive(Debug, Clone)]
struct Day {
    status: AttendanceStatus,
    hours: u32,
    late: bool,
}

fn day_strategy() -> impl Strategy<Value = Day> {
    (
        prop_oneof![
            Just(AttendanceStatus::Present),
            Just(AttendanceStatus::Absent),
            Just(AttendanceStatus::Leave),
        ],
        0u32..=12,
        any::<bool>(),
    )
        .prop_map(|(status, hours, late)| Day {
            status,
            hours: if status == AttendanceStatus::Present {
                hours
            } else {
                0
            },
            late: late && status == AttendanceStatus::Present,
        })
}

fn entries_from(days: &[Day]) -> Vec<AttendanceEntry> {
    let period = february();
    period
        .days()
        .zip(days.iter())
        .map(|(date, day)| AttendanceEntry {
            employee_id: "EMP-001".to_string(),
            date,
            status: day.status,
            hours_worked: Decimal::new(day.hours as i64, 0),
            late: day.late,
        })
        .collect()
}

fn rules_strategy() -> impl Strategy<Value = RuleSet> {
    (0i64..=2_000, 0i64..=100, 0i64..=500, 0i64..=200).prop_map(
        |(bonus, min_attendance, per_day, late_penalty)| RuleSet {
            perfect_attendance_bonus: Decimal::new(bonus, 0),
            minimum_attendance_for_bonus: Decimal::new(min_attendance, 0),
            per_day_absence_deduction_rate: Decimal::new(per_day, 0),
            late_arrival_penalty: Decimal::new(late_penalty, 0),
            ..RuleSet::default()
        },
    )
}

proptest! {
    #[test]
    fn gross_and_net_identities_always_hold(
        days in prop::collection::vec(day_strategy(), 28),
        rules in rules_strategy(),
        basic in 10_000i64..=100_000,
        overtime_rate in 0i64..=300,
    ) {
        let emp = employee(basic, overtime_rate);
        let entries = entries_from(&days);
        let period = february();

        let draft = calculate_record(&emp, &entries, &[], &period, &rules).unwrap();

        prop_assert_eq!(
            draft.gross_salary,
            draft.basic_salary + draft.allowances + draft.overtime_amount + draft.bonuses
        );
        prop_assert_eq!(draft.net_salary, draft.gross_salary - draft.deductions);
        prop_assert_eq!(
            draft.deductions,
            draft.absence_deduction + draft.late_penalty
        );
    }

    #[test]
    fn attendance_percentage_stays_in_range(
        days in prop::collection::vec(day_strategy(), 28),
    ) {
        let emp = employee(30_000, 0);
        let entries = entries_from(&days);
        let period = february();

        let draft = calculate_record(&emp, &entries, &[], &period, &RuleSet::default()).unwrap();

        prop_assert!(draft.attendance_percentage >= Decimal::ZERO);
        prop_assert!(draft.attendance_percentage <= Decimal::ONE_HUNDRED);
        prop_assert_eq!(
            draft.present_days + draft.absent_days + draft.leave_days,
            draft.working_days
        );
    }

    #[test]
    fn losing_a_present_day_never_raises_net(
        days in prop::collection::vec(day_strategy(), 28),
        rules in rules_strategy(),
    ) {
        let emp = employee(30_000, 150);
        let entries = entries_from(&days);
        let period = february();

        // Drop a punctual present day; losing a late one also removes its
        // penalty, which can legitimately raise net.
        let Some(present_index) = entries
            .iter()
            .position(|e| e.status == AttendanceStatus::Present && !e.late)
        else {
            return Ok(());
        };

        let full = calculate_record(&emp, &entries, &[], &period, &rules).unwrap();

        let mut reduced_entries = entries.clone();
        reduced_entries.remove(present_index);
        let reduced = calculate_record(&emp, &reduced_entries, &[], &period, &rules).unwrap();

        prop_assert!(reduced.net_salary <= full.net_salary);
    }
}
