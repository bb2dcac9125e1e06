//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod cycle;
mod employee;
mod record;
mod rules;

pub use attendance::{AttendanceEntry, AttendanceStatus, Holiday, PayPeriod};
pub use cycle::{CycleStatus, CycleTotals, CycleType, PayCycle};
pub use employee::{Allowance, Employee};
pub use record::{
    Adjustment, AdjustmentType, Payment, PaymentState, PaymentStatus, PayrollRecord,
};
pub use rules::RuleSet;
