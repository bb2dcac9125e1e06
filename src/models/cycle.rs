//! Pay cycle model and lifecycle.
//!
//! A [`PayCycle`] is a bounded pay period for which payroll records are
//! generated. Its status only ever moves forward through the lifecycle
//! draft → generated → approved → paid → closed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// How often a cycle recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
    /// One calendar month per cycle.
    #[default]
    Monthly,
    /// One week per cycle.
    Weekly,
    /// Two weeks per cycle.
    Biweekly,
}

/// The lifecycle state of a pay cycle.
///
/// Transitions are monotonic in declaration order; a cycle can never move
/// backwards.
///
/// # Example
///
/// ```
/// use payroll_engine::models::CycleStatus;
///
/// assert!(CycleStatus::Draft.can_advance_to(CycleStatus::Generated));
/// assert!(!CycleStatus::Paid.can_advance_to(CycleStatus::Draft));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Created but no records generated yet.
    Draft,
    /// Records have been generated from attendance data.
    Generated,
    /// An operator has reviewed and approved the records.
    Approved,
    /// All records have been disbursed.
    Paid,
    /// The cycle is finalized and immutable.
    Closed,
}

impl CycleStatus {
    /// Returns true when moving to `next` goes forward in the lifecycle.
    pub fn can_advance_to(self, next: CycleStatus) -> bool {
        next > self
    }
}

impl std::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CycleStatus::Draft => "draft",
            CycleStatus::Generated => "generated",
            CycleStatus::Approved => "approved",
            CycleStatus::Paid => "paid",
            CycleStatus::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Aggregate totals over a cycle's payroll records.
///
/// These must always equal the sums of the corresponding fields across the
/// cycle's records; the store recomputes them after every mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleTotals {
    /// Sum of gross salaries.
    pub gross: Decimal,
    /// Sum of net salaries.
    pub net: Decimal,
    /// Sum of deduction totals.
    pub deductions: Decimal,
}

/// A bounded pay period and the aggregate state of its payroll records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayCycle {
    /// Unique identifier for the cycle.
    pub id: Uuid,
    /// Human-readable name (e.g., "Payroll March 2026").
    pub name: String,
    /// The recurrence type of the cycle.
    pub cycle_type: CycleType,
    /// The date range the cycle covers.
    pub period: PayPeriod,
    /// The lifecycle state of the cycle.
    pub status: CycleStatus,
    /// Aggregate totals across the cycle's records.
    pub totals: CycleTotals,
    /// When records were last generated for this cycle.
    pub generated_at: Option<DateTime<Utc>>,
    /// When the cycle was created.
    pub created_at: DateTime<Utc>,
}
