//! Request types for the payroll endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::TemplateLoader;
use crate::error::EngineResult;
use crate::models::{
    AdjustmentType, AttendanceEntry, CycleStatus, CycleType, Employee, Holiday, PayPeriod, RuleSet,
};

/// The cycle being previewed or generated.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleSpec {
    /// Optional human-readable name; defaults to "Payroll <month> <year>".
    #[serde(default)]
    pub name: Option<String>,
    /// The recurrence type.
    #[serde(default)]
    pub cycle_type: CycleType,
    /// The period start date (inclusive).
    pub start_date: NaiveDate,
    /// The period end date (inclusive).
    pub end_date: NaiveDate,
}

impl CycleSpec {
    /// The pay period this spec covers.
    pub fn period(&self) -> PayPeriod {
        PayPeriod {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// The body of a preview or generate request.
///
/// Rules are resolved in priority order: inline `rules` first, then the
/// named `template`, then the built-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollRunRequest {
    /// The cycle to run payroll for.
    pub cycle: CycleSpec,
    /// The name of a loaded template to take rules from.
    #[serde(default)]
    pub template: Option<String>,
    /// Inline rules, overriding any template.
    #[serde(default)]
    pub rules: Option<RuleSet>,
    /// The workforce to calculate.
    pub employees: Vec<Employee>,
    /// Attendance entries for the whole workforce.
    pub attendance: Vec<AttendanceEntry>,
    /// Holidays inside the period.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

impl PayrollRunRequest {
    /// Resolves the effective rule set for this run.
    pub fn resolve_rules(&self, templates: &TemplateLoader) -> EngineResult<RuleSet> {
        if let Some(rules) = &self.rules {
            return Ok(rules.clone());
        }
        if let Some(name) = &self.template {
            return templates.get(name).cloned();
        }
        Ok(RuleSet::default())
    }
}

/// The body of a mark-paid request.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkPaidRequest {
    /// Explicit amount for a partial payment; omitted pays the remainder.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// The disbursement date; defaults to today.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// The payment method.
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    /// An external reference such as a bank transaction number.
    #[serde(default)]
    pub payment_reference: String,
}

fn default_payment_method() -> String {
    "bank_transfer".to_string()
}

impl Default for MarkPaidRequest {
    fn default() -> Self {
        Self {
            amount: None,
            payment_date: None,
            payment_method: default_payment_method(),
            payment_reference: String::new(),
        }
    }
}

/// The body of an add-adjustment request.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentRequest {
    /// Whether the adjustment adds to or subtracts from pay.
    pub adjustment_type: AdjustmentType,
    /// A short title for the adjustment.
    pub title: String,
    /// The adjustment amount; must be positive.
    pub amount: Decimal,
    /// Optional longer description.
    #[serde(default)]
    pub description: String,
}

/// The body of a cycle approval request.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveCycleRequest {
    /// The status to advance to; defaults to `approved`.
    #[serde(default = "default_approve_status")]
    pub status: CycleStatus,
}

fn default_approve_status() -> CycleStatus {
    CycleStatus::Approved
}

impl Default for ApproveCycleRequest {
    fn default() -> Self {
        Self {
            status: default_approve_status(),
        }
    }
}
