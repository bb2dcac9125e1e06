//! In-memory persistence for pay cycles and payroll records.
//!
//! The [`PayrollStore`] owns every generated cycle and record and is the
//! only place payroll state is mutated. Handlers share a single store via
//! `Arc` and all methods take `&self`; interior locks keep each operation
//! atomic. Cycle totals are recomputed inside the same lock as the record
//! mutation, so readers never observe totals out of sync with the records.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{PreviewOutcome, PreviewWarning, RecordDraft, run_preview};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Adjustment, AdjustmentType, AttendanceEntry, CycleStatus, CycleTotals, CycleType, Employee,
    Holiday, PayCycle, PayPeriod, Payment, PaymentState, PaymentStatus, PayrollRecord, RuleSet,
};

/// Aggregate statistics over the whole store, for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of pay cycles.
    pub total_cycles: u64,
    /// Number of payroll records across all cycles.
    pub total_records: u64,
    /// Records not yet fully disbursed.
    pub pending_records: u64,
    /// Records fully disbursed.
    pub paid_records: u64,
    /// Sum of net salaries across all records.
    pub total_net: Decimal,
    /// Sum of completed payments across all records.
    pub total_disbursed: Decimal,
}

/// The outcome of a payroll generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// The cycle the records were written to.
    pub cycle: PayCycle,
    /// The persisted records, sorted by employee ID.
    pub records: Vec<PayrollRecord>,
    /// Employees skipped during the run, with reasons.
    pub warnings: Vec<PreviewWarning>,
}

/// Thread-safe in-memory store for cycles and records.
pub struct PayrollStore {
    cycles: RwLock<HashMap<Uuid, PayCycle>>,
    records: RwLock<HashMap<Uuid, PayrollRecord>>,
    // Periods with a generation currently running; guards against
    // concurrent duplicate runs for the same period.
    in_flight: Mutex<HashSet<(NaiveDate, NaiveDate)>>,
}

impl Default for PayrollStore {
    fn default() -> Self {
        Self::new()
    }
}

// Releases the in-flight reservation for a period when the generation
// finishes, whether it succeeded or bailed early.
struct GenerationGuard<'a> {
    store: &'a PayrollStore,
    key: (NaiveDate, NaiveDate),
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.store.lock_in_flight().remove(&self.key);
    }
}

impl PayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            cycles: RwLock::new(HashMap::new()),
            records: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn read_cycles(&self) -> RwLockReadGuard<'_, HashMap<Uuid, PayCycle>> {
        self.cycles.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_cycles(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, PayCycle>> {
        self.cycles.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_records(&self) -> RwLockReadGuard<'_, HashMap<Uuid, PayrollRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_records(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, PayrollRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashSet<(NaiveDate, NaiveDate)>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Generates payroll records for a period and persists them.
    ///
    /// Re-running for a period whose cycle is still `draft` or `generated`
    /// replaces that cycle's records in place. A cycle that has advanced to
    /// `approved` or beyond is locked and returns [`EngineError::CycleLocked`].
    /// A second generation arriving while one is already running for the
    /// same period is rejected with [`EngineError::GenerationInProgress`]
    /// instead of racing it.
    #[allow(clippy::too_many_arguments)]
    pub fn generate(
        &self,
        name: Option<String>,
        cycle_type: CycleType,
        period: PayPeriod,
        employees: &[Employee],
        attendance: &[AttendanceEntry],
        holidays: &[Holiday],
        rules: &RuleSet,
    ) -> EngineResult<GenerationResult> {
        validate_period(&period)?;

        let key = (period.start_date, period.end_date);
        {
            let mut in_flight = self.lock_in_flight();
            if !in_flight.insert(key) {
                return Err(EngineError::GenerationInProgress {
                    start: period.start_date,
                    end: period.end_date,
                });
            }
        }
        let _guard = GenerationGuard { store: self, key };

        let outcome = run_preview(employees, attendance, holidays, &period, rules);

        let mut cycles = self.write_cycles();
        let mut records = self.write_records();

        let existing_id = cycles
            .values()
            .find(|c| c.period == period)
            .map(|c| (c.id, c.status));

        let cycle_id = match existing_id {
            Some((id, status)) => {
                if status > CycleStatus::Generated {
                    return Err(EngineError::CycleLocked { id, status });
                }
                records.retain(|_, r| r.cycle_id != id);
                id
            }
            None => {
                let id = Uuid::new_v4();
                cycles.insert(
                    id,
                    PayCycle {
                        id,
                        name: String::new(),
                        cycle_type,
                        period,
                        status: CycleStatus::Draft,
                        totals: CycleTotals::default(),
                        generated_at: None,
                        created_at: Utc::now(),
                    },
                );
                id
            }
        };

        let mut persisted = Vec::with_capacity(outcome.records.len());
        for draft in &outcome.records {
            let record = materialize(cycle_id, draft);
            persisted.push(record.clone());
            records.insert(record.id, record);
        }
        persisted.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));

        let cycle = {
            // cycle_id was just inserted or found under this same lock
            let cycle = cycles
                .get_mut(&cycle_id)
                .ok_or(EngineError::CycleNotFound { id: cycle_id })?;
            cycle.name = name.unwrap_or_else(|| default_cycle_name(&period));
            cycle.cycle_type = cycle_type;
            cycle.status = CycleStatus::Generated;
            cycle.generated_at = Some(Utc::now());
            cycle.totals = totals_over(persisted.iter());
            cycle.clone()
        };

        Ok(GenerationResult {
            cycle,
            records: persisted,
            warnings: outcome.warnings,
        })
    }

    /// Previews payroll for a period without persisting anything.
    pub fn preview(
        &self,
        period: PayPeriod,
        employees: &[Employee],
        attendance: &[AttendanceEntry],
        holidays: &[Holiday],
        rules: &RuleSet,
    ) -> EngineResult<PreviewOutcome> {
        validate_period(&period)?;
        Ok(run_preview(employees, attendance, holidays, &period, rules))
    }

    /// Lists all cycles, newest period first.
    pub fn list_cycles(&self) -> Vec<PayCycle> {
        let mut cycles: Vec<PayCycle> = self.read_cycles().values().cloned().collect();
        cycles.sort_by(|a, b| b.period.start_date.cmp(&a.period.start_date));
        cycles
    }

    /// Fetches a cycle by ID.
    pub fn get_cycle(&self, id: Uuid) -> EngineResult<PayCycle> {
        self.read_cycles()
            .get(&id)
            .cloned()
            .ok_or(EngineError::CycleNotFound { id })
    }

    /// Fetches a cycle's records, sorted by employee ID.
    pub fn records_for_cycle(&self, cycle_id: Uuid) -> EngineResult<Vec<PayrollRecord>> {
        if !self.read_cycles().contains_key(&cycle_id) {
            return Err(EngineError::CycleNotFound { id: cycle_id });
        }
        let mut records: Vec<PayrollRecord> = self
            .read_records()
            .values()
            .filter(|r| r.cycle_id == cycle_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(records)
    }

    /// Fetches a single record by ID.
    pub fn get_record(&self, id: Uuid) -> EngineResult<PayrollRecord> {
        self.read_records()
            .get(&id)
            .cloned()
            .ok_or(EngineError::RecordNotFound { id })
    }

    /// Marks a record paid, recording the disbursement.
    ///
    /// Without an explicit amount the full remaining net salary is
    /// disbursed and the record flips to `paid`. With an amount, a partial
    /// payment is recorded; the record flips to `paid` only once the
    /// completed payments cover the net salary. A payment that would push
    /// the paid total past the net salary is rejected, and marking an
    /// already-paid record again is a no-op rather than a duplicate
    /// disbursement.
    pub fn mark_paid(
        &self,
        record_id: Uuid,
        amount: Option<Decimal>,
        payment_date: Option<NaiveDate>,
        method: String,
        reference: String,
    ) -> EngineResult<PayrollRecord> {
        let mut records = self.write_records();
        let record = records
            .get_mut(&record_id)
            .ok_or(EngineError::RecordNotFound { id: record_id })?;

        if record.is_paid() {
            return Ok(record.clone());
        }

        let remaining = record.net_salary - record.paid_total();
        let pay_amount = amount.unwrap_or(remaining);
        if pay_amount > remaining {
            return Err(EngineError::PaymentExceedsNet {
                record_id,
                amount: pay_amount,
            });
        }
        if pay_amount <= Decimal::ZERO {
            return Err(EngineError::ValidationError {
                field: "amount".to_string(),
                message: "payment amount must be positive".to_string(),
            });
        }

        let date = payment_date.unwrap_or_else(|| Utc::now().date_naive());
        record.payments.push(Payment {
            id: Uuid::new_v4(),
            amount: pay_amount,
            payment_date: date,
            method: method.clone(),
            reference,
            status: PaymentState::Completed,
            created_at: Utc::now(),
        });

        if record.paid_total() >= record.net_salary {
            record.payment_status = PaymentStatus::Paid;
            record.payment_date = Some(date);
            record.payment_method = Some(method);
            record.payment_reference = record.payments.last().map(|p| p.reference.clone());
        }

        Ok(record.clone())
    }

    /// Adds a manual adjustment to a record and recomputes its totals.
    pub fn add_adjustment(
        &self,
        record_id: Uuid,
        adjustment_type: AdjustmentType,
        title: String,
        amount: Decimal,
        description: String,
    ) -> EngineResult<PayrollRecord> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAdjustment {
                message: "adjustment amount must be positive".to_string(),
            });
        }
        if title.trim().is_empty() {
            return Err(EngineError::InvalidAdjustment {
                message: "adjustment title must not be empty".to_string(),
            });
        }

        let mut records = self.write_records();
        let record = records
            .get_mut(&record_id)
            .ok_or(EngineError::RecordNotFound { id: record_id })?;

        if record.is_paid() {
            return Err(EngineError::InvalidAdjustment {
                message: "record has already been paid".to_string(),
            });
        }

        record.adjustments.push(Adjustment {
            id: Uuid::new_v4(),
            adjustment_type,
            title,
            amount,
            description,
            created_at: Utc::now(),
        });
        record.recalculate();
        let updated = record.clone();
        drop(records);

        self.refresh_cycle_totals(updated.cycle_id);
        Ok(updated)
    }

    /// Removes an adjustment from a record, reversing its effect.
    pub fn remove_adjustment(
        &self,
        record_id: Uuid,
        adjustment_id: Uuid,
    ) -> EngineResult<PayrollRecord> {
        let mut records = self.write_records();
        let record = records
            .get_mut(&record_id)
            .ok_or(EngineError::RecordNotFound { id: record_id })?;

        if record.is_paid() {
            return Err(EngineError::InvalidAdjustment {
                message: "record has already been paid".to_string(),
            });
        }

        let before = record.adjustments.len();
        record.adjustments.retain(|a| a.id != adjustment_id);
        if record.adjustments.len() == before {
            return Err(EngineError::AdjustmentNotFound { id: adjustment_id });
        }
        record.recalculate();
        let updated = record.clone();
        drop(records);

        self.refresh_cycle_totals(updated.cycle_id);
        Ok(updated)
    }

    /// Advances a cycle's lifecycle status.
    ///
    /// Transitions only ever move forward. Moving to `paid` or `closed`
    /// additionally requires every record in the cycle to be settled.
    pub fn advance_cycle(&self, cycle_id: Uuid, to: CycleStatus) -> EngineResult<PayCycle> {
        let records = self.read_records();
        let all_paid = records
            .values()
            .filter(|r| r.cycle_id == cycle_id)
            .all(|r| r.is_paid());
        drop(records);

        let mut cycles = self.write_cycles();
        let cycle = cycles
            .get_mut(&cycle_id)
            .ok_or(EngineError::CycleNotFound { id: cycle_id })?;

        if !cycle.status.can_advance_to(to) {
            return Err(EngineError::InvalidStatusTransition {
                from: cycle.status,
                to,
            });
        }
        if to >= CycleStatus::Paid && !all_paid {
            return Err(EngineError::ValidationError {
                field: "status".to_string(),
                message: format!("cycle has unpaid records and cannot be marked '{to}'"),
            });
        }

        cycle.status = to;
        Ok(cycle.clone())
    }

    /// Aggregate statistics for the dashboard.
    pub fn stats(&self) -> StoreStats {
        let cycles = self.read_cycles();
        let records = self.read_records();

        let mut pending = 0u64;
        let mut paid = 0u64;
        let mut total_net = Decimal::ZERO;
        let mut total_disbursed = Decimal::ZERO;
        for record in records.values() {
            match record.payment_status {
                PaymentStatus::Pending => pending += 1,
                PaymentStatus::Paid => paid += 1,
            }
            total_net += record.net_salary;
            total_disbursed += record.paid_total();
        }

        StoreStats {
            total_cycles: cycles.len() as u64,
            total_records: records.len() as u64,
            pending_records: pending,
            paid_records: paid,
            total_net,
            total_disbursed,
        }
    }

    fn refresh_cycle_totals(&self, cycle_id: Uuid) {
        let records = self.read_records();
        let totals = totals_over(records.values().filter(|r| r.cycle_id == cycle_id));
        drop(records);

        if let Some(cycle) = self.write_cycles().get_mut(&cycle_id) {
            cycle.totals = totals;
        }
    }
}

fn validate_period(period: &PayPeriod) -> EngineResult<()> {
    if period.end_date < period.start_date {
        return Err(EngineError::InvalidPeriod {
            message: format!(
                "end date {} is before start date {}",
                period.end_date, period.start_date
            ),
        });
    }
    Ok(())
}

fn default_cycle_name(period: &PayPeriod) -> String {
    format!("Payroll {}", period.start_date.format("%B %Y"))
}

fn totals_over<'a>(records: impl Iterator<Item = &'a PayrollRecord>) -> CycleTotals {
    let mut totals = CycleTotals::default();
    for record in records {
        totals.gross += record.gross_salary;
        totals.net += record.net_salary;
        totals.deductions += record.deductions;
    }
    totals
}

fn materialize(cycle_id: Uuid, draft: &RecordDraft) -> PayrollRecord {
    PayrollRecord {
        id: Uuid::new_v4(),
        cycle_id,
        employee_id: draft.employee_id.clone(),
        employee_name: draft.employee_name.clone(),
        department: draft.department.clone(),
        working_days: draft.working_days,
        present_days: draft.present_days,
        absent_days: draft.absent_days,
        leave_days: draft.leave_days,
        holiday_days: draft.holiday_days,
        late_arrivals: draft.late_arrivals,
        attendance_percentage: draft.attendance_percentage,
        basic_salary: draft.basic_salary,
        allowances: draft.allowances,
        overtime_hours: draft.overtime_hours,
        overtime_amount: draft.overtime_amount,
        attendance_bonus: draft.attendance_bonus,
        absence_deduction: draft.absence_deduction,
        late_penalty: draft.late_penalty,
        bonuses: draft.bonuses,
        deductions: draft.deductions,
        gross_salary: draft.gross_salary,
        net_salary: draft.net_salary,
        payment_status: PaymentStatus::Pending,
        payment_date: None,
        payment_method: None,
        payment_reference: None,
        adjustments: Vec::new(),
        payments: Vec::new(),
        created_at: Utc::now(),
    }
}
