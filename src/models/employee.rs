//! Employee model and related types.
//!
//! Employees are supplied by the caller with each payroll run rather than
//! persisted by the engine; the record store keeps only the computed results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named allowance component of an employee's salary.
///
/// Typical components are house rent, medical, conveyance, and food
/// allowances. The calculator only ever uses the summed total, but the
/// components are kept for slips and exports.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Allowance;
/// use rust_decimal::Decimal;
///
/// let house_rent = Allowance {
///     name: "house_rent".to_string(),
///     amount: Decimal::new(12_000, 0),
/// };
/// assert_eq!(house_rent.amount, Decimal::new(12_000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// The component name (e.g., "house_rent", "medical").
    pub name: String,
    /// The monthly amount for this component.
    pub amount: Decimal,
}

/// An employee subject to payroll calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Caller-assigned identifier (e.g., an employee code like "EMP-001").
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// The department the employee belongs to, if any.
    #[serde(default)]
    pub department: Option<String>,
    /// The monthly basic salary.
    pub basic_salary: Decimal,
    /// Named allowance components added on top of the basic salary.
    #[serde(default)]
    pub allowances: Vec<Allowance>,
    /// The hourly rate applied to overtime hours.
    #[serde(default)]
    pub overtime_rate: Decimal,
    /// Inactive employees are skipped during preview and generation.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns the sum of all allowance components.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Allowance, Employee};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "EMP-001".to_string(),
    ///     name: "Rahim Uddin".to_string(),
    ///     department: None,
    ///     basic_salary: Decimal::new(30_000, 0),
    ///     allowances: vec![
    ///         Allowance { name: "house_rent".to_string(), amount: Decimal::new(9_000, 0) },
    ///         Allowance { name: "medical".to_string(), amount: Decimal::new(1_500, 0) },
    ///     ],
    ///     overtime_rate: Decimal::ZERO,
    ///     active: true,
    /// };
    /// assert_eq!(employee.total_allowances(), Decimal::new(10_500, 0));
    /// ```
    pub fn total_allowances(&self) -> Decimal {
        self.allowances.iter().map(|a| a.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_deserialize_employee_with_defaults() {
        let json = r#"{
            "id": "EMP-001",
            "name": "Rahim Uddin",
            "basic_salary": "30000"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "EMP-001");
        assert_eq!(employee.basic_salary, dec(30_000));
        assert!(employee.allowances.is_empty());
        assert_eq!(employee.overtime_rate, Decimal::ZERO);
        assert!(employee.active);
        assert!(employee.department.is_none());
    }

    #[test]
    fn test_deserialize_employee_with_allowances() {
        let json = r#"{
            "id": "EMP-002",
            "name": "Karim Mia",
            "department": "Production",
            "basic_salary": "25000",
            "allowances": [
                {"name": "house_rent", "amount": "7500"},
                {"name": "food", "amount": "2000"}
            ],
            "overtime_rate": "120",
            "active": false
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.allowances.len(), 2);
        assert_eq!(employee.total_allowances(), dec(9_500));
        assert_eq!(employee.overtime_rate, dec(120));
        assert!(!employee.active);
    }

    #[test]
    fn test_total_allowances_empty_is_zero() {
        let employee = Employee {
            id: "EMP-003".to_string(),
            name: "Fatema Begum".to_string(),
            department: None,
            basic_salary: dec(20_000),
            allowances: vec![],
            overtime_rate: Decimal::ZERO,
            active: true,
        };
        assert_eq!(employee.total_allowances(), Decimal::ZERO);
    }

    #[test]
    fn test_employee_serde_round_trip() {
        let employee = Employee {
            id: "EMP-004".to_string(),
            name: "Jamal Hossain".to_string(),
            department: Some("Accounts".to_string()),
            basic_salary: dec(42_000),
            allowances: vec![Allowance {
                name: "conveyance".to_string(),
                amount: dec(1_200),
            }],
            overtime_rate: dec(150),
            active: true,
        };

        let json = serde_json::to_string(&employee).unwrap();
        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, back);
    }
}
