use super::employee::Employee;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of one employee's payment within a batch.
///
/// `success` means the wallet service accepted the submission. It says nothing
/// about on-chain confirmation.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub employee_id: u32,
    /// Empty when the payment failed.
    pub transaction_hash: String,
    /// The salary as quoted on the roster.
    pub amount: String,
    pub success: bool,
    pub error: Option<String>,
}

impl PaymentResult {
    pub fn submitted(employee: &Employee, transaction_hash: String) -> Self {
        Self {
            employee_id: employee.id,
            transaction_hash,
            amount: employee.salary.to_string(),
            success: true,
            error: None,
        }
    }

    pub fn failed(employee: &Employee, error: impl Into<String>) -> Self {
        Self {
            employee_id: employee.id,
            transaction_hash: String::new(),
            amount: employee.salary.to_string(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Aggregate view over a finished batch.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Sum of the quoted salaries of the processed employees, 6 decimal places.
    pub total_amount: String,
}

impl PayrollSummary {
    pub fn from_results(employees: &[Employee], results: &[PaymentResult]) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let total: Decimal = employees.iter().map(|e| e.salary).sum();
        Self {
            processed: results.len(),
            successful,
            failed: results.len() - successful,
            total_amount: format!("{:.6}", total),
        }
    }
}
