use super::resolver::AccountResolver;
use crate::config::TokenConfig;
use crate::domain::account::Account;
use crate::domain::address::Address;
use crate::domain::employee::Employee;
use crate::domain::payment::PaymentResult;
use crate::domain::ports::WalletServiceRef;
use crate::domain::transaction::{Network, TransactionRequest, TransferInstruction};
use crate::error::{PayrollError, Result};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Wait between two submissions unless configured otherwise.
pub const DEFAULT_PACING: Duration = Duration::from_secs(2);

/// Pays a roster one employee at a time through the wallet service.
///
/// `Disburser` owns the payroll account resolution. Submissions are strictly
/// sequential with a pacing delay between them, and at most one batch runs at
/// a time; an overlapping [`Disburser::pay_all`] is rejected rather than
/// queued.
pub struct Disburser {
    wallet: WalletServiceRef,
    resolver: AccountResolver,
    token: TokenConfig,
    network: Network,
    pacing: Duration,
    batch: Mutex<()>,
}

impl Disburser {
    /// Creates a new `Disburser`.
    ///
    /// # Arguments
    ///
    /// * `wallet` - The wallet service that signs and submits transfers.
    /// * `resolver` - Resolver for the account that pays.
    /// * `token` - The token being paid out.
    /// * `network` - The single network every transfer targets.
    pub fn new(
        wallet: WalletServiceRef,
        resolver: AccountResolver,
        token: TokenConfig,
        network: Network,
    ) -> Self {
        Self {
            wallet,
            resolver,
            token,
            network,
            pacing: DEFAULT_PACING,
            batch: Mutex::new(()),
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub async fn account(&self) -> Result<&Account> {
        self.resolver.resolve().await
    }

    /// Address of the payroll account, if it has been resolved already.
    pub fn account_address(&self) -> Option<Address> {
        self.resolver.cached().map(|account| account.address)
    }

    /// Pays every employee in `employees`, in order.
    ///
    /// Returns one [`PaymentResult`] per employee in input order. A failed
    /// payment is recorded and the batch moves on. Only batch-level failures
    /// (account resolution, an overlapping batch) return `Err`, and in that
    /// case nothing was submitted.
    pub async fn pay_all(&self, employees: &[Employee]) -> Result<Vec<PaymentResult>> {
        let _batch = self
            .batch
            .try_lock()
            .map_err(|_| PayrollError::BatchInProgress)?;
        let account = self.resolver.resolve().await?;

        info!(
            employees = employees.len(),
            account = %account.address,
            "Starting payroll"
        );

        let mut results = Vec::with_capacity(employees.len());
        for (index, employee) in employees.iter().enumerate() {
            info!(
                "Processing payment {}/{} for {}",
                index + 1,
                employees.len(),
                employee.name
            );
            results.push(self.pay_employee(account, employee).await);

            if index + 1 < employees.len() && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        let successful = results.iter().filter(|r| r.success).count();
        info!(
            successful,
            failed = results.len() - successful,
            "Payroll complete"
        );
        Ok(results)
    }

    /// Pays a single employee from `account`. Never fails; errors end up in
    /// the returned result. Only called with the batch guard held.
    async fn pay_employee(&self, account: &Account, employee: &Employee) -> PaymentResult {
        match self.submit(account, employee).await {
            Ok(transaction_hash) => {
                info!(
                    employee_id = employee.id,
                    tx = %transaction_hash,
                    "Paid {}: {} {} to {}",
                    employee.name,
                    employee.salary,
                    self.token.symbol,
                    employee.address
                );
                PaymentResult::submitted(employee, transaction_hash)
            }
            Err(e) => {
                error!(employee_id = employee.id, "Failed to pay {}: {}", employee.name, e);
                PaymentResult::failed(employee, e.to_string())
            }
        }
    }

    async fn submit(&self, account: &Account, employee: &Employee) -> Result<String> {
        let transfer = TransferInstruction::new(
            self.token.contract,
            &employee.address,
            employee.salary,
            self.token.decimals,
        )?;
        let request = TransactionRequest {
            from: account.address,
            to: transfer.contract_address,
            value: 0,
            data: transfer.call_data(),
            network: self.network.clone(),
        };
        let submitted = self
            .wallet
            .send_transaction(&request)
            .await
            .map_err(PayrollError::TransactionSubmission)?;
        Ok(submitted.transaction_hash)
    }
}
