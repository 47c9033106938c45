use crate::domain::account::Account;
use crate::domain::address::Address;
use crate::domain::ports::WalletServiceRef;
use crate::error::{PayrollError, Result};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Looks up (or creates) the payroll signing account once and caches it.
///
/// The first successful call to [`AccountResolver::resolve`] hits the wallet
/// service; every later call is served from the cache. Concurrent first calls
/// wait on the same initialization instead of issuing their own request. A
/// failed lookup leaves the cache empty.
pub struct AccountResolver {
    wallet: WalletServiceRef,
    label: String,
    expected_address: Option<Address>,
    account: OnceCell<Account>,
}

impl AccountResolver {
    /// Creates a resolver for the account registered under `label`.
    ///
    /// # Arguments
    ///
    /// * `wallet` - The wallet service holding the account.
    /// * `label` - Lookup key for the get-or-create request.
    /// * `expected_address` - Address the account is believed to have. A
    ///   mismatch is only reported, never enforced.
    pub fn new(
        wallet: WalletServiceRef,
        label: impl Into<String>,
        expected_address: Option<Address>,
    ) -> Self {
        Self {
            wallet,
            label: label.into(),
            expected_address,
            account: OnceCell::new(),
        }
    }

    pub async fn resolve(&self) -> Result<&Account> {
        self.account
            .get_or_try_init(|| async {
                let account = self
                    .wallet
                    .get_or_create_account(&self.label)
                    .await
                    .map_err(PayrollError::AccountResolution)?;
                info!(label = %self.label, address = %account.address, "Using payroll account");

                if let Some(expected) = self.expected_address
                    && expected != account.address
                {
                    warn!(
                        expected = %expected,
                        resolved = %account.address,
                        "Account address mismatch, proceeding with the resolved account"
                    );
                }
                Ok::<_, PayrollError>(account)
            })
            .await
    }

    /// The cached account, if resolution already happened.
    pub fn cached(&self) -> Option<&Account> {
        self.account.get()
    }
}
