use crate::config::Credentials;
use crate::domain::address::Address;
use crate::domain::ports::WalletServiceRef;
use crate::domain::transaction::Network;
use crate::error::{PayrollError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Balance of one token, or the reason it could not be read.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BalanceReport {
    Available { balance: String },
    Unavailable { reason: String },
}

impl BalanceReport {
    /// The value to show for this report; `"0"` when unavailable.
    pub fn display_value(&self) -> &str {
        match self {
            BalanceReport::Available { balance } => balance,
            BalanceReport::Unavailable { .. } => "0",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, BalanceReport::Available { .. })
    }
}

/// Reads token balances through the wallet service. Nothing is cached.
pub struct BalanceQuery {
    wallet: WalletServiceRef,
    credentials: Option<Credentials>,
}

impl BalanceQuery {
    pub fn new(wallet: WalletServiceRef, credentials: Option<Credentials>) -> Self {
        Self {
            wallet,
            credentials,
        }
    }

    /// Returns the holding of `symbol` at `address`, formatted with the
    /// token's full number of decimals, or `"0"` when the address holds no
    /// such token.
    pub async fn fetch(
        &self,
        address: &Address,
        network: &Network,
        symbol: &str,
    ) -> Result<String> {
        if self.credentials.is_none() {
            return Err(PayrollError::Configuration(
                "wallet service API credentials not found in environment".to_string(),
            ));
        }

        let records = self
            .wallet
            .list_token_balances(address, network)
            .await
            .map_err(|e| PayrollError::BalanceQuery(e.to_string()))?;
        debug!(%address, %network, records = records.len(), "token balances listed");

        match records.iter().find(|record| record.symbol == symbol) {
            Some(record) => record.to_display(),
            None => Ok("0".to_string()),
        }
    }

    /// Like [`BalanceQuery::fetch`], but folds any failure into
    /// [`BalanceReport::Unavailable`].
    pub async fn report(
        &self,
        address: &Address,
        network: &Network,
        symbol: &str,
    ) -> BalanceReport {
        match self.fetch(address, network, symbol).await {
            Ok(balance) => BalanceReport::Available { balance },
            Err(e) => {
                warn!(%address, symbol, "balance unavailable: {}", e);
                BalanceReport::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
