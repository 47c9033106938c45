use super::account::Account;
use super::address::Address;
use super::balance::TokenBalanceRecord;
use super::transaction::{Network, SubmittedTransaction, TransactionRequest};
use crate::error::WalletError;
use async_trait::async_trait;
use std::sync::Arc;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

/// The custodial wallet service that holds keys and signs on our behalf.
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Loads the account registered under `name`, creating it if absent.
    async fn get_or_create_account(&self, name: &str) -> WalletResult<Account>;

    /// Signs `request` with the sender's key and submits it to the network.
    async fn send_transaction(&self, request: &TransactionRequest)
    -> WalletResult<SubmittedTransaction>;

    async fn list_token_balances(
        &self,
        address: &Address,
        network: &Network,
    ) -> WalletResult<Vec<TokenBalanceRecord>>;
}

pub type WalletServiceRef = Arc<dyn WalletService>;
