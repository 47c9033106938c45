use crate::domain::account::Account;
use crate::domain::address::Address;
use crate::domain::balance::TokenBalanceRecord;
use crate::domain::ports::{WalletResult, WalletService};
use crate::domain::transaction::{
    Network, SubmittedTransaction, TransactionRequest, TransferInstruction,
};
use crate::error::WalletError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct WalletState {
    accounts: HashMap<String, Account>,
    balances: HashMap<(Address, Network), Vec<TokenBalanceRecord>>,
    submitted: Vec<TransactionRequest>,
    rejected_recipients: HashSet<Address>,
    account_failure: Option<WalletError>,
    balance_failure: Option<WalletError>,
}

#[derive(Default)]
struct CallCounters {
    accounts: AtomicUsize,
    sends: AtomicUsize,
    balances: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// A wallet service that keeps everything in process memory.
///
/// Accounts get deterministic addresses and every accepted submission gets a
/// sequential hash. Failures can be scripted per operation, and every call is
/// counted, which makes it the backing service for dry runs and tests.
#[derive(Default, Clone)]
pub struct InMemoryWallet {
    state: Arc<RwLock<WalletState>>,
    calls: Arc<CallCounters>,
}

impl InMemoryWallet {
    /// Creates an empty wallet with no accounts or balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an existing account so lookups by `name` return it.
    pub async fn insert_account(&self, account: Account) {
        let mut state = self.state.write().await;
        state.accounts.insert(account.name.clone(), account);
    }

    pub async fn set_balances(
        &self,
        address: Address,
        network: Network,
        records: Vec<TokenBalanceRecord>,
    ) {
        let mut state = self.state.write().await;
        state.balances.insert((address, network), records);
    }

    /// Makes every transfer whose call data pays `recipient` fail.
    pub async fn reject_transfers_to(&self, recipient: Address) {
        let mut state = self.state.write().await;
        state.rejected_recipients.insert(recipient);
    }

    pub async fn fail_account_lookups(&self, error: WalletError) {
        self.state.write().await.account_failure = Some(error);
    }

    pub async fn fail_balance_queries(&self, error: WalletError) {
        self.state.write().await.balance_failure = Some(error);
    }

    /// Requests accepted so far, in submission order.
    pub async fn submitted(&self) -> Vec<TransactionRequest> {
        self.state.read().await.submitted.clone()
    }

    pub fn account_calls(&self) -> usize {
        self.calls.accounts.load(Ordering::SeqCst)
    }

    pub fn send_calls(&self) -> usize {
        self.calls.sends.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> usize {
        self.calls.balances.load(Ordering::SeqCst)
    }

    /// Highest number of submissions that were in progress at the same time.
    pub fn max_concurrent_sends(&self) -> usize {
        self.calls.max_in_flight.load(Ordering::SeqCst)
    }

    fn derive_address(ordinal: usize) -> Address {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xac;
        bytes[12..].copy_from_slice(&(ordinal as u64 + 1).to_be_bytes());
        Address::from_bytes(bytes)
    }
}

#[async_trait]
impl WalletService for InMemoryWallet {
    async fn get_or_create_account(&self, name: &str) -> WalletResult<Account> {
        self.calls.accounts.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if let Some(error) = &state.account_failure {
            return Err(error.clone());
        }
        let ordinal = state.accounts.len();
        let account = state
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| Account::new(Self::derive_address(ordinal), name))
            .clone();
        debug!(name, address = %account.address, "in-memory account resolved");
        Ok(account)
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> WalletResult<SubmittedTransaction> {
        let sequence = self.calls.sends.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.calls.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        // Give a concurrent caller the chance to overlap.
        tokio::task::yield_now().await;

        let result = {
            let mut state = self.state.write().await;
            let rejected = TransferInstruction::decode(request.to, &request.data)
                .map(|transfer| state.rejected_recipients.contains(&transfer.recipient))
                .unwrap_or(false);
            if rejected {
                Err(WalletError::Rejected {
                    status: 400,
                    message: "transfer rejected by wallet service".to_string(),
                })
            } else {
                state.submitted.push(request.clone());
                Ok(SubmittedTransaction {
                    transaction_hash: format!("0x{:064x}", sequence + 1),
                })
            }
        };

        self.calls.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn list_token_balances(
        &self,
        address: &Address,
        network: &Network,
    ) -> WalletResult<Vec<TokenBalanceRecord>> {
        self.calls.balances.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        if let Some(error) = &state.balance_failure {
            return Err(error.clone());
        }
        Ok(state
            .balances
            .get(&(*address, network.clone()))
            .cloned()
            .unwrap_or_default())
    }
}
