use crate::config::Credentials;
use crate::domain::account::Account;
use crate::domain::address::Address;
use crate::domain::balance::{MAX_DECIMALS, TokenBalanceRecord};
use crate::domain::ports::{WalletResult, WalletService};
use crate::domain::transaction::{Network, SubmittedTransaction, TransactionRequest};
use crate::error::{PayrollError, Result, WalletError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Wallet gateway reached over a JSON REST API.
///
/// The gateway holds the keys and signs on our behalf. Routes live under
/// `{base}/v2/evm/`:
///
/// - `POST accounts` with `{"name"}` creates an account; `409` means it
///   exists, and it is then read from `GET accounts/by-name/{name}`.
/// - `POST accounts/{from}/send/transaction` with
///   `{"network", "transaction": {"to", "value", "data"}}` returns
///   `{"transactionHash"}`.
/// - `GET token-balances/{network}/{address}` returns pages of
///   `{"balances", "nextPageToken"}`, continued with `?pageToken=`.
///
/// Every request carries `Authorization: Bearer <key secret>` and
/// `X-Api-Key-Id: <key id>`. Responses are decoded into the wire structs
/// below and validated before they become domain types, so a malformed
/// payload surfaces as [`WalletError::UnexpectedResponse`].
pub struct HttpWalletService {
    client: Client,
    base_url: Url,
    credentials: Credentials,
}

#[derive(Debug, Serialize)]
struct CreateAccountRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    address: String,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendTransactionBody {
    network: String,
    transaction: TransactionBody,
}

#[derive(Debug, Serialize)]
struct TransactionBody {
    to: String,
    value: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendTransactionResponse {
    transaction_hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenBalancesPage {
    balances: Vec<TokenBalanceEntry>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBalanceEntry {
    amount: TokenAmount,
    token: Token,
}

#[derive(Debug, Deserialize)]
struct TokenAmount {
    amount: String,
    decimals: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Token {
    contract_address: String,
    symbol: Option<String>,
}

impl HttpWalletService {
    /// Creates a client for the gateway at `base_url`.
    ///
    /// `timeout` bounds every request end to end.
    pub fn new(base_url: &str, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            PayrollError::Configuration(format!("wallet gateway URL {base_url:?} is invalid: {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(PayrollError::Configuration(format!(
                "wallet gateway URL {base_url} cannot carry a path"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PayrollError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Joins `segments` under the API root, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> WalletResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WalletError::Transport(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(["v2", "evm"])
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.credentials.key_secret)
            .header("X-Api-Key-Id", &self.credentials.key_id)
    }

    async fn send(&self, builder: RequestBuilder) -> WalletResult<Response> {
        self.authorized(builder)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> WalletResult<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WalletError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| WalletError::UnexpectedResponse(e.to_string()))
    }

    async fn account_by_name(&self, name: &str) -> WalletResult<AccountResponse> {
        let url = self.url(&["accounts", "by-name", name])?;
        let response = self.send(self.client.get(url)).await?;
        Self::decode(response).await
    }
}

fn into_account(wire: AccountResponse, requested_name: &str) -> WalletResult<Account> {
    let address = wire.address.parse().map_err(|_| {
        WalletError::UnexpectedResponse(format!("account address {:?} is invalid", wire.address))
    })?;
    Ok(Account::new(
        address,
        wire.name.unwrap_or_else(|| requested_name.to_string()),
    ))
}

fn into_transaction_body(request: &TransactionRequest) -> SendTransactionBody {
    SendTransactionBody {
        network: request.network.as_str().to_string(),
        transaction: TransactionBody {
            to: request.to.to_string(),
            value: request.value.to_string(),
            data: format!("0x{}", hex::encode(&request.data)),
        },
    }
}

fn into_submitted(wire: SendTransactionResponse) -> WalletResult<SubmittedTransaction> {
    if wire.transaction_hash.is_empty() {
        return Err(WalletError::UnexpectedResponse(
            "empty transaction hash".to_string(),
        ));
    }
    Ok(SubmittedTransaction {
        transaction_hash: wire.transaction_hash,
    })
}

/// Entries without a symbol cannot match a lookup and are skipped.
fn into_records(entries: Vec<TokenBalanceEntry>) -> WalletResult<Vec<TokenBalanceRecord>> {
    entries
        .into_iter()
        .filter_map(|entry| entry.token.symbol.clone().map(|symbol| (symbol, entry)))
        .map(|(symbol, entry)| -> WalletResult<TokenBalanceRecord> {
            let contract_address = entry.token.contract_address.parse().map_err(|_| {
                WalletError::UnexpectedResponse(format!(
                    "token contract {:?} is invalid",
                    entry.token.contract_address
                ))
            })?;
            if entry.amount.decimals > MAX_DECIMALS {
                return Err(WalletError::UnexpectedResponse(format!(
                    "{symbol} reports {} decimals",
                    entry.amount.decimals
                )));
            }
            Ok(TokenBalanceRecord {
                symbol,
                contract_address,
                raw_amount: entry.amount.amount,
                decimals: entry.amount.decimals,
            })
        })
        .collect()
}

#[async_trait]
impl WalletService for HttpWalletService {
    async fn get_or_create_account(&self, name: &str) -> WalletResult<Account> {
        let url = self.url(&["accounts"])?;
        let response = self
            .send(self.client.post(url).json(&CreateAccountRequest { name }))
            .await?;

        let wire = if response.status() == StatusCode::CONFLICT {
            debug!(name, "account already exists, loading it");
            self.account_by_name(name).await?
        } else {
            Self::decode(response).await?
        };
        into_account(wire, name)
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> WalletResult<SubmittedTransaction> {
        let body = into_transaction_body(request);
        debug!(
            from = %request.from,
            to = %body.transaction.to,
            network = %body.network,
            "submitting transaction"
        );
        let from = request.from.to_string();
        let url = self.url(&["accounts", &from, "send", "transaction"])?;
        let response = self.send(self.client.post(url).json(&body)).await?;
        into_submitted(Self::decode(response).await?)
    }

    async fn list_token_balances(
        &self,
        address: &Address,
        network: &Network,
    ) -> WalletResult<Vec<TokenBalanceRecord>> {
        let address = address.to_string();
        let url = self.url(&["token-balances", network.as_str(), &address])?;
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut builder = self.client.get(url.clone());
            if let Some(token) = &page_token {
                builder = builder.query(&[("pageToken", token)]);
            }
            let page: TokenBalancesPage = Self::decode(self.send(builder).await?).await?;
            records.extend(into_records(page.balances)?);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(records)
    }
}
