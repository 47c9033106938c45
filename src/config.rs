use crate::domain::address::Address;
use crate::domain::transaction::Network;
use crate::error::{PayrollError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const API_KEY_ID_VAR: &str = "CDP_API_KEY_ID";
pub const API_KEY_SECRET_VAR: &str = "CDP_API_KEY_SECRET";
pub const API_URL_VAR: &str = "PAYROLL_API_URL";

/// Process settings, read from `PAYROLL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Root of the wallet gateway. Required unless running dry.
    pub api_url: Option<String>,
    pub network: String,
    pub account_name: String,
    pub expected_address: Option<String>,
    pub token_contract: String,
    pub token_symbol: String,
    pub token_decimals: u32,
    pub pacing_ms: u64,
    pub request_timeout_secs: u64,
}

/// API key pair used to authenticate against the wallet service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key_id: String,
    pub key_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads both halves of the key from the environment.
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let key_id = std::env::var(API_KEY_ID_VAR).ok()?;
        let key_secret = std::env::var(API_KEY_SECRET_VAR).ok()?;
        if key_id.is_empty() || key_secret.is_empty() {
            return None;
        }
        Some(Self { key_id, key_secret })
    }
}

/// The token being disbursed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub contract: Address,
    pub symbol: String,
    pub decimals: u32,
}

impl Settings {
    /// Loads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix("PAYROLL"))
    }

    /// Loads settings from an explicit variable map instead of the process
    /// environment.
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(config::Environment::with_prefix("PAYROLL").source(Some(vars)))
    }

    fn load(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("network", "base-sepolia")?
            .set_default("account_name", "my-trading-account")?
            .set_default(
                "token_contract",
                "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
            )?
            .set_default("token_symbol", "USDC")?
            .set_default("token_decimals", 6)?
            .set_default("pacing_ms", 2000)?
            .set_default("request_timeout_secs", 30)?
            .add_source(environment.try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn api_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| PayrollError::Configuration(format!("{API_URL_VAR} must be set")))
    }

    pub fn network(&self) -> Network {
        Network::new(self.network.clone())
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn token(&self) -> Result<TokenConfig> {
        let contract = self.token_contract.parse().map_err(|_| {
            PayrollError::Configuration(format!(
                "token contract {:?} is not a valid address",
                self.token_contract
            ))
        })?;
        Ok(TokenConfig {
            contract,
            symbol: self.token_symbol.clone(),
            decimals: self.token_decimals,
        })
    }

    pub fn expected_address(&self) -> Result<Option<Address>> {
        self.expected_address
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse().map_err(|_| {
                    PayrollError::Configuration(format!(
                        "expected address {raw:?} is not a valid address"
                    ))
                })
            })
            .transpose()
    }
}
