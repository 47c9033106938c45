use super::address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the chain the wallet service submits to, e.g. `base-sepolia`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Hash)]
#[serde(transparent)]
pub struct Network(String);

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A token transfer to be carried out by the token contract.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TransferInstruction {
    pub contract_address: Address,
    pub recipient: Address,
    /// Amount in the token's smallest unit.
    pub amount: u128,
}

/// A contract call the wallet service signs and submits for `from`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    /// Native currency attached to the call, in wei.
    pub value: u128,
    pub data: Vec<u8>,
    pub network: Network,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct SubmittedTransaction {
    pub transaction_hash: String,
}
