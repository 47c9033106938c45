use super::address::Address;
use serde::{Deserialize, Serialize};

/// The signing identity that originates every outgoing transfer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Account {
    /// On-chain address of the custodial account.
    pub address: Address,
    /// Logical label the account was looked up or created with.
    pub name: String,
}

impl Account {
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}
