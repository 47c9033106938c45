//! Domain types shared by the application layer and its adapters.
//!
//! Nothing in here performs I/O; the wallet service is reached only through
//! the [`ports::WalletService`] trait.

pub mod account;
pub mod address;
pub mod balance;
pub mod employee;
pub mod payment;
pub mod ports;
pub mod transaction;
