//! Application layer containing the payroll orchestration.
//!
//! [`disburser::Disburser`] is the primary entry point for paying a roster. It
//! resolves the payroll account through [`resolver::AccountResolver`], builds
//! call data with [`encoder`], and submits transfers one by one. Balance
//! reporting lives in [`balance`] and is independent of the payment path.

pub mod balance;
pub mod disburser;
pub mod encoder;
pub mod resolver;
