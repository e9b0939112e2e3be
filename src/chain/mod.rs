//! Core MultiversX chain types, configuration, and transaction model.
//!
//! This module provides the fundamental types for interacting with
//! the MultiversX blockchain within the x402 protocol:
//!
//! - [`MvxAddress`] - bech32 `erd1…` account address
//! - [`MvxChainReference`] - Chain reference (`1`, `D` or `T`)
//! - [`MvxTokenIdentifier`] / [`MvxTokenDeployment`] - EGLD and ESDT tokens
//! - [`MvxProtocolConfig`] - Gas coefficients and timeouts
//! - [`MvxTransaction`] / [`MvxTransactionFactory`] - Transfer construction
//! - [`ObservedTransaction`] - Transaction fields reported by a provider

pub mod types;
pub use types::*;

pub mod config;
pub use config::*;

pub mod did;
pub use did::*;

pub mod esdt;
pub use esdt::*;

pub mod gas;
pub use gas::*;

pub mod transaction;
pub use transaction::*;

pub mod provider;
pub use provider::*;
