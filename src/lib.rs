//! MultiversX blockchain support for the x402 payment protocol.
//!
//! This crate provides the V1 "mvx" payment scheme for MultiversX. Networks
//! are named `mvx:<chain>` (`mvx:1`, `mvx:D`, `mvx:T`). Payments are either
//! plain EGLD value transfers or ESDT token transfers encoded in the
//! transaction data field.
//!
//! # Architecture
//!
//! 1. **Server** builds payment requirements carrying the pre-computed data
//!    field, gas limit and transfer method
//! 2. **Client** builds the transfer, signs it with its own signer and sends
//!    the signed fields as the payment payload
//! 3. **Facilitator** checks the payload, broadcasts it through a network
//!    provider and verifies the observed transaction against the requirement
//!
//! The crate performs no network I/O itself; signing and broadcasting are
//! supplied by the caller through [`MvxSignerLike`](v1_mvx_exact::MvxSignerLike)
//! and [`MvxTransactionSource`](chain::MvxTransactionSource).
//!
//! # Feature Flags
//!
//! - `server` - Server-side payment requirements
//! - `client` - Client-side payload construction and signing
//! - `facilitator` - Facilitator-side verification and settlement
//! - `tracing` - Debug and warning events through `tracing`
//!
//! # Usage
//!
//! ## Server: Creating Payment Requirements
//!
//! ```ignore
//! use x402_chain_mvx::V1MvxExact;
//! use x402_chain_mvx::chain::{MvxChainReference, MvxProtocolConfig};
//!
//! let scheme = V1MvxExact::new(MvxChainReference::mainnet(), MvxProtocolConfig::from_env()?);
//! let requirements = scheme.payment_requirements(
//!     1_000_000,       // 1 USDC (6 decimals)
//!     "USDC-c76f1f",
//!     "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx",
//!     "https://api.example.com/weather",
//!     "Weather report",
//!     None,
//! )?;
//! ```
//!
//! ## Client: Signing a Payment
//!
//! ```ignore
//! use x402_chain_mvx::V1MvxExactClient;
//!
//! let client = V1MvxExactClient::new(scheme, signer, sender_address);
//! let payload = client.sign_payment(&requirements, account_nonce)?;
//! ```

pub mod chain;
pub mod v1_mvx_exact;

mod networks;
pub use networks::*;

pub use v1_mvx_exact::V1MvxExact;

#[cfg(feature = "client")]
pub use v1_mvx_exact::client::V1MvxExactClient;

#[cfg(feature = "facilitator")]
pub use v1_mvx_exact::facilitator::V1MvxExactFacilitator;
