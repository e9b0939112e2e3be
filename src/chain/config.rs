//! Protocol constants for MultiversX payments.
//!
//! [`MvxProtocolConfig`] carries the gas coefficients and timeouts used when
//! building requirements and payloads. It is constructed once, either from
//! defaults or from the environment, and handed to the scheme by value.

use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::num::ParseIntError;

/// Gas added on top of the formula whenever the transfer carries data or
/// moves an ESDT token, covering built-in function execution.
pub const EXECUTION_GAS_BUFFER: u64 = 10_000_000;

/// Seconds subtracted from "now" for the start of a validity window.
pub const VALIDITY_CLOCK_SKEW_SECONDS: u64 = 600;

/// Configuration for MultiversX gas pricing and payment timeouts.
///
/// # Example - Environment overrides
///
/// ```text
/// MVX_GAS_BASE_COST=50000
/// MVX_GAS_PER_BYTE=1500
/// MVX_GAS_MULTI_TRANSFER_COST=200000
/// MVX_GAS_RELAYED_COST=50000
/// MVX_GAS_PRICE_DEFAULT=1000000000
/// MVX_DEFAULT_TIMEOUT_SECONDS=600
/// MVX_MIN_TIMEOUT_SECONDS=60
/// ```
///
/// The base cost and the default gas price must be non-zero, so that every
/// gas limit and fee derived from this configuration is positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MvxProtocolConfig {
    /// Gas charged for any transaction.
    #[serde(deserialize_with = "non_zero")]
    pub gas_base_cost: u64,
    /// Gas charged per byte of the data field.
    pub gas_per_byte: u64,
    /// Surcharge for the multi-transfer built-in function.
    pub gas_multi_transfer_cost: u64,
    /// Surcharge paid when a relayer submits the transaction.
    pub gas_relayed_cost: u64,
    /// Gas price used when the transaction does not set one.
    #[serde(deserialize_with = "non_zero")]
    pub gas_price_default: u64,
    /// Timeout used when the caller does not pass one.
    pub default_timeout_seconds: u64,
    /// Lower bound for caller-supplied timeouts.
    pub min_timeout_seconds: u64,
}

impl Default for MvxProtocolConfig {
    fn default() -> Self {
        Self {
            gas_base_cost: 50_000,
            gas_per_byte: 1_500,
            gas_multi_transfer_cost: 200_000,
            gas_relayed_cost: 50_000,
            gas_price_default: 1_000_000_000,
            default_timeout_seconds: 600,
            min_timeout_seconds: 60,
        }
    }
}

impl MvxProtocolConfig {
    /// Builds the configuration from `MVX_*` environment variables.
    ///
    /// Unset variables keep their default value.
    ///
    /// # Errors
    ///
    /// Returns [`MvxConfigError`] naming the variable whose value is not an
    /// unsigned integer, or is zero where a positive value is required.
    pub fn from_env() -> Result<Self, MvxConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MvxConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |name: &'static str, default: u64| -> Result<u64, MvxConfigError> {
            match lookup(name) {
                None => Ok(default),
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|source| MvxConfigError::InvalidValue {
                        variable: name,
                        value,
                        source,
                    }),
            }
        };
        let config = Self {
            gas_base_cost: read("MVX_GAS_BASE_COST", defaults.gas_base_cost)?,
            gas_per_byte: read("MVX_GAS_PER_BYTE", defaults.gas_per_byte)?,
            gas_multi_transfer_cost: read(
                "MVX_GAS_MULTI_TRANSFER_COST",
                defaults.gas_multi_transfer_cost,
            )?,
            gas_relayed_cost: read("MVX_GAS_RELAYED_COST", defaults.gas_relayed_cost)?,
            gas_price_default: read("MVX_GAS_PRICE_DEFAULT", defaults.gas_price_default)?,
            default_timeout_seconds: read(
                "MVX_DEFAULT_TIMEOUT_SECONDS",
                defaults.default_timeout_seconds,
            )?,
            min_timeout_seconds: read("MVX_MIN_TIMEOUT_SECONDS", defaults.min_timeout_seconds)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that must be positive.
    pub fn validate(&self) -> Result<(), MvxConfigError> {
        if self.gas_base_cost == 0 {
            return Err(MvxConfigError::ZeroValue {
                variable: "MVX_GAS_BASE_COST",
            });
        }
        if self.gas_price_default == 0 {
            return Err(MvxConfigError::ZeroValue {
                variable: "MVX_GAS_PRICE_DEFAULT",
            });
        }
        Ok(())
    }

    /// Resolves the timeout for a requirement: the caller's value raised to
    /// the configured minimum, or the default when absent.
    pub fn resolve_timeout(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(seconds) => seconds.max(self.min_timeout_seconds),
            None => self.default_timeout_seconds,
        }
    }
}

/// Error raised while reading configuration overrides.
#[derive(Debug, thiserror::Error)]
pub enum MvxConfigError {
    /// An environment variable holds a value that is not an unsigned integer.
    #[error("Invalid value {value:?} for {variable}: {source}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    /// A value that must be positive is zero.
    #[error("{variable} must be greater than zero")]
    ZeroValue { variable: &'static str },
}

fn non_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = u64::deserialize(deserializer)?;
    if value == 0 {
        return Err(serde::de::Error::custom("value must be greater than zero"));
    }
    Ok(value)
}
