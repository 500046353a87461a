//! Configuration types for an OpenSwap settlement executor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SwapError, constants};

/// How the maker's wallet turned the order hash into the digest it signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningScheme {
    /// `keccak256("\x19Ethereum Signed Message:\n32" ‖ order_hash)`, the
    /// digest produced by `eth_sign`.
    #[default]
    EthSignedMessage,
    /// The order hash is signed as-is.
    RawDigest,
}

impl fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EthSignedMessage => write!(f, "ETH_SIGNED_MESSAGE"),
            Self::RawDigest => write!(f, "RAW_DIGEST"),
        }
    }
}

/// Configuration for a settlement executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeConfig {
    /// Digest scheme makers sign with. Must match the wallets in use or every
    /// signature check fails.
    pub signing_scheme: SigningScheme,
    /// Reject signatures with `s > n/2`.
    pub require_low_s: bool,
    /// Permit orders whose maker and taker are the same address.
    pub allow_self_fill: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            signing_scheme: SigningScheme::default(),
            require_low_s: constants::DEFAULT_REQUIRE_LOW_S,
            allow_self_fill: constants::DEFAULT_ALLOW_SELF_FILL,
        }
    }
}

impl ExchangeConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`SwapError::Configuration`] on malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SwapError::Configuration(e.to_string()))
    }
}
