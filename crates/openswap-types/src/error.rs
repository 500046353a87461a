//! Error types for the OpenSwap settlement engine.
//!
//! All errors use the `SWAP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Signature errors
//! - 3xx: Fill ledger errors
//! - 4xx: Asset / value errors
//! - 5xx: Settlement errors
//! - 9xx: General / internal errors
//!
//! Every error is terminal for the `fill` call that raised it. The executor
//! discards the call's write batch, so no partial state survives.

use thiserror::Error;

use crate::{Address, OrderHash, TokenHandle, U256};

/// Central error enum for all OpenSwap operations.
#[derive(Debug, Error)]
pub enum SwapError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The order failed shape validation (zero amounts, zero parties, etc.).
    #[error("SWAP_ERR_100: Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// The substrate clock has reached the order's expiration.
    #[error("SWAP_ERR_101: Order expired: expiration {expiration}, now {now}")]
    OrderExpired { expiration: U256, now: u64 },

    /// The caller is not the taker named in the order.
    #[error("SWAP_ERR_102: Caller {caller:?} is not the order taker {taker:?}")]
    UnauthorizedTaker { caller: Address, taker: Address },

    /// Maker and taker are the same party.
    #[error("SWAP_ERR_103: Maker and taker are the same address {0:?}")]
    SelfFill(Address),

    // =================================================================
    // Signature Errors (2xx)
    // =================================================================
    /// The recovered signer is not the order's maker.
    #[error("SWAP_ERR_200: Invalid signature: recovered {recovered:?}, expected maker {maker:?}")]
    InvalidSignature { recovered: Address, maker: Address },

    /// The signature components are out of range or non-canonical.
    #[error("SWAP_ERR_201: Malformed signature: {reason}")]
    MalformedSignature { reason: String },

    // =================================================================
    // Fill Ledger Errors (3xx)
    // =================================================================
    /// Cumulative fills already equal the order's taker amount.
    #[error("SWAP_ERR_300: Order fully filled: {0}")]
    OrderFullyFilled(OrderHash),

    /// The requested or derived fill amount is zero.
    #[error("SWAP_ERR_301: Invalid fill amount: {reason}")]
    InvalidFillAmount { reason: String },

    // =================================================================
    // Asset / Value Errors (4xx)
    // =================================================================
    /// The maker leg names the native currency, or the legs are otherwise
    /// not settleable.
    #[error("SWAP_ERR_400: Unsupported asset combination: {reason}")]
    UnsupportedAssetCombination { reason: String },

    /// Native value attached to the call does not equal the taker leg.
    #[error("SWAP_ERR_401: Insufficient value: attached {attached}, required {required}")]
    InsufficientValue { attached: U256, required: U256 },

    /// Native value was attached to a fill whose taker leg is a token.
    #[error("SWAP_ERR_402: Unexpected value {attached} attached to a fungible taker leg")]
    UnexpectedValue { attached: U256 },

    // =================================================================
    // Settlement Errors (5xx)
    // =================================================================
    /// The spender's allowance from `owner` is below the transfer amount.
    #[error(
        "SWAP_ERR_500: Insufficient allowance on {token}: owner {owner:?} granted {available}, need {needed}"
    )]
    InsufficientAllowance {
        token: TokenHandle,
        owner: Address,
        needed: U256,
        available: U256,
    },

    /// The holder's balance is below the transfer amount.
    #[error(
        "SWAP_ERR_501: Insufficient balance of {asset} for {holder:?}: need {needed}, have {available}"
    )]
    InsufficientBalance {
        asset: String,
        holder: Address,
        needed: U256,
        available: U256,
    },

    /// A balance or supply update would exceed 256 bits.
    #[error("SWAP_ERR_502: Arithmetic overflow: {reason}")]
    ArithmeticOverflow { reason: String },

    /// Supply conservation invariant violated. Critical safety alert.
    #[error("SWAP_ERR_503: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("SWAP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config document, bad values, etc.).
    #[error("SWAP_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl SwapError {
    /// The `SWAP_ERR_nnn` code of this error, for structured log fields.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidOrder { .. } => "SWAP_ERR_100",
            Self::OrderExpired { .. } => "SWAP_ERR_101",
            Self::UnauthorizedTaker { .. } => "SWAP_ERR_102",
            Self::SelfFill(_) => "SWAP_ERR_103",
            Self::InvalidSignature { .. } => "SWAP_ERR_200",
            Self::MalformedSignature { .. } => "SWAP_ERR_201",
            Self::OrderFullyFilled(_) => "SWAP_ERR_300",
            Self::InvalidFillAmount { .. } => "SWAP_ERR_301",
            Self::UnsupportedAssetCombination { .. } => "SWAP_ERR_400",
            Self::InsufficientValue { .. } => "SWAP_ERR_401",
            Self::UnexpectedValue { .. } => "SWAP_ERR_402",
            Self::InsufficientAllowance { .. } => "SWAP_ERR_500",
            Self::InsufficientBalance { .. } => "SWAP_ERR_501",
            Self::ArithmeticOverflow { .. } => "SWAP_ERR_502",
            Self::SupplyInvariantViolation { .. } => "SWAP_ERR_503",
            Self::Serialization(_) => "SWAP_ERR_901",
            Self::Configuration(_) => "SWAP_ERR_902",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SwapError>;

impl From<serde_json::Error> for SwapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
