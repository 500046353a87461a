//! Order types for the OpenSwap settlement engine.
//!
//! An [`Order`] is built and signed by the maker off-system and is never
//! stored: the engine only ever sees it as call input and keys its fill
//! accounting by the order's hash.

use std::fmt;

use ethers::types::U512;
use serde::{Deserialize, Serialize};

use crate::{Address, Result, SwapError, TokenHandle, U256};

/// One leg of a swap: either a fungible token ledger or the substrate's
/// native currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Asset {
    Fungible(TokenHandle),
    NativeCurrency,
}

impl Asset {
    #[must_use]
    pub fn fungible(address: Address) -> Self {
        Self::Fungible(TokenHandle::new(address))
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::NativeCurrency)
    }

    /// The token handle for a fungible leg.
    #[must_use]
    pub fn token(&self) -> Option<TokenHandle> {
        match self {
            Self::Fungible(token) => Some(*token),
            Self::NativeCurrency => None,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fungible(token) => write!(f, "{token}"),
            Self::NativeCurrency => write!(f, "NATIVE"),
        }
    }
}

/// Lifecycle of an order identity as seen by the fill ledger.
///
/// Transitions are **monotonic**: `Unfilled → PartiallyFilled → FullyFilled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillState {
    /// No fill record exists yet.
    Unfilled,
    /// `0 < filled < taker_amount`.
    PartiallyFilled,
    /// `filled == taker_amount`. Terminal.
    FullyFilled,
}

impl FillState {
    /// Classify a cumulative fill against the order's taker amount.
    #[must_use]
    pub fn classify(filled: U256, taker_amount: U256) -> Self {
        if filled.is_zero() {
            Self::Unfilled
        } else if filled >= taker_amount {
            Self::FullyFilled
        } else {
            Self::PartiallyFilled
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FullyFilled)
    }
}

impl fmt::Display for FillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unfilled => write!(f, "UNFILLED"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::FullyFilled => write!(f, "FULLY_FILLED"),
        }
    }
}

/// A maker's signed intent to exchange `maker_amount` of `maker_asset` for
/// `taker_amount` of `taker_asset`, valid until `expiration`.
///
/// The order is fully defined by these 8 fields; changing any of them changes
/// its hash and invalidates the maker's signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub maker: Address,
    pub maker_amount: U256,
    pub maker_asset: Asset,
    pub taker: Address,
    pub taker_amount: U256,
    pub taker_asset: Asset,
    /// Absolute timestamp in substrate clock units (unix seconds).
    pub expiration: U256,
    /// Maker-chosen disambiguator for otherwise identical orders.
    pub nonce: U256,
}

impl Order {
    /// Reject orders that cannot be encoded unambiguously or settled.
    ///
    /// # Errors
    /// Returns [`SwapError::InvalidOrder`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.maker.is_zero() {
            return Err(invalid("maker address is zero"));
        }
        if self.taker.is_zero() {
            return Err(invalid("taker address is zero"));
        }
        if self.maker_amount.is_zero() {
            return Err(invalid("maker amount is zero"));
        }
        if self.taker_amount.is_zero() {
            return Err(invalid("taker amount is zero"));
        }
        // The zero address encodes NativeCurrency; a token living there would
        // hash identically to a native leg.
        for (leg, asset) in [("maker", self.maker_asset), ("taker", self.taker_asset)] {
            if asset.token().is_some_and(|token| token.is_zero()) {
                return Err(SwapError::InvalidOrder {
                    reason: format!("{leg} token handle is the native sentinel address"),
                });
            }
        }
        Ok(())
    }

    /// Whether the order is no longer fillable at substrate time `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: u64) -> bool {
        U256::from(now) >= self.expiration
    }

    /// Maker-side amount owed for `filled_taker` units of the taker leg:
    /// `floor(maker_amount * filled_taker / taker_amount)`.
    ///
    /// The product is taken in 512 bits so it never wraps.
    ///
    /// # Errors
    /// - `InvalidOrder` if `taker_amount` is zero
    /// - `ArithmeticOverflow` if the quotient does not fit 256 bits, which
    ///   only happens when `filled_taker > taker_amount`
    pub fn proportional_maker_amount(&self, filled_taker: U256) -> Result<U256> {
        if self.taker_amount.is_zero() {
            return Err(invalid("taker amount is zero"));
        }
        let quotient = self.maker_amount.full_mul(filled_taker) / U512::from(self.taker_amount);
        U256::try_from(quotient).map_err(|_| SwapError::ArithmeticOverflow {
            reason: format!(
                "maker share of {filled_taker} exceeds 256 bits (maker_amount {}, taker_amount {})",
                self.maker_amount, self.taker_amount
            ),
        })
    }
}

fn invalid(reason: &str) -> SwapError {
    SwapError::InvalidOrder {
        reason: reason.to_string(),
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// Token-for-token order expiring at `u64::MAX`, nonce 1.
    pub fn dummy(
        maker: Address,
        maker_amount: u64,
        maker_token: Address,
        taker: Address,
        taker_amount: u64,
        taker_token: Address,
    ) -> Self {
        Self {
            maker,
            maker_amount: U256::from(maker_amount),
            maker_asset: Asset::fungible(maker_token),
            taker,
            taker_amount: U256::from(taker_amount),
            taker_asset: Asset::fungible(taker_token),
            expiration: U256::from(u64::MAX),
            nonce: U256::one(),
        }
    }
}
