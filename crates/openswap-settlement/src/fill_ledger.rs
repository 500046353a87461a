//! Per-order fill accounting.
//!
//! Like a spent-output set: an order identity can absorb at most its
//! `taker_amount` of fills in total, across any number of calls. Once the
//! cumulative fill reaches `taker_amount` the identity is terminal and every
//! further fill returns [`SwapError::OrderFullyFilled`].
//!
//! Entries are never deleted. The ledger only sees the order hash and the
//! taker amount the caller supplies, so the hash must come from a verified
//! order.

use openswap_types::{FillState, OrderHash, Result, SwapError, U256};

use crate::store::{StateAccess, StateKey};

/// Stateless view of the `Filled(order_hash)` slots.
pub struct FillLedger;

impl FillLedger {
    /// Cumulative taker-side amount filled so far.
    pub fn filled(state: &impl StateAccess, order_hash: &OrderHash) -> U256 {
        state.read(&StateKey::Filled(*order_hash))
    }

    /// `taker_amount - filled`, floored at zero.
    pub fn remaining(state: &impl StateAccess, order_hash: &OrderHash, taker_amount: U256) -> U256 {
        taker_amount.saturating_sub(Self::filled(state, order_hash))
    }

    pub fn fill_state(
        state: &impl StateAccess,
        order_hash: &OrderHash,
        taker_amount: U256,
    ) -> FillState {
        FillState::classify(Self::filled(state, order_hash), taker_amount)
    }

    /// Record a fill of up to `requested` taker-side units and return the
    /// amount actually recorded, `min(requested, remaining)`.
    ///
    /// # Errors
    /// - `OrderFullyFilled` if nothing remains
    /// - `InvalidFillAmount` if `requested` is zero
    pub fn record_fill(
        state: &mut impl StateAccess,
        order_hash: &OrderHash,
        taker_amount: U256,
        requested: U256,
    ) -> Result<U256> {
        let filled = Self::filled(state, order_hash);
        let remaining = taker_amount.saturating_sub(filled);
        if remaining.is_zero() {
            return Err(SwapError::OrderFullyFilled(*order_hash));
        }
        if requested.is_zero() {
            return Err(SwapError::InvalidFillAmount {
                reason: "requested taker amount is zero".to_string(),
            });
        }

        let actual = requested.min(remaining);
        // filled + actual <= taker_amount, so this cannot wrap.
        state.write(StateKey::Filled(*order_hash), filled + actual);

        tracing::debug!(
            order = %order_hash.short(),
            filled = %(filled + actual),
            taker_amount = %taker_amount,
            "Recorded fill"
        );
        Ok(actual)
    }
}
