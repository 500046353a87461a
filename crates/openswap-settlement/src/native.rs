//! Native-currency balances.
//!
//! The substrate's own value: a holder's balance and the total ever
//! deposited. Value attached to a `fill` is debited from the caller inside
//! the fill's write batch and, for a native taker leg, credited to the
//! maker, so it never leaves the books in a half-moved state.

use openswap_types::{Address, Asset, Result, SwapError, U256};

use crate::store::{StateAccess, StateKey};
use crate::token_ledger::checked_add;

/// Stateless view of the `Native` and `NativeSupply` slots.
pub struct NativeLedger;

impl NativeLedger {
    pub fn balance_of(state: &impl StateAccess, holder: Address) -> U256 {
        state.read(&StateKey::Native(holder))
    }

    pub fn total_supply(state: &impl StateAccess) -> U256 {
        state.read(&StateKey::NativeSupply)
    }

    /// Bring new native value into the books for `to`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the supply or the balance would exceed 256 bits.
    pub fn deposit(state: &mut impl StateAccess, to: Address, amount: U256) -> Result<()> {
        let supply = checked_add(Self::total_supply(state), amount, "native supply")?;
        let balance = checked_add(Self::balance_of(state, to), amount, "native balance")?;
        state.write(StateKey::NativeSupply, supply);
        state.write(StateKey::Native(to), balance);
        tracing::debug!(to = ?to, amount = %amount, "Native deposit");
        Ok(())
    }

    /// Take `amount` out of `from`'s balance.
    ///
    /// # Errors
    /// `InsufficientBalance` if `from` holds less than `amount`.
    pub fn debit(state: &mut impl StateAccess, from: Address, amount: U256) -> Result<()> {
        let balance = Self::balance_of(state, from);
        if balance < amount {
            return Err(SwapError::InsufficientBalance {
                asset: Asset::NativeCurrency.to_string(),
                holder: from,
                needed: amount,
                available: balance,
            });
        }
        state.write(StateKey::Native(from), balance - amount);
        Ok(())
    }

    /// Add `amount` to `to`'s balance. Pairs with a prior [`Self::debit`].
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the balance would exceed 256 bits.
    pub fn credit(state: &mut impl StateAccess, to: Address, amount: U256) -> Result<()> {
        let balance = checked_add(Self::balance_of(state, to), amount, "native balance")?;
        state.write(StateKey::Native(to), balance);
        Ok(())
    }
}
