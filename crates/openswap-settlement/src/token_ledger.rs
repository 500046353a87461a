//! Fungible-token ledger collaborator.
//!
//! Models the external token contract a [`TokenHandle`] points at:
//! per-holder balances, per-(owner, spender) allowances, and total supply.
//! The settlement executor only ever moves tokens through
//! [`TokenLedger::transfer_from`] with itself as spender, so a maker or taker
//! who has not approved the executor cannot be debited.
//!
//! Every operation checks all of its preconditions before writing, so a
//! failed call leaves the state it was given unchanged.

use openswap_types::{
    Address, ApprovalEvent, Result, SwapError, TokenHandle, TransferEvent, U256,
};

use crate::store::{StateAccess, StateKey};

/// View of one token's slots in engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLedger {
    token: TokenHandle,
}

impl TokenLedger {
    #[must_use]
    pub fn new(token: TokenHandle) -> Self {
        Self { token }
    }

    #[must_use]
    pub fn token(&self) -> TokenHandle {
        self.token
    }

    pub fn balance_of(&self, state: &impl StateAccess, holder: Address) -> U256 {
        state.read(&self.balance_key(holder))
    }

    pub fn allowance(&self, state: &impl StateAccess, owner: Address, spender: Address) -> U256 {
        state.read(&self.allowance_key(owner, spender))
    }

    pub fn total_supply(&self, state: &impl StateAccess) -> U256 {
        state.read(&StateKey::Supply(self.token))
    }

    /// Create `amount` new units for `to`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the supply or the balance would exceed 256 bits.
    pub fn mint(
        &self,
        state: &mut impl StateAccess,
        to: Address,
        amount: U256,
    ) -> Result<TransferEvent> {
        let supply = checked_add(self.total_supply(state), amount, "token supply")?;
        let balance = checked_add(self.balance_of(state, to), amount, "token balance")?;
        state.write(StateKey::Supply(self.token), supply);
        state.write(self.balance_key(to), balance);

        tracing::debug!(token = %self.token, to = ?to, amount = %amount, "Minted");
        Ok(TransferEvent {
            token: self.token,
            from: Address::zero(),
            to,
            amount,
        })
    }

    /// Set `spender`'s allowance over `owner`'s balance to exactly `amount`.
    pub fn approve(
        &self,
        state: &mut impl StateAccess,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> ApprovalEvent {
        state.write(self.allowance_key(owner, spender), amount);
        tracing::debug!(token = %self.token, owner = ?owner, spender = ?spender, amount = %amount, "Approved");
        ApprovalEvent {
            token: self.token,
            owner,
            spender,
            amount,
        }
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance.
    ///
    /// # Errors
    /// - `InsufficientAllowance` if `spender` may not move `amount` (checked first)
    /// - `InsufficientBalance` if `from` holds less than `amount`
    /// - `ArithmeticOverflow` if the recipient balance would exceed 256 bits
    pub fn transfer_from(
        &self,
        state: &mut impl StateAccess,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TransferEvent> {
        let allowance = self.allowance(state, from, spender);
        if allowance < amount {
            return Err(SwapError::InsufficientAllowance {
                token: self.token,
                owner: from,
                needed: amount,
                available: allowance,
            });
        }

        let from_balance = self.balance_of(state, from);
        if from_balance < amount {
            return Err(SwapError::InsufficientBalance {
                asset: self.token.to_string(),
                holder: from,
                needed: amount,
                available: from_balance,
            });
        }

        if from != to {
            let to_balance = checked_add(self.balance_of(state, to), amount, "token balance")?;
            state.write(self.balance_key(from), from_balance - amount);
            state.write(self.balance_key(to), to_balance);
        }
        state.write(self.allowance_key(from, spender), allowance - amount);

        tracing::debug!(
            token = %self.token,
            from = ?from,
            to = ?to,
            amount = %amount,
            "Transferred"
        );
        Ok(TransferEvent {
            token: self.token,
            from,
            to,
            amount,
        })
    }

    fn balance_key(&self, holder: Address) -> StateKey {
        StateKey::Balance {
            token: self.token,
            holder,
        }
    }

    fn allowance_key(&self, owner: Address, spender: Address) -> StateKey {
        StateKey::Allowance {
            token: self.token,
            owner,
            spender,
        }
    }
}

pub(crate) fn checked_add(current: U256, amount: U256, what: &str) -> Result<U256> {
    current
        .checked_add(amount)
        .ok_or_else(|| SwapError::ArithmeticOverflow {
            reason: format!("{what} {current} + {amount} exceeds 256 bits"),
        })
}
