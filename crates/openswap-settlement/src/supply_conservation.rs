//! Supply conservation invariant checker.
//!
//! Mathematical invariant that must hold after every committed call:
//! ```text
//! ∀ asset: Σ balances(asset) == supply(asset)
//! ```
//!
//! `supply` only moves on mint or native deposit. A fill moves balances
//! between maker and taker and must leave every sum unchanged. If the
//! invariant ever breaks, something has gone catastrophically wrong.

use std::collections::BTreeSet;

use openswap_types::{Asset, Result, SwapError, U256};

use crate::store::{StateAccess, StateKey, StateStore};

/// Audits committed state for per-asset conservation.
pub struct SupplyConservation;

impl SupplyConservation {
    /// Recorded supply for an asset.
    #[must_use]
    pub fn expected_supply(store: &StateStore, asset: &Asset) -> U256 {
        let key = match asset {
            Asset::Fungible(token) => StateKey::Supply(*token),
            Asset::NativeCurrency => StateKey::NativeSupply,
        };
        store.read(&key)
    }

    /// Sum of every holder's balance of `asset`.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` if the sum does not fit 256 bits.
    pub fn actual_supply(store: &StateStore, asset: &Asset) -> Result<U256> {
        store
            .iter()
            .filter(|(key, _)| match (key, asset) {
                (StateKey::Balance { token, .. }, Asset::Fungible(wanted)) => token == wanted,
                (StateKey::Native(_), Asset::NativeCurrency) => true,
                _ => false,
            })
            .try_fold(U256::zero(), |sum, (_, balance)| {
                sum.checked_add(*balance)
                    .ok_or_else(|| SwapError::SupplyInvariantViolation {
                        reason: format!("Asset {asset}: balances sum past 256 bits"),
                    })
            })
    }

    /// Verify that balances of `asset` sum to its recorded supply.
    ///
    /// # Errors
    /// Returns [`SwapError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(store: &StateStore, asset: &Asset) -> Result<()> {
        let actual = Self::actual_supply(store, asset)?;
        let expected = Self::expected_supply(store, asset);
        if actual != expected {
            tracing::error!(asset = %asset, actual = %actual, expected = %expected, "Supply invariant violated");
            return Err(SwapError::SupplyInvariantViolation {
                reason: format!("Asset {asset}: actual supply {actual} != expected {expected}"),
            });
        }
        Ok(())
    }

    /// Every asset with a supply or balance slot, tokens first in key order.
    #[must_use]
    pub fn tracked_assets(store: &StateStore) -> Vec<Asset> {
        let mut tokens = BTreeSet::new();
        let mut native = false;
        for (key, _) in store.iter() {
            match key {
                StateKey::Balance { token, .. } | StateKey::Supply(token) => {
                    tokens.insert(*token);
                }
                StateKey::Native(_) | StateKey::NativeSupply => native = true,
                StateKey::Filled(_) | StateKey::Allowance { .. } => {}
            }
        }
        let mut assets: Vec<Asset> = tokens.into_iter().map(Asset::Fungible).collect();
        if native {
            assets.push(Asset::NativeCurrency);
        }
        assets
    }

    /// [`Self::verify`] for every tracked asset.
    ///
    /// # Errors
    /// The first violation found.
    pub fn verify_all(store: &StateStore) -> Result<()> {
        Self::tracked_assets(store)
            .iter()
            .try_for_each(|asset| Self::verify(store, asset))
    }
}
