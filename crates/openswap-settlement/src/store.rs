//! Ordered key-value state with write-batch semantics.
//!
//! All durable state of the settlement engine (fill amounts, token balances,
//! allowances, supplies, native balances) lives in one [`StateStore`]. A
//! `fill` never writes to it directly: it stages writes in a [`WriteBatch`]
//! overlay and the executor applies the resulting [`ChangeSet`] only once
//! every step has succeeded. Dropping the batch is the rollback.
//!
//! Zero values are never stored, so two stores holding the same logical
//! state always have the same [`StateStore::state_root`].

use std::collections::BTreeMap;

use openswap_types::{Address, OrderHash, TokenHandle, U256, constants::STATE_ROOT_DOMAIN};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Every slot the engine can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateKey {
    /// Cumulative taker-side amount filled for an order identity.
    Filled(OrderHash),
    Balance {
        token: TokenHandle,
        holder: Address,
    },
    Allowance {
        token: TokenHandle,
        owner: Address,
        spender: Address,
    },
    /// Total minted supply of a token.
    Supply(TokenHandle),
    /// Native-currency balance.
    Native(Address),
    NativeSupply,
}

impl StateKey {
    /// Stable byte encoding fed into the state root.
    fn write_to(&self, hasher: &mut Sha256) {
        match self {
            Self::Filled(order_hash) => {
                hasher.update([0x01]);
                hasher.update(order_hash.as_bytes());
            }
            Self::Balance { token, holder } => {
                hasher.update([0x02]);
                hasher.update(token.address().as_bytes());
                hasher.update(holder.as_bytes());
            }
            Self::Allowance {
                token,
                owner,
                spender,
            } => {
                hasher.update([0x03]);
                hasher.update(token.address().as_bytes());
                hasher.update(owner.as_bytes());
                hasher.update(spender.as_bytes());
            }
            Self::Supply(token) => {
                hasher.update([0x04]);
                hasher.update(token.address().as_bytes());
            }
            Self::Native(holder) => {
                hasher.update([0x05]);
                hasher.update(holder.as_bytes());
            }
            Self::NativeSupply => hasher.update([0x06]),
        }
    }
}

/// Read/write access to engine state. Absent slots read as zero.
pub trait StateAccess {
    fn read(&self, key: &StateKey) -> U256;
    fn write(&mut self, key: StateKey, value: U256);
}

/// The committed state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStore {
    entries: BTreeMap<StateKey, U256>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-zero slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-zero slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &U256)> {
        self.entries.iter()
    }

    /// Open a write batch over the current committed state.
    #[must_use]
    pub fn batch(&self) -> WriteBatch<'_> {
        WriteBatch {
            base: self,
            pending: BTreeMap::new(),
        }
    }

    /// Apply a change set produced by [`WriteBatch::into_changes`].
    pub fn apply(&mut self, changes: ChangeSet) {
        let count = changes.len();
        for (key, value) in changes.0 {
            self.write(key, value);
        }
        tracing::debug!(slots = count, entries = self.entries.len(), "Applied change set");
    }

    /// SHA-256 commitment over every non-zero slot, in key order.
    #[must_use]
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(STATE_ROOT_DOMAIN);
        hasher.update((self.entries.len() as u64).to_le_bytes());

        let mut word = [0u8; 32];
        for (key, value) in &self.entries {
            key.write_to(&mut hasher);
            value.to_big_endian(&mut word);
            hasher.update(word);
        }

        let result = hasher.finalize();
        let mut root = [0u8; 32];
        root.copy_from_slice(&result);
        root
    }

    /// [`Self::state_root`] as lowercase hex.
    #[must_use]
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

impl StateAccess for StateStore {
    fn read(&self, key: &StateKey) -> U256 {
        self.entries.get(key).copied().unwrap_or_default()
    }

    fn write(&mut self, key: StateKey, value: U256) {
        if value.is_zero() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }
}

/// Staged writes over a borrowed [`StateStore`]. Reads see staged values
/// first. Nothing reaches the store until the change set is applied.
#[derive(Debug)]
pub struct WriteBatch<'a> {
    base: &'a StateStore,
    pending: BTreeMap<StateKey, U256>,
}

impl WriteBatch<'_> {
    /// Number of staged slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Release the borrow on the store, keeping the staged writes.
    #[must_use]
    pub fn into_changes(self) -> ChangeSet {
        ChangeSet(self.pending)
    }
}

impl StateAccess for WriteBatch<'_> {
    fn read(&self, key: &StateKey) -> U256 {
        match self.pending.get(key) {
            Some(value) => *value,
            None => self.base.read(key),
        }
    }

    fn write(&mut self, key: StateKey, value: U256) {
        self.pending.insert(key, value);
    }
}

/// Writes staged by a finished [`WriteBatch`], ready to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(BTreeMap<StateKey, U256>);

impl ChangeSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
