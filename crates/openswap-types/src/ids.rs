//! Identifiers used throughout OpenSwap.
//!
//! Orders have no server-assigned ID: an order *is* its content, so its
//! identity is the keccak-256 digest of its canonical encoding. Token ledgers
//! are referenced by their 20-byte address.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use ethers::types::{Address, H256, U256};

// ---------------------------------------------------------------------------
// OrderHash
// ---------------------------------------------------------------------------

/// Deterministic order identity: keccak-256 over the canonical encoding of
/// the order's 8 fields. Doubles as the fill ledger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub H256);

impl OrderHash {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(H256(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_fixed_bytes()
    }

    /// First 4 bytes as hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0.as_bytes()[..4])
    }
}

impl From<[u8; 32]> for OrderHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// TokenHandle
// ---------------------------------------------------------------------------

/// Reference to an external fungible-token ledger, by its address.
///
/// The zero address is reserved as the native-currency sentinel in the order
/// encoding and is rejected by [`crate::Order::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TokenHandle(pub Address);

impl TokenHandle {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Address> for TokenHandle {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for TokenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token:0x{}", hex::encode(self.0.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
