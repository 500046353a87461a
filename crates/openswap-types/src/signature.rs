//! Recoverable ECDSA signature components as submitted with a fill.
//!
//! The maker's wallet returns a 65-byte `r ‖ s ‖ v` signature; the fill call
//! carries it split into its `v`, `r`, `s` components.

use serde::{Deserialize, Serialize};

use crate::{H256, Result, SwapError, U256};

/// The `(v, r, s)` triple of a secp256k1 recoverable signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderSignature {
    /// Recovery id, `27`/`28` (or `0`/`1`).
    pub v: u8,
    pub r: H256,
    pub s: H256,
}

impl OrderSignature {
    #[must_use]
    pub fn new(v: u8, r: H256, s: H256) -> Self {
        Self { v, r, s }
    }

    /// Split a 65-byte `r ‖ s ‖ v` signature into components.
    ///
    /// # Errors
    /// Returns [`SwapError::MalformedSignature`] if `bytes` is not 65 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(SwapError::MalformedSignature {
                reason: format!("expected 65 signature bytes, got {}", bytes.len()),
            });
        }
        Ok(Self {
            r: H256::from_slice(&bytes[..32]),
            s: H256::from_slice(&bytes[32..64]),
            v: bytes[64],
        })
    }

    /// Concatenate back into `r ‖ s ‖ v`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(self.r.as_bytes());
        out[32..64].copy_from_slice(self.s.as_bytes());
        out[64] = self.v;
        out
    }

    #[must_use]
    pub fn r_scalar(&self) -> U256 {
        U256::from_big_endian(self.r.as_bytes())
    }

    #[must_use]
    pub fn s_scalar(&self) -> U256 {
        U256::from_big_endian(self.s.as_bytes())
    }
}

impl TryFrom<ethers::types::Signature> for OrderSignature {
    type Error = SwapError;

    /// # Errors
    /// [`SwapError::MalformedSignature`] if `v` does not fit a byte, as with
    /// EIP-155 chain-encoded recovery ids.
    fn try_from(sig: ethers::types::Signature) -> Result<Self> {
        let v = u8::try_from(sig.v).map_err(|_| SwapError::MalformedSignature {
            reason: format!("recovery id {} does not fit a byte", sig.v),
        })?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        sig.r.to_big_endian(&mut r);
        sig.s.to_big_endian(&mut s);
        Ok(Self {
            v,
            r: H256(r),
            s: H256(s),
        })
    }
}
