//! secp256k1 signer recovery.
//!
//! Recovery itself is delegated to `ethers` (k256 underneath). This module
//! only rejects component values the curve math must never see: recovery ids
//! other than 27/28 (or 0/1), scalars outside `[1, n)`, and, when configured,
//! high-s signatures.

use ethers::types::Signature;
use openswap_types::{
    Address, ExchangeConfig, H256, OrderSignature, Result, SwapError,
    constants::{DEFAULT_REQUIRE_LOW_S, RECOVERY_ID_OFFSET, SECP256K1_HALF_N, SECP256K1_N},
};

/// Recovers the address that produced a signature over a 32-byte digest.
///
/// Callers compare the result with the claimed signer; a mismatch is the
/// caller's `InvalidSignature`, not an error of this type.
#[derive(Debug, Clone, Copy)]
pub struct SignatureVerifier {
    require_low_s: bool,
}

impl SignatureVerifier {
    #[must_use]
    pub fn new(require_low_s: bool) -> Self {
        Self { require_low_s }
    }

    #[must_use]
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.require_low_s)
    }

    /// Recover the signer of `digest`.
    ///
    /// # Errors
    /// Returns [`SwapError::MalformedSignature`] for out-of-range components
    /// or when no public key can be recovered from them.
    pub fn recover(&self, digest: H256, signature: &OrderSignature) -> Result<Address> {
        let v = self.check_components(signature)?;
        let sig = Signature {
            r: signature.r_scalar(),
            s: signature.s_scalar(),
            v: u64::from(v),
        };
        sig.recover(digest).map_err(|e| malformed(&format!("recovery failed: {e}")))
    }

    /// Validate component ranges and return the normalised `v` (27 or 28).
    ///
    /// # Errors
    /// Returns [`SwapError::MalformedSignature`] naming the first bad component.
    pub fn check_components(&self, signature: &OrderSignature) -> Result<u8> {
        let v = match signature.v {
            0 | 1 => signature.v + RECOVERY_ID_OFFSET,
            27 | 28 => signature.v,
            other => return Err(malformed(&format!("recovery id {other} out of range"))),
        };

        let r = signature.r_scalar();
        let s = signature.s_scalar();
        if r.is_zero() || r >= SECP256K1_N {
            return Err(malformed("r outside [1, n)"));
        }
        if s.is_zero() || s >= SECP256K1_N {
            return Err(malformed("s outside [1, n)"));
        }
        if self.require_low_s && s > SECP256K1_HALF_N {
            return Err(malformed("s is in the upper half of the curve order"));
        }
        Ok(v)
    }
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_REQUIRE_LOW_S)
    }
}

fn malformed(reason: &str) -> SwapError {
    SwapError::MalformedSignature {
        reason: reason.to_string(),
    }
}
