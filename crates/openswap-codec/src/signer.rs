//! Maker-side order signing, for tests and local tooling only.
//!
//! In production the maker's own wallet signs; the engine never holds keys.
//! This mirrors what such a wallet does so tests can produce real signatures.

use ethers::signers::{LocalWallet, Signer};
use openswap_types::{Address, Order, OrderSignature, Result, SigningScheme, SwapError};

use crate::codec::OrderCodec;

/// A throwaway maker key that signs orders under a given scheme.
#[derive(Debug, Clone)]
pub struct MakerSigner {
    wallet: LocalWallet,
    scheme: SigningScheme,
}

impl MakerSigner {
    /// Fresh random key.
    #[must_use]
    pub fn random(scheme: SigningScheme) -> Self {
        Self {
            wallet: LocalWallet::new(&mut rand::thread_rng()),
            scheme,
        }
    }

    /// Key from a hex private key (with or without `0x`).
    ///
    /// # Errors
    /// Returns [`SwapError::Configuration`] if the key does not parse.
    pub fn from_private_key(key_hex: &str, scheme: SigningScheme) -> Result<Self> {
        let wallet = key_hex
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| SwapError::Configuration(format!("invalid private key: {e}")))?;
        Ok(Self { wallet, scheme })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Sign the order's identity the way the maker's wallet would.
    ///
    /// # Errors
    /// Returns `InvalidOrder` for orders that cannot be encoded, or
    /// `MalformedSignature` if the key fails to sign.
    pub fn sign_order(&self, order: &Order) -> Result<OrderSignature> {
        let order_hash = OrderCodec::identity(order)?;
        let digest = OrderCodec::signing_digest(&order_hash, self.scheme);
        let signature = self
            .wallet
            .sign_hash(digest)
            .map_err(|e| SwapError::MalformedSignature {
                reason: format!("signing failed: {e}"),
            })?;
        OrderSignature::try_from(signature)
    }
}
