//! # openswap-codec
//!
//! The pure half of order settlement. Nothing here touches a ledger.
//!
//! - [`OrderCodec`]: canonical 208-byte order encoding, keccak-256 identity,
//!   and the digest the maker actually signs
//! - [`SignatureVerifier`]: secp256k1 signer recovery with component checks
//! - [`OrderValidator`]: every stateless check a fill must pass, in a fixed
//!   order, before the settlement executor opens a write batch
//!
//! With the `test-helpers` feature, [`MakerSigner`] signs orders with a local
//! key the way a maker's wallet would.

pub mod codec;
#[cfg(any(test, feature = "test-helpers"))]
pub mod signer;
pub mod validator;
pub mod verifier;

pub use codec::OrderCodec;
#[cfg(any(test, feature = "test-helpers"))]
pub use signer::MakerSigner;
pub use validator::{OrderValidator, ValidatedOrder};
pub use verifier::SignatureVerifier;
