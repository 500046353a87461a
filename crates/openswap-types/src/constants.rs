//! System-wide constants for the OpenSwap settlement engine.

use crate::U256;

/// Width of an address field in the order encoding.
pub const ADDRESS_WIDTH: usize = 20;

/// Width of an integer field (amounts, expiration, nonce) in the order encoding.
pub const WORD_WIDTH: usize = 32;

/// Length of the canonical order encoding: 4 addresses + 4 words.
pub const ENCODED_ORDER_LEN: usize = 4 * ADDRESS_WIDTH + 4 * WORD_WIDTH;

/// Order of the secp256k1 group, `n`.
pub const SECP256K1_N: U256 = U256([
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
]);

/// `n / 2`, the upper bound for a canonical (low-s) signature.
pub const SECP256K1_HALF_N: U256 = U256([
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
]);

/// Offset added to the recovery id by wallets (`v = 27 + recid`).
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Reject high-s signatures by default.
pub const DEFAULT_REQUIRE_LOW_S: bool = true;

/// Maker and taker must differ by default.
pub const DEFAULT_ALLOW_SELF_FILL: bool = false;

/// Domain tag for the settlement state root.
pub const STATE_ROOT_DOMAIN: &[u8] = b"openswap:state_root:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenSwap";
