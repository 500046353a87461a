//! Canonical order encoding and identity.
//!
//! The layout is the tightly packed concatenation of the 8 order fields,
//! byte-for-byte what Solidity's
//! `abi.encodePacked(address,uint256,address,address,uint256,address,uint256,uint256)`
//! produces:
//!
//! ```text
//! offset  width  field
//!      0     20  maker
//!     20     32  maker_amount   (big-endian)
//!     52     20  maker_asset    (token address, or 20 zero bytes for native)
//!     72     20  taker
//!     92     32  taker_amount
//!    124     20  taker_asset
//!    144     32  expiration
//!    176     32  nonce
//! ```
//!
//! Any divergence from this layout silently breaks every signature check, so
//! the sentinel for [`Asset::NativeCurrency`] lives here and nowhere else.

use ethers::utils::{hash_message, keccak256};
use openswap_types::{
    Address, Asset, H256, Order, OrderHash, Result, SigningScheme, U256,
    constants::{ADDRESS_WIDTH, ENCODED_ORDER_LEN, WORD_WIDTH},
};

/// Stateless order encoder.
pub struct OrderCodec;

impl OrderCodec {
    /// Encode the order into its fixed 208-byte layout.
    ///
    /// # Errors
    /// Returns `InvalidOrder` if the order fails [`Order::validate`].
    pub fn encode(order: &Order) -> Result<[u8; ENCODED_ORDER_LEN]> {
        order.validate()?;

        let mut out = Packed::default();
        out.address(order.maker);
        out.word(order.maker_amount);
        out.address(Self::asset_address(&order.maker_asset));
        out.address(order.taker);
        out.word(order.taker_amount);
        out.address(Self::asset_address(&order.taker_asset));
        out.word(order.expiration);
        out.word(order.nonce);
        Ok(out.finish())
    }

    /// keccak-256 over [`Self::encode`]: the order's identity.
    ///
    /// # Errors
    /// Returns `InvalidOrder` if the order fails [`Order::validate`].
    pub fn identity(order: &Order) -> Result<OrderHash> {
        Ok(OrderHash::from_bytes(keccak256(Self::encode(order)?)))
    }

    /// The digest the maker's wallet actually signs for `order_hash`.
    #[must_use]
    pub fn signing_digest(order_hash: &OrderHash, scheme: SigningScheme) -> H256 {
        match scheme {
            SigningScheme::EthSignedMessage => hash_message(order_hash.as_bytes()),
            SigningScheme::RawDigest => order_hash.0,
        }
    }

    /// Address-width encoding of an asset leg. Native currency is the
    /// all-zero address.
    #[must_use]
    pub fn asset_address(asset: &Asset) -> Address {
        match asset {
            Asset::Fungible(token) => token.address(),
            Asset::NativeCurrency => Address::zero(),
        }
    }
}

/// Fixed-capacity writer for the packed layout.
struct Packed {
    buf: [u8; ENCODED_ORDER_LEN],
    at: usize,
}

impl Default for Packed {
    fn default() -> Self {
        Self {
            buf: [0u8; ENCODED_ORDER_LEN],
            at: 0,
        }
    }
}

impl Packed {
    fn address(&mut self, address: Address) {
        self.buf[self.at..self.at + ADDRESS_WIDTH].copy_from_slice(address.as_bytes());
        self.at += ADDRESS_WIDTH;
    }

    fn word(&mut self, value: U256) {
        value.to_big_endian(&mut self.buf[self.at..self.at + WORD_WIDTH]);
        self.at += WORD_WIDTH;
    }

    fn finish(self) -> [u8; ENCODED_ORDER_LEN] {
        debug_assert_eq!(self.at, ENCODED_ORDER_LEN, "packed order layout is incomplete");
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use openswap_types::SwapError;

    use super::*;

    fn key1_address() -> Address {
        "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap()
    }

    fn key2_address() -> Address {
        "0x2b5ad5c4795c026514f8317c7a215e218dccd6cf".parse().unwrap()
    }

    fn token_order() -> Order {
        Order {
            maker: key1_address(),
            maker_amount: U256::from(250),
            maker_asset: Asset::fungible(Address::repeat_byte(0x11)),
            taker: key2_address(),
            taker_amount: U256::from(750),
            taker_asset: Asset::fungible(Address::repeat_byte(0x22)),
            expiration: U256::from(1_700_000_000u64),
            nonce: U256::one(),
        }
    }

    fn native_order() -> Order {
        Order {
            maker_amount: U256::from(750),
            taker_asset: Asset::NativeCurrency,
            ..token_order()
        }
    }

    fn h256(hex_str: &str) -> H256 {
        hex_str.parse().unwrap()
    }

    #[test]
    fn encoding_is_208_bytes_with_fields_at_fixed_offsets() {
        let bytes = OrderCodec::encode(&token_order()).unwrap();
        assert_eq!(bytes.len(), 208);
        assert_eq!(&bytes[0..20], key1_address().as_bytes());
        assert_eq!(bytes[50], 0x00);
        assert_eq!(bytes[51], 250);
        assert_eq!(&bytes[52..72], &[0x11; 20]);
        assert_eq!(&bytes[72..92], key2_address().as_bytes());
        // 750 = 0x02EE
        assert_eq!(&bytes[122..124], &[0x02, 0xEE]);
        assert_eq!(&bytes[124..144], &[0x22; 20]);
        assert_eq!(bytes[207], 1);
    }

    #[test]
    fn native_leg_encodes_as_zero_address() {
        let bytes = OrderCodec::encode(&native_order()).unwrap();
        assert_eq!(&bytes[124..144], &[0u8; 20]);
    }

    #[test]
    fn identity_matches_reference_vector() {
        // keccak256(abi.encodePacked(...)) computed independently.
        assert_eq!(
            OrderCodec::identity(&token_order()).unwrap().0,
            h256("0xc2368c9eb81f8a3a770a26c3d6caf513e3588913545d557e48a3ccb53a8644de")
        );
        assert_eq!(
            OrderCodec::identity(&native_order()).unwrap().0,
            h256("0xee0bb1b643968f50302d290a36c90750012f602a58112d7c7947cf4b15330308")
        );
    }

    #[test]
    fn eth_signed_digest_matches_reference_vector() {
        let hash = OrderCodec::identity(&token_order()).unwrap();
        assert_eq!(
            OrderCodec::signing_digest(&hash, SigningScheme::EthSignedMessage),
            h256("0x44af733eec440335e95f1eee141d38fdeeb14af82408bcddf378dcf03c1f1f2e")
        );
        assert_eq!(OrderCodec::signing_digest(&hash, SigningScheme::RawDigest), hash.0);
    }

    #[test]
    fn identical_orders_share_identity() {
        assert_eq!(
            OrderCodec::identity(&token_order()).unwrap(),
            OrderCodec::identity(&token_order()).unwrap()
        );
    }

    #[test]
    fn nonce_disambiguates() {
        let mut other = token_order();
        other.nonce = U256::from(2);
        assert_ne!(
            OrderCodec::identity(&token_order()).unwrap(),
            OrderCodec::identity(&other).unwrap()
        );
    }

    #[test]
    fn every_field_changes_identity() {
        let base = OrderCodec::identity(&token_order()).unwrap();
        let mutations: [fn(&mut Order); 8] = [
            |o| o.maker = Address::repeat_byte(0x09),
            |o| o.maker_amount += U256::one(),
            |o| o.maker_asset = Asset::fungible(Address::repeat_byte(0x33)),
            |o| o.taker = Address::repeat_byte(0x0A),
            |o| o.taker_amount += U256::one(),
            |o| o.taker_asset = Asset::NativeCurrency,
            |o| o.expiration += U256::one(),
            |o| o.nonce += U256::one(),
        ];
        for mutate in mutations {
            let mut order = token_order();
            mutate(&mut order);
            assert_ne!(OrderCodec::identity(&order).unwrap(), base, "{order:?}");
        }
    }

    #[test]
    fn malformed_order_is_rejected_before_encoding() {
        let mut order = token_order();
        order.taker_amount = U256::zero();
        assert!(matches!(
            OrderCodec::encode(&order).unwrap_err(),
            SwapError::InvalidOrder { .. }
        ));
    }
}
