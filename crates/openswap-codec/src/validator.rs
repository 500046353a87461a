//! Pre-settlement order checks.
//!
//! Everything here is pure: the validator reads the order, the signature, the
//! caller context and the substrate time, and either returns the order's
//! identity or the first failing check. No ledger is touched, so a rejection
//! at this stage never needs rolling back.
//!
//! Check order matters for error reporting and is fixed:
//! 1. shape + identity (`InvalidOrder`)
//! 2. expiry (`OrderExpired`)
//! 3. signature binding (`MalformedSignature` / `InvalidSignature`)
//! 4. caller is the taker (`UnauthorizedTaker`), maker ≠ taker (`SelfFill`)
//! 5. asset legs settleable (`UnsupportedAssetCombination`, `UnexpectedValue`)

use openswap_types::{
    Address, Asset, ExchangeConfig, Order, OrderHash, OrderSignature, Result, SigningScheme,
    SwapError, TokenHandle, U256,
};

use crate::{codec::OrderCodec, verifier::SignatureVerifier};

/// An order that passed every stateless check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub order_hash: OrderHash,
    /// The maker leg is always a token ledger.
    pub maker_token: TokenHandle,
}

/// Stateless gate in front of the settlement executor.
#[derive(Debug, Clone, Copy)]
pub struct OrderValidator {
    verifier: SignatureVerifier,
    scheme: SigningScheme,
    allow_self_fill: bool,
}

impl OrderValidator {
    #[must_use]
    pub fn new(config: &ExchangeConfig) -> Self {
        Self {
            verifier: SignatureVerifier::from_config(config),
            scheme: config.signing_scheme,
            allow_self_fill: config.allow_self_fill,
        }
    }

    /// Run every stateless check for a fill submitted by `caller` at
    /// substrate time `now` with `attached_value` native units.
    ///
    /// # Errors
    /// The first failing check, in the order listed in the module docs.
    pub fn validate(
        &self,
        order: &Order,
        signature: &OrderSignature,
        caller: Address,
        attached_value: U256,
        now: u64,
    ) -> Result<ValidatedOrder> {
        let order_hash = OrderCodec::identity(order)?;

        if order.is_expired_at(now) {
            return Err(SwapError::OrderExpired {
                expiration: order.expiration,
                now,
            });
        }

        self.check_signature(order, &order_hash, signature)?;

        if caller != order.taker {
            return Err(SwapError::UnauthorizedTaker {
                caller,
                taker: order.taker,
            });
        }
        if !self.allow_self_fill && order.maker == order.taker {
            return Err(SwapError::SelfFill(order.maker));
        }

        let Asset::Fungible(maker_token) = order.maker_asset else {
            return Err(SwapError::UnsupportedAssetCombination {
                reason: "maker leg must be a fungible token, not native currency".to_string(),
            });
        };
        if !order.taker_asset.is_native() && !attached_value.is_zero() {
            return Err(SwapError::UnexpectedValue {
                attached: attached_value,
            });
        }

        tracing::debug!(
            order = %order_hash,
            maker = ?order.maker,
            taker = ?order.taker,
            "Order passed pre-settlement checks"
        );

        Ok(ValidatedOrder {
            order_hash,
            maker_token,
        })
    }

    /// Require that the maker signed `order_hash` under the configured scheme.
    ///
    /// # Errors
    /// - `MalformedSignature` for out-of-range components
    /// - `InvalidSignature` when the recovered address is not the maker
    pub fn check_signature(
        &self,
        order: &Order,
        order_hash: &OrderHash,
        signature: &OrderSignature,
    ) -> Result<()> {
        let digest = OrderCodec::signing_digest(order_hash, self.scheme);
        let recovered = self.verifier.recover(digest, signature)?;
        if recovered != order.maker {
            return Err(SwapError::InvalidSignature {
                recovered,
                maker: order.maker,
            });
        }
        Ok(())
    }
}

impl Default for OrderValidator {
    fn default() -> Self {
        Self::new(&ExchangeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::MakerSigner;

    const NOW: u64 = 1_700_000_000;

    struct Fixture {
        signer: MakerSigner,
        taker: Address,
        order: Order,
    }

    fn fixture() -> Fixture {
        let signer = MakerSigner::random(SigningScheme::EthSignedMessage);
        let taker = Address::repeat_byte(0x02);
        let mut order = Order::dummy(
            signer.address(),
            250,
            Address::repeat_byte(0xA0),
            taker,
            750,
            Address::repeat_byte(0xB0),
        );
        order.expiration = U256::from(NOW + 60);
        Fixture {
            signer,
            taker,
            order,
        }
    }

    fn run(f: &Fixture, order: &Order, caller: Address, value: u64, now: u64) -> Result<ValidatedOrder> {
        let sig = f.signer.sign_order(&f.order).unwrap();
        OrderValidator::default().validate(order, &sig, caller, U256::from(value), now)
    }

    #[test]
    fn valid_order_returns_identity() {
        let f = fixture();
        let validated = run(&f, &f.order, f.taker, 0, NOW).unwrap();
        assert_eq!(validated.order_hash, OrderCodec::identity(&f.order).unwrap());
        assert_eq!(validated.maker_token, TokenHandle::new(Address::repeat_byte(0xA0)));
    }

    #[test]
    fn expired_at_and_after_expiration() {
        let f = fixture();
        for now in [NOW + 60, NOW + 61, u64::MAX] {
            let err = run(&f, &f.order, f.taker, 0, now).unwrap_err();
            assert!(matches!(err, SwapError::OrderExpired { .. }), "now={now}");
        }
        assert!(run(&f, &f.order, f.taker, 0, NOW + 59).is_ok());
    }

    #[test]
    fn tampered_amount_fails_signature() {
        let f = fixture();
        let mut tampered = f.order.clone();
        tampered.taker_amount = U256::from(751);
        let err = run(&f, &tampered, f.taker, 0, NOW).unwrap_err();
        assert!(matches!(err, SwapError::InvalidSignature { .. }));
    }

    #[test]
    fn signature_from_other_key_fails() {
        let f = fixture();
        let impostor = MakerSigner::random(SigningScheme::EthSignedMessage);
        let sig = impostor.sign_order(&f.order).unwrap();
        let err = OrderValidator::default()
            .validate(&f.order, &sig, f.taker, U256::zero(), NOW)
            .unwrap_err();
        assert!(matches!(err, SwapError::InvalidSignature { .. }));
    }

    #[test]
    fn caller_must_be_taker() {
        let f = fixture();
        let err = run(&f, &f.order, Address::repeat_byte(0x99), 0, NOW).unwrap_err();
        assert!(matches!(err, SwapError::UnauthorizedTaker { .. }));
    }

    #[test]
    fn self_fill_rejected_unless_allowed() {
        let signer = MakerSigner::random(SigningScheme::EthSignedMessage);
        let me = signer.address();
        let order = Order::dummy(me, 1, Address::repeat_byte(0xA0), me, 1, Address::repeat_byte(0xB0));
        let sig = signer.sign_order(&order).unwrap();

        let err = OrderValidator::default()
            .validate(&order, &sig, me, U256::zero(), NOW)
            .unwrap_err();
        assert!(matches!(err, SwapError::SelfFill(_)));

        let permissive = OrderValidator::new(&ExchangeConfig {
            allow_self_fill: true,
            ..ExchangeConfig::default()
        });
        assert!(permissive.validate(&order, &sig, me, U256::zero(), NOW).is_ok());
    }

    #[test]
    fn native_maker_leg_unsupported() {
        let mut f = fixture();
        f.order.maker_asset = Asset::NativeCurrency;
        let err = run(&f, &f.order, f.taker, 0, NOW).unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedAssetCombination { .. }));
    }

    #[test]
    fn value_on_token_leg_rejected() {
        let f = fixture();
        let err = run(&f, &f.order, f.taker, 5, NOW).unwrap_err();
        assert!(matches!(err, SwapError::UnexpectedValue { .. }));
    }

    #[test]
    fn value_on_native_leg_passes_stateless_checks() {
        let mut f = fixture();
        f.order.taker_asset = Asset::NativeCurrency;
        assert!(run(&f, &f.order, f.taker, 750, NOW).is_ok());
    }

    #[test]
    fn raw_digest_scheme_must_match_config() {
        let signer = MakerSigner::random(SigningScheme::RawDigest);
        let taker = Address::repeat_byte(0x02);
        let order = Order::dummy(signer.address(), 1, Address::repeat_byte(0xA0), taker, 1, Address::repeat_byte(0xB0));
        let sig = signer.sign_order(&order).unwrap();

        let eth = OrderValidator::default();
        assert!(matches!(
            eth.validate(&order, &sig, taker, U256::zero(), NOW).unwrap_err(),
            SwapError::InvalidSignature { .. }
        ));

        let raw = OrderValidator::new(&ExchangeConfig {
            signing_scheme: SigningScheme::RawDigest,
            ..ExchangeConfig::default()
        });
        assert!(raw.validate(&order, &sig, taker, U256::zero(), NOW).is_ok());
    }
}
