//! The settlement executor.
//!
//! A `fill` call runs in two phases:
//! 1. Stateless checks through [`OrderValidator`]: order shape, expiry,
//!    maker signature, taker binding, asset legs
//! 2. Staged settlement in a [`WriteBatch`]: the fill ledger is advanced,
//!    attached native value is debited from the caller, and both legs are
//!    transferred
//!
//! The batch is applied to the store only if every step succeeded. Any error
//! drops it, so fill amounts, balances, allowances and native value are
//! exactly as they were before the call.

use openswap_codec::{OrderCodec, OrderValidator};
use openswap_types::{
    Address, ApprovalEvent, Asset, ExchangeConfig, FillEvent, FillState, Order, OrderHash,
    OrderSignature, Result, SwapError, TokenHandle, TransferEvent, U256,
    constants::{ENGINE_NAME, VERSION},
};

use crate::{
    clock::{Clock, SystemClock},
    fill_ledger::FillLedger,
    native::NativeLedger,
    store::{ChangeSet, StateStore, WriteBatch},
    supply_conservation::SupplyConservation,
    token_ledger::TokenLedger,
};

/// Settles signed orders against the token and native ledgers it owns.
///
/// `address` is the executor's own identity: makers and takers approve it as
/// spender on their token ledgers.
pub struct SettlementExecutor<C: Clock = SystemClock> {
    address: Address,
    config: ExchangeConfig,
    validator: OrderValidator,
    clock: C,
    store: StateStore,
    events: Vec<FillEvent>,
    transfers: Vec<TransferEvent>,
}

/// Everything a successful fill commits.
struct StagedFill {
    changes: ChangeSet,
    event: FillEvent,
    transfers: Vec<TransferEvent>,
}

impl SettlementExecutor<SystemClock> {
    /// Executor judging expiry against wall-clock time.
    #[must_use]
    pub fn with_system_clock(address: Address, config: ExchangeConfig) -> Self {
        Self::new(address, config, SystemClock)
    }
}

impl<C: Clock> SettlementExecutor<C> {
    #[must_use]
    pub fn new(address: Address, config: ExchangeConfig, clock: C) -> Self {
        tracing::info!(
            engine = ENGINE_NAME,
            version = VERSION,
            executor = ?address,
            signing_scheme = %config.signing_scheme,
            require_low_s = config.require_low_s,
            allow_self_fill = config.allow_self_fill,
            "Settlement executor started"
        );
        Self {
            address,
            validator: OrderValidator::new(&config),
            config,
            clock,
            store: StateStore::new(),
            events: Vec::new(),
            transfers: Vec::new(),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // =================================================================
    // Fill
    // =================================================================

    /// Settle up to `requested_taker_amount` of `order` for `caller`.
    ///
    /// `attached_value` is the native currency sent with the call. It must
    /// be zero for a token taker leg and equal the settled taker amount for
    /// a native one.
    ///
    /// # Errors
    /// Any [`SwapError`]; on error no state has changed.
    pub fn fill(
        &mut self,
        order: &Order,
        signature: &OrderSignature,
        caller: Address,
        attached_value: U256,
        requested_taker_amount: U256,
    ) -> Result<FillEvent> {
        let now = self.clock.now();
        match self.settle(order, signature, caller, attached_value, requested_taker_amount, now) {
            Ok(StagedFill {
                changes,
                event,
                transfers,
            }) => {
                self.store.apply(changes);
                self.transfers.extend(transfers);
                tracing::info!(
                    order = %event.order_hash,
                    maker = ?event.maker,
                    taker = ?event.taker,
                    filled_maker = %event.filled_maker,
                    filled_taker = %event.filled_taker,
                    "Fill settled"
                );
                self.events.push(event.clone());
                Ok(event)
            }
            Err(err) => {
                tracing::warn!(
                    code = err.code(),
                    caller = ?caller,
                    maker = ?order.maker,
                    error = %err,
                    "Fill rejected"
                );
                Err(err)
            }
        }
    }

    /// Stage every write of a fill without touching committed state.
    fn settle(
        &self,
        order: &Order,
        signature: &OrderSignature,
        caller: Address,
        attached_value: U256,
        requested_taker_amount: U256,
        now: u64,
    ) -> Result<StagedFill> {
        let validated = self
            .validator
            .validate(order, signature, caller, attached_value, now)?;
        let order_hash = validated.order_hash;

        let mut batch = self.store.batch();
        let filled_taker = FillLedger::record_fill(
            &mut batch,
            &order_hash,
            order.taker_amount,
            requested_taker_amount,
        )?;
        if !attached_value.is_zero() {
            NativeLedger::debit(&mut batch, caller, attached_value)?;
        }
        let filled_maker = order.proportional_maker_amount(filled_taker)?;
        if filled_maker.is_zero() {
            return Err(SwapError::InvalidFillAmount {
                reason: format!(
                    "{filled_taker} taker units buy zero maker units at {}:{}",
                    order.maker_amount, order.taker_amount
                ),
            });
        }

        let mut transfers = vec![TokenLedger::new(validated.maker_token).transfer_from(
            &mut batch,
            self.address,
            order.maker,
            order.taker,
            filled_maker,
        )?];
        transfers.extend(self.settle_taker_leg(&mut batch, order, attached_value, filled_taker)?);

        let event = FillEvent {
            order_hash,
            maker: order.maker,
            taker: order.taker,
            maker_asset: order.maker_asset,
            taker_asset: order.taker_asset,
            filled_maker,
            filled_taker,
            timestamp: now,
        };
        Ok(StagedFill {
            changes: batch.into_changes(),
            event,
            transfers,
        })
    }

    /// Taker to maker. A native leg moves value, not tokens, so it yields no
    /// transfer event.
    fn settle_taker_leg(
        &self,
        batch: &mut WriteBatch<'_>,
        order: &Order,
        attached_value: U256,
        filled_taker: U256,
    ) -> Result<Option<TransferEvent>> {
        match order.taker_asset {
            Asset::Fungible(token) => TokenLedger::new(token)
                .transfer_from(batch, self.address, order.taker, order.maker, filled_taker)
                .map(Some),
            Asset::NativeCurrency => {
                if attached_value != filled_taker {
                    return Err(SwapError::InsufficientValue {
                        attached: attached_value,
                        required: filled_taker,
                    });
                }
                NativeLedger::credit(batch, order.maker, filled_taker)?;
                Ok(None)
            }
        }
    }

    // =================================================================
    // Queries
    // =================================================================

    /// Taker-side amount still fillable.
    ///
    /// # Errors
    /// `InvalidOrder` if the order cannot be hashed.
    pub fn remaining(&self, order: &Order) -> Result<U256> {
        let order_hash = OrderCodec::identity(order)?;
        Ok(FillLedger::remaining(&self.store, &order_hash, order.taker_amount))
    }

    #[must_use]
    pub fn filled(&self, order_hash: &OrderHash) -> U256 {
        FillLedger::filled(&self.store, order_hash)
    }

    /// # Errors
    /// `InvalidOrder` if the order cannot be hashed.
    pub fn fill_state(&self, order: &Order) -> Result<FillState> {
        let order_hash = OrderCodec::identity(order)?;
        Ok(FillLedger::fill_state(&self.store, &order_hash, order.taker_amount))
    }

    /// Committed fills, oldest first.
    #[must_use]
    pub fn events(&self) -> &[FillEvent] {
        &self.events
    }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<FillEvent> {
        std::mem::take(&mut self.events)
    }

    /// Token movements committed by mints and fills, oldest first.
    #[must_use]
    pub fn transfers(&self) -> &[TransferEvent] {
        &self.transfers
    }

    #[must_use]
    pub fn state_root(&self) -> [u8; 32] {
        self.store.state_root()
    }

    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Check that balances of `asset` sum to its supply.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` if they do not.
    pub fn verify_supply(&self, asset: &Asset) -> Result<()> {
        SupplyConservation::verify(&self.store, asset)
    }

    #[must_use]
    pub fn balance_of(&self, asset: &Asset, holder: Address) -> U256 {
        match asset {
            Asset::Fungible(token) => TokenLedger::new(*token).balance_of(&self.store, holder),
            Asset::NativeCurrency => NativeLedger::balance_of(&self.store, holder),
        }
    }

    #[must_use]
    pub fn total_supply(&self, asset: &Asset) -> U256 {
        match asset {
            Asset::Fungible(token) => TokenLedger::new(*token).total_supply(&self.store),
            Asset::NativeCurrency => NativeLedger::total_supply(&self.store),
        }
    }

    #[must_use]
    pub fn allowance(&self, token: TokenHandle, owner: Address, spender: Address) -> U256 {
        TokenLedger::new(token).allowance(&self.store, owner, spender)
    }

    // =================================================================
    // Host-side setup
    // =================================================================

    /// Mint `amount` of `token` to `to`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` on supply or balance overflow.
    pub fn mint(&mut self, token: TokenHandle, to: Address, amount: U256) -> Result<TransferEvent> {
        let event = TokenLedger::new(token).mint(&mut self.store, to, amount)?;
        self.transfers.push(event.clone());
        Ok(event)
    }

    /// `owner` approves this executor to move `amount` of `token`.
    pub fn approve(&mut self, token: TokenHandle, owner: Address, amount: U256) -> ApprovalEvent {
        TokenLedger::new(token).approve(&mut self.store, owner, self.address, amount)
    }

    /// Credit native currency to `to`.
    ///
    /// # Errors
    /// `ArithmeticOverflow` on supply or balance overflow.
    pub fn deposit_native(&mut self, to: Address, amount: U256) -> Result<()> {
        NativeLedger::deposit(&mut self.store, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use openswap_codec::MakerSigner;
    use openswap_types::SigningScheme;

    use super::*;
    use crate::clock::ManualClock;

    const EXECUTOR: Address = Address::repeat_byte(0xEE);
    const TAKER: Address = Address::repeat_byte(0x02);

    struct Setup {
        exec: SettlementExecutor<ManualClock>,
        signer: MakerSigner,
        maker_token: TokenHandle,
        taker_token: TokenHandle,
    }

    fn setup() -> Setup {
        let mut exec =
            SettlementExecutor::new(EXECUTOR, ExchangeConfig::default(), ManualClock::at(1_000));
        let signer = MakerSigner::random(SigningScheme::EthSignedMessage);
        let maker_token = TokenHandle::new(Address::repeat_byte(0xA0));
        let taker_token = TokenHandle::new(Address::repeat_byte(0xB0));

        exec.mint(maker_token, signer.address(), U256::from(1000)).unwrap();
        exec.mint(taker_token, TAKER, U256::from(1000)).unwrap();
        exec.approve(maker_token, signer.address(), U256::from(1000));
        exec.approve(taker_token, TAKER, U256::from(1000));
        Setup {
            exec,
            signer,
            maker_token,
            taker_token,
        }
    }

    fn order(s: &Setup, maker_amount: u64, taker_amount: u64) -> Order {
        Order::dummy(
            s.signer.address(),
            maker_amount,
            s.maker_token.address(),
            TAKER,
            taker_amount,
            s.taker_token.address(),
        )
    }

    #[test]
    fn token_fill_moves_both_legs() {
        let mut s = setup();
        let order = order(&s, 250, 750);
        let sig = s.signer.sign_order(&order).unwrap();

        let event = s
            .exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(750))
            .unwrap();
        assert_eq!(event.filled_maker, U256::from(250));
        assert_eq!(event.filled_taker, U256::from(750));
        assert_eq!(event.timestamp, 1_000);

        let maker = s.signer.address();
        let maker_asset = Asset::Fungible(s.maker_token);
        let taker_asset = Asset::Fungible(s.taker_token);
        assert_eq!(s.exec.balance_of(&maker_asset, maker), U256::from(750));
        assert_eq!(s.exec.balance_of(&maker_asset, TAKER), U256::from(250));
        assert_eq!(s.exec.balance_of(&taker_asset, maker), U256::from(750));
        assert_eq!(s.exec.balance_of(&taker_asset, TAKER), U256::from(250));
        assert_eq!(s.exec.allowance(s.maker_token, maker, EXECUTOR), U256::from(750));
        assert_eq!(s.exec.fill_state(&order).unwrap(), FillState::FullyFilled);
        assert_eq!(s.exec.events().len(), 1);
    }

    #[test]
    fn fill_records_both_leg_transfers() {
        let mut s = setup();
        let order = order(&s, 250, 750);
        let sig = s.signer.sign_order(&order).unwrap();
        s.exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(750))
            .unwrap();

        // Two mints from setup, then maker leg and taker leg.
        let transfers = s.exec.transfers();
        assert_eq!(transfers.len(), 4);
        assert_eq!(transfers[0].from, Address::zero());
        let maker_leg = &transfers[2];
        assert_eq!(maker_leg.token, s.maker_token);
        assert_eq!((maker_leg.from, maker_leg.to), (s.signer.address(), TAKER));
        assert_eq!(maker_leg.amount, U256::from(250));
        let taker_leg = &transfers[3];
        assert_eq!(taker_leg.token, s.taker_token);
        assert_eq!((taker_leg.from, taker_leg.to), (TAKER, s.signer.address()));
        assert_eq!(taker_leg.amount, U256::from(750));
    }

    #[test]
    fn rejected_fill_records_no_transfers() {
        let mut s = setup();
        s.exec.approve(s.taker_token, TAKER, U256::zero());
        let order = order(&s, 250, 750);
        let sig = s.signer.sign_order(&order).unwrap();
        assert!(s
            .exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(750))
            .is_err());
        assert_eq!(s.exec.transfers().len(), 2);
    }

    #[test]
    fn partial_fill_rounds_maker_leg_down() {
        let mut s = setup();
        let order = order(&s, 250, 750);
        let sig = s.signer.sign_order(&order).unwrap();

        // 100 * 250 / 750 = 33.33.. -> 33
        let event = s
            .exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(100))
            .unwrap();
        assert_eq!(event.filled_maker, U256::from(33));
        assert_eq!(s.exec.remaining(&order).unwrap(), U256::from(650));
        assert_eq!(s.exec.fill_state(&order).unwrap(), FillState::PartiallyFilled);
    }

    #[test]
    fn fill_rounding_to_zero_maker_units_rejected() {
        let mut s = setup();
        let order = order(&s, 1, 750);
        let sig = s.signer.sign_order(&order).unwrap();
        let before = s.exec.state_root();

        let err = s
            .exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(10))
            .unwrap_err();
        assert!(matches!(err, SwapError::InvalidFillAmount { .. }));
        assert_eq!(s.exec.state_root(), before);
        assert_eq!(s.exec.remaining(&order).unwrap(), U256::from(750));
    }

    #[test]
    fn failure_after_staged_writes_rolls_back() {
        let mut s = setup();
        // Taker approved only 100 of the 750 it owes.
        s.exec.approve(s.taker_token, TAKER, U256::from(100));
        let order = order(&s, 250, 750);
        let sig = s.signer.sign_order(&order).unwrap();
        let before = s.exec.state_root();

        let err = s
            .exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(750))
            .unwrap_err();
        assert!(matches!(err, SwapError::InsufficientAllowance { owner, .. } if owner == TAKER));
        assert_eq!(s.exec.state_root(), before);
        assert!(s.exec.events().is_empty());
        assert_eq!(s.exec.fill_state(&order).unwrap(), FillState::Unfilled);
    }

    #[test]
    fn take_events_drains_log() {
        let mut s = setup();
        let order = order(&s, 10, 10);
        let sig = s.signer.sign_order(&order).unwrap();
        s.exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(10))
            .unwrap();
        assert_eq!(s.exec.take_events().len(), 1);
        assert!(s.exec.events().is_empty());
    }

    #[test]
    fn clock_governs_expiry() {
        let mut s = setup();
        let mut order = order(&s, 10, 10);
        order.expiration = U256::from(1_010);
        let sig = s.signer.sign_order(&order).unwrap();

        s.exec.clock().advance(10);
        let err = s
            .exec
            .fill(&order, &sig, TAKER, U256::zero(), U256::from(10))
            .unwrap_err();
        assert!(matches!(err, SwapError::OrderExpired { now: 1_010, .. }));
    }
}
