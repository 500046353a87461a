//! # openswap-settlement
//!
//! Executes fills of maker-signed orders.
//!
//! ## Architecture
//!
//! The [`SettlementExecutor`] owns a single [`StateStore`] holding every
//! durable slot of the engine. For each `fill` it:
//! 1. Runs the stateless checks of `openswap-codec` (shape, expiry,
//!    signature, taker binding, asset legs)
//! 2. Opens a [`WriteBatch`] and advances the [`FillLedger`] (no order
//!    absorbs more than its taker amount)
//! 3. Debits attached native value from the caller
//! 4. Transfers the maker leg and the taker leg through [`TokenLedger`] /
//!    [`NativeLedger`]
//! 5. Applies the batch and appends a `FillEvent` plus the leg transfers
//!
//! Any failure drops the batch. [`SupplyConservation`] audits the committed
//! state: fills only ever move balances, never create or destroy them.

pub mod clock;
pub mod executor;
pub mod fill_ledger;
pub mod native;
pub mod store;
pub mod supply_conservation;
pub mod token_ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use executor::SettlementExecutor;
pub use fill_ledger::FillLedger;
pub use native::NativeLedger;
pub use store::{ChangeSet, StateAccess, StateKey, StateStore, WriteBatch};
pub use supply_conservation::SupplyConservation;
pub use token_ledger::TokenLedger;
