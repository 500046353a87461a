//! # openswap-types
//!
//! Shared types, errors, and configuration for the **OpenSwap** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderHash`], [`TokenHandle`], plus the re-exported
//!   [`Address`], [`H256`], [`U256`] primitives
//! - **Order model**: [`Order`], [`Asset`], [`FillState`]
//! - **Signature model**: [`OrderSignature`]
//! - **Events**: [`FillEvent`], [`ApprovalEvent`], [`TransferEvent`]
//! - **Configuration**: [`ExchangeConfig`], [`SigningScheme`]
//! - **Errors**: [`SwapError`] with `SWAP_ERR_` prefix codes
//! - **Constants**: wire widths, curve constants, defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;
pub mod signature;

// Re-export all primary types at crate root for ergonomic imports:
//   use openswap_types::{Order, Asset, OrderHash, SwapError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;
pub use signature::*;

// Constants are accessed via `openswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
