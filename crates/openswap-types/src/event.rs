//! Events emitted by the settlement engine and the token ledgers.
//!
//! Events are the observable audit trail of the system: a `Filled` event is
//! appended only after every write of the fill has been committed.

use serde::{Deserialize, Serialize};

use crate::{Address, Asset, OrderHash, TokenHandle, U256};

/// A fill was settled on both legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillEvent {
    pub order_hash: OrderHash,
    pub maker: Address,
    pub taker: Address,
    pub maker_asset: Asset,
    pub taker_asset: Asset,
    /// Maker-leg units moved maker → taker.
    pub filled_maker: U256,
    /// Taker-leg units moved taker → maker.
    pub filled_taker: U256,
    /// Substrate time at settlement.
    pub timestamp: u64,
}

/// `owner` granted `spender` an allowance of `amount` on `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub token: TokenHandle,
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

/// `amount` of `token` moved from `from` to `to`. Mints use the zero address
/// as `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub token: TokenHandle,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_event_serde_roundtrip() {
        let event = FillEvent {
            order_hash: OrderHash::from_bytes([3; 32]),
            maker: Address::repeat_byte(1),
            taker: Address::repeat_byte(2),
            maker_asset: Asset::fungible(Address::repeat_byte(0xA0)),
            taker_asset: Asset::NativeCurrency,
            filled_maker: U256::from(750),
            filled_taker: U256::from(750),
            timestamp: 1_700_000_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: FillEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
