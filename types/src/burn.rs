//! Burn request construction.

use alloy_primitives::Address;

use crate::amount::{BethAmount, EthAmount};
use crate::BurnRequestError;

/// Parameters for a single burn attempt.
///
/// Constructed fresh per attempt; `spend = amount − fee` is enforced at
/// construction so the invariant cannot drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnRequest {
    /// ETH sent to the burn address.
    pub amount: EthAmount,
    /// BETH minted from the proof (amount minus protocol fee).
    pub spend: BethAmount,
    /// Protocol fee retained by the burn.
    pub fee: EthAmount,
    /// Wallet receiving the minted BETH.
    pub receiver: Address,
}

impl BurnRequest {
    /// Build a burn request from an amount and fee.
    ///
    /// Fails when the fee would consume the whole amount.
    pub fn new(amount: EthAmount, fee: EthAmount, receiver: Address) -> Result<Self, BurnRequestError> {
        if fee >= amount {
            return Err(BurnRequestError::FeeExceedsAmount {
                fee: fee.wei(),
                amount: amount.wei(),
            });
        }
        let spend = BethAmount::from_wei(amount.wei() - fee.wei());
        Ok(Self {
            amount,
            spend,
            fee,
            receiver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receiver() -> Address {
        Address::repeat_byte(0x11)
    }

    #[test]
    fn spend_is_amount_minus_fee() {
        let req = BurnRequest::new(
            EthAmount::from_wei(50_000),
            EthAmount::from_wei(10),
            receiver(),
        )
        .unwrap();
        assert_eq!(req.spend.wei(), 49_990);
    }

    #[test]
    fn fee_equal_to_amount_rejected() {
        let err = BurnRequest::new(
            EthAmount::from_wei(100),
            EthAmount::from_wei(100),
            receiver(),
        )
        .unwrap_err();
        assert!(matches!(err, BurnRequestError::FeeExceedsAmount { .. }));
    }

    #[test]
    fn fee_above_amount_rejected() {
        assert!(BurnRequest::new(
            EthAmount::from_wei(100),
            EthAmount::from_wei(200),
            receiver(),
        )
        .is_err());
    }
}
