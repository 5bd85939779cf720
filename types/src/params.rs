//! WORM protocol parameters for the target network.
//!
//! Contract addresses and tuning constants for Sepolia. All values that an
//! operator might reasonably tune live in `FarmConfig`; these are fixed by
//! the deployed protocol itself.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Deployed protocol contracts plus fixed transaction policy.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// BETH token contract (mintCoin entry point + ERC20 surface).
    pub beth_contract: Address,

    /// WORM contract (participate/claim + reward token ERC20 surface).
    pub worm_contract: Address,

    /// Required leading zero bytes in the burn-key digest.
    pub pow_zero_bytes: usize,

    /// Gas-price ceiling in wei. Transactions are refused above this to
    /// avoid draining wallets during fee spikes.
    pub max_gas_price_wei: u128,

    /// Priority multiplier applied to the network gas price, in percent
    /// (120 = 1.2x) for fast inclusion on congested test networks.
    pub gas_priority_percent: u128,
}

impl ProtocolParams {
    /// Parameters for the Sepolia testnet deployment.
    pub fn sepolia() -> Self {
        Self {
            beth_contract: address!("716bC7e331c9Da551e5Eb6A099c300db4c08E994"),
            worm_contract: address!("cBdF9890B5935F01B2f21583d1885CdC8389eb5F"),
            pow_zero_bytes: 2,
            max_gas_price_wei: 100 * crate::amount::WEI_PER_GWEI,
            gas_priority_percent: 120,
        }
    }

    /// Network gas price with the priority buffer applied.
    pub fn priority_gas_price(&self, base: u128) -> u128 {
        base.saturating_mul(self.gas_priority_percent) / 100
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::sepolia()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_buffer_is_twenty_percent() {
        let params = ProtocolParams::sepolia();
        assert_eq!(params.priority_gas_price(100), 120);
        assert_eq!(params.priority_gas_price(0), 0);
    }

    #[test]
    fn sepolia_ceiling_is_100_gwei() {
        let params = ProtocolParams::sepolia();
        assert_eq!(params.max_gas_price_wei, 100_000_000_000);
    }
}
