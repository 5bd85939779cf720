//! Contract bindings for the BETH token and the WORM mining pool.

use alloy::primitives::U256;
use alloy::sol;

sol! {
    /// BETH — burnt-ETH token. ERC20 surface plus the proof-gated mint.
    #[sol(rpc)]
    contract BethToken {
        function mintCoin(
            uint256[2] _pA,
            uint256[2][2] _pB,
            uint256[2] _pC,
            uint256 _blockNumber,
            uint256 _nullifier,
            uint256 _remainingCoin,
            uint256 _broadcasterFee,
            uint256 _revealedAmount,
            address _revealedAmountReceiver,
            uint256 _proverFee,
            address _prover,
            bytes _receiverPostMintHook,
            bytes _broadcasterFeePostMintHook
        ) external;

        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
    }

    /// WORM mining pool — epoch participation, reward claims and
    /// protocol-wide stats, plus the WORM reward token's ERC20 surface.
    #[sol(rpc)]
    contract WormPool {
        function participate(uint256 _amountPerEpoch, uint256 _numEpochs) external;
        function claim(uint256 _startingEpoch, uint256 _numEpochs) external;

        function balanceOf(address owner) external view returns (uint256);
        function currentEpoch() external view returns (uint256);
        function epochRemainingTime() external view returns (uint256);
        function totalWorm() external view returns (uint256);
        function totalBeth() external view returns (uint256);
    }
}

/// Reorder a Groth16 `B` point for the on-chain verifier.
///
/// The verifier's pairing convention expects each G2 row with its two
/// coordinates swapped relative to the prover's natural order. This exact
/// ordering is mandated by the deployed verifier and must be preserved.
pub fn pairing_order_b(b: [[U256; 2]; 2]) -> [[U256; 2]; 2] {
    [[b[0][1], b[0][0]], [b[1][1], b[1][0]]]
}
