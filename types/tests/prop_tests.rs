use proptest::prelude::*;

use wormfarm_types::amount::WEI_PER_ETHER;
use wormfarm_types::{format_ether, parse_ether, BurnRequest, EthAmount};

proptest! {
    /// Formatting then parsing any wei amount is lossless.
    #[test]
    fn format_parse_roundtrip(wei in 0u128..u128::MAX / 2) {
        let formatted = format_ether(wei);
        let reparsed = parse_ether(&formatted).unwrap();
        prop_assert_eq!(reparsed, wei);
    }

    /// Parsing a plain integer string yields whole ether.
    #[test]
    fn whole_ether_parses(whole in 0u128..1_000_000) {
        let wei = parse_ether(&whole.to_string()).unwrap();
        prop_assert_eq!(wei, whole * WEI_PER_ETHER);
    }

    /// A valid burn request always satisfies spend = amount − fee.
    #[test]
    fn burn_request_spend_invariant(
        amount in 100u128..u128::MAX / 2,
        fee_fraction in 0u128..100,
    ) {
        // fee < amount by construction, so the request must build.
        let fee = amount / 100 * fee_fraction;
        let receiver = alloy_primitives::Address::repeat_byte(0x42);
        let req = BurnRequest::new(
            EthAmount::from_wei(amount),
            EthAmount::from_wei(fee),
            receiver,
        ).unwrap();
        prop_assert_eq!(req.spend.wei() + req.fee.wei(), req.amount.wei());
    }
}
