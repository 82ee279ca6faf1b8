//! # Forwarding Round Trips
//!
//! Every priced wrapper must leave the caller with no stranded base
//! currency: either the exact cost was swapped up front and a balance check
//! proves nothing leaked, or the surplus was swept back into wrapped tokens
//! at the end of the request.

#[cfg(test)]
mod tests {
    use peg_estimator::{quote, ram_bytes_cost};
    use peg_types::{
        Action, ActionKind, BaseSystemView, EngineError, LedgerError, SettlementError,
    };

    use crate::support::{
        assert_peg_invariants, base_asset, base_of, deposit, name, standard_chain, wrapped_asset,
        wrapped_of,
    };

    fn rent_asset(shares: i64) -> peg_types::Asset {
        peg_types::Asset::new(shares, peg_types::Symbol::rent())
    }

    // =========================================================================
    // RAM
    // =========================================================================

    #[test]
    fn test_buy_ram_bytes_swaps_exactly_the_estimate() {
        let mut chain = standard_chain(&[("alice", 100_0000)]);
        deposit(&mut chain, "alice", 100_0000);

        let cost = ram_bytes_cost(&chain.base().ram_market(), 10_000).unwrap();
        let escrow_before = base_of(&chain, "sys.ram");

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::BuyRamBytes {
                    payer: name("alice"),
                    receiver: name("alice"),
                    bytes: 10_000,
                },
            ))
            .unwrap();

        assert_eq!(wrapped_of(&chain, "alice"), 100_0000 - cost);
        assert_eq!(base_of(&chain, "alice"), 0);
        assert_eq!(base_of(&chain, "sys.ram"), escrow_before + cost);
        assert_eq!(chain.base().last_request(), Some("buy_ram_bytes"));
        assert_peg_invariants(&chain);
    }

    #[test]
    fn test_buy_ram_with_no_wrapped_balance_sends_nothing() {
        let mut chain = standard_chain(&[("alice", 0)]);
        let escrow_before = base_of(&chain, "sys.ram");

        let err = chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::BuyRam {
                    payer: name("alice"),
                    receiver: name("alice"),
                    quantity: wrapped_asset(1_0000),
                },
            ))
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Ledger(LedgerError::InsufficientFunds { .. })
        ));
        // The request failed before any base request went out.
        assert_eq!(chain.base().last_request(), None);
        assert_eq!(base_of(&chain, "sys.ram"), escrow_before);
    }

    #[test]
    fn test_sell_ram_proceeds_are_swept_into_wrapped() {
        let mut chain = standard_chain(&[("alice", 0)]);
        let market = chain.base().ram_market();
        let proceeds = quote(market.ram_reserve, market.base_reserve, 10_000).unwrap();

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::SellRam {
                    account: name("alice"),
                    bytes: 10_000,
                },
            ))
            .unwrap();

        assert_eq!(wrapped_of(&chain, "alice"), proceeds);
        assert_eq!(base_of(&chain, "alice"), 0);
        assert_peg_invariants(&chain);
    }

    #[test]
    fn test_balance_enforcement_rejects_a_mismatch() {
        let mut chain = standard_chain(&[("alice", 7_0000)]);

        let err = chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::EnforceBalance {
                    account: name("alice"),
                    expected: base_asset(6_0000),
                },
            ))
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Settlement(SettlementError::BalanceMismatch { .. })
        ));
    }

    // =========================================================================
    // NAME AUCTION
    // =========================================================================

    #[test]
    fn test_bid_then_refund_round_trips() {
        let mut chain = standard_chain(&[("alice", 10_0000)]);
        deposit(&mut chain, "alice", 10_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::BidName {
                    bidder: name("alice"),
                    newname: name("prize"),
                    bid: wrapped_asset(2_0000),
                },
            ))
            .unwrap();
        assert_eq!(wrapped_of(&chain, "alice"), 8_0000);

        // Losing the auction creates a refund on the base side.
        chain.base_mut().insert_bid_refund(name("alice"), 2_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::BidRefund {
                    bidder: name("alice"),
                    newname: name("prize"),
                },
            ))
            .unwrap();

        assert_eq!(wrapped_of(&chain, "alice"), 10_0000);
        assert_eq!(base_of(&chain, "alice"), 0);
        assert_peg_invariants(&chain);
    }

    #[test]
    fn test_bid_refund_without_a_refund_fails_cleanly() {
        let mut chain = standard_chain(&[("alice", 0)]);

        let err = chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::BidRefund {
                    bidder: name("alice"),
                    newname: name("prize"),
                },
            ))
            .unwrap_err();

        assert!(matches!(err, EngineError::Base(_)));
        assert_eq!(wrapped_of(&chain, "alice"), 0);
    }

    // =========================================================================
    // STAKING
    // =========================================================================

    #[test]
    fn test_delegate_undelegate_refund_cycle() {
        let mut chain = standard_chain(&[("alice", 10_0000), ("bob", 0)]);
        deposit(&mut chain, "alice", 10_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Delegate {
                    from: name("alice"),
                    receiver: name("bob"),
                    net: wrapped_asset(2_0000),
                    cpu: wrapped_asset(3_0000),
                    transfer: false,
                },
            ))
            .unwrap();
        assert_eq!(wrapped_of(&chain, "alice"), 5_0000);
        assert_eq!(chain.base().stake_of(&name("alice")), (2_0000, 3_0000));

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Undelegate {
                    from: name("alice"),
                    receiver: name("bob"),
                    net: wrapped_asset(2_0000),
                    cpu: wrapped_asset(3_0000),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().refund_of(&name("alice")), 5_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Refund {
                    owner: name("alice"),
                },
            ))
            .unwrap();

        assert_eq!(chain.base().refund_of(&name("alice")), 0);
        assert_eq!(wrapped_of(&chain, "alice"), 10_0000);
        assert_eq!(base_of(&chain, "alice"), 0);
        assert_peg_invariants(&chain);
    }

    #[test]
    fn test_unstake_to_rent_converts_stake_to_shares() {
        let mut chain = standard_chain(&[("alice", 10_0000), ("bob", 0)]);
        deposit(&mut chain, "alice", 10_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Delegate {
                    from: name("alice"),
                    receiver: name("alice"),
                    net: wrapped_asset(2_0000),
                    cpu: wrapped_asset(3_0000),
                    transfer: false,
                },
            ))
            .unwrap();

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::UnstakeToRent {
                    owner: name("alice"),
                    receiver: name("alice"),
                    from_net: wrapped_asset(2_0000),
                    from_cpu: wrapped_asset(3_0000),
                },
            ))
            .unwrap();

        assert_eq!(chain.base().stake_of(&name("alice")), (0, 0));
        assert!(chain.base().rent_savings_of(&name("alice")) > 0);
        assert_eq!(chain.base().refund_of(&name("alice")), 0);
    }

    // =========================================================================
    // RESOURCE RENTAL
    // =========================================================================

    #[test]
    fn test_rent_resources_sweeps_the_unspent_payment() {
        let mut chain = standard_chain(&[("alice", 10_0000), ("bob", 0)]);
        deposit(&mut chain, "alice", 10_0000);
        let escrow_before = base_of(&chain, "sys.rent");

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::RentResources {
                    payer: name("alice"),
                    receiver: name("bob"),
                    days: 30,
                    net_frac: 1_000_000,
                    cpu_frac: 1_000_000,
                    max_payment: wrapped_asset(5_0000),
                },
            ))
            .unwrap();

        // The base system only took the flat price; the rest came back.
        assert_eq!(wrapped_of(&chain, "alice"), 9_0000);
        assert_eq!(base_of(&chain, "alice"), 0);
        assert_eq!(base_of(&chain, "sys.rent"), escrow_before + 1_0000);
        assert_peg_invariants(&chain);
    }

    #[test]
    fn test_exchange_deposit_buy_sell_withdraw_round_trip() {
        let mut chain = standard_chain(&[("alice", 100_0000)]);
        deposit(&mut chain, "alice", 100_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Deposit {
                    owner: name("alice"),
                    amount: wrapped_asset(10_0000),
                },
            ))
            .unwrap();
        assert_eq!(wrapped_of(&chain, "alice"), 90_0000);
        assert_eq!(chain.base().rent_fund_of(&name("alice")), 10_0000);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::BuyRent {
                    from: name("alice"),
                    amount: wrapped_asset(10_0000),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().rent_fund_of(&name("alice")), 0);
        let shares = chain.base().rent_savings_of(&name("alice"));
        assert!(shares > 0);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::MoveFromSavings {
                    owner: name("alice"),
                    rent: rent_asset(shares),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().rent_matured_of(&name("alice")), shares);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::SellRent {
                    from: name("alice"),
                    rent: rent_asset(shares),
                },
            ))
            .unwrap();
        let payout = chain.base().rent_fund_of(&name("alice"));
        // Share conversion rounds down on both legs.
        assert!(payout <= 10_0000 && payout >= 9_9998, "payout {payout}");

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Withdraw {
                    owner: name("alice"),
                    amount: wrapped_asset(payout),
                },
            ))
            .unwrap();

        assert_eq!(wrapped_of(&chain, "alice"), 90_0000 + payout);
        assert_eq!(chain.base().rent_fund_of(&name("alice")), 0);
        assert_peg_invariants(&chain);
    }

    #[test]
    fn test_savings_moves_split_and_recombine() {
        let mut chain = standard_chain(&[("alice", 10_0000)]);
        deposit(&mut chain, "alice", 10_0000);

        for kind in [
            ActionKind::Deposit {
                owner: name("alice"),
                amount: wrapped_asset(10_0000),
            },
            ActionKind::BuyRent {
                from: name("alice"),
                amount: wrapped_asset(10_0000),
            },
        ] {
            chain.push_request(Action::new(name("alice"), kind)).unwrap();
        }
        let shares = chain.base().rent_savings_of(&name("alice"));

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::MoveFromSavings {
                    owner: name("alice"),
                    rent: rent_asset(shares / 2),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().rent_savings_of(&name("alice")), shares - shares / 2);
        assert_eq!(chain.base().rent_matured_of(&name("alice")), shares / 2);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::MoveToSavings {
                    owner: name("alice"),
                    rent: rent_asset(shares / 2),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().rent_savings_of(&name("alice")), shares);
        assert_eq!(chain.base().rent_matured_of(&name("alice")), 0);
    }

    // =========================================================================
    // GOVERNANCE AND ACCOUNT PLUMBING
    // =========================================================================

    #[test]
    fn test_vote_reaches_the_base_system() {
        let mut chain = standard_chain(&[("alice", 0)]);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::Vote {
                    voter: name("alice"),
                    proxy: None,
                    producers: vec![name("prod.a"), name("prod.b")],
                },
            ))
            .unwrap();

        assert_eq!(
            chain.base().producers_voted_by(&name("alice")),
            Some(&[name("prod.a"), name("prod.b")][..])
        );
        assert_eq!(chain.base().last_request(), Some("vote"));
    }

    #[test]
    fn test_new_account_registers_on_the_base_side() {
        let mut chain = standard_chain(&[("alice", 0)]);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::NewAccount {
                    creator: name("alice"),
                    account: name("newbie"),
                },
            ))
            .unwrap();
        assert!(chain.base().is_account(&name("newbie")));

        let err = chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::NewAccount {
                    creator: name("alice"),
                    account: name("newbie"),
                },
            ))
            .unwrap_err();
        assert!(matches!(err, EngineError::Base(_)));
    }

    #[test]
    fn test_plain_forwards_carry_their_labels() {
        let mut chain = standard_chain(&[("alice", 0)]);

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::ClaimRewards {
                    owner: name("alice"),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().last_request(), Some("claim_rewards"));

        chain
            .push_request(Action::new(
                name("alice"),
                ActionKind::RefreshVote {
                    voter: name("alice"),
                },
            ))
            .unwrap();
        assert_eq!(chain.base().last_request(), Some("refresh_vote"));
    }
}
