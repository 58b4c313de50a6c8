// Randomized drives of the auction engine.
//
// A seeded generator plays every owner, submitting random legal actions
// (and some illegal ones), and the conservation invariants are checked
// after every call.

use std::collections::HashSet;

use gridcast_core::{
    Auction, AuctionState, Player, PlayerId, Position, RandomTieBreaker, RosterSlotKind,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const OWNERS: usize = 4;
const MONEY: u32 = 100;

fn roster() -> Vec<RosterSlotKind> {
    ["QB", "RB", "WR", "WR/RB/TE", "BN", "BN"]
        .iter()
        .map(|l| RosterSlotKind::from_label(l).unwrap())
        .collect()
}

fn pool(rng: &mut StdRng) -> Vec<Player> {
    let mut players = Vec::new();
    let positions = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
    ];
    for pos in positions {
        for n in 0..16 {
            let id = PlayerId(players.len() as u32);
            players.push(Player::new(id, format!("{pos}{n}"), pos, rng.gen_range(1..=60)));
        }
    }
    for n in 0..4 {
        let id = PlayerId(players.len() as u32);
        players.push(Player::new(id, format!("K{n}"), Position::Kicker, rng.gen_range(1..=8)));
    }
    players
}

fn check_invariants(a: &Auction) {
    let mut seen = HashSet::new();
    for owner in a.owners() {
        let costs: u32 = owner.purchases().map(|(_, cost, _)| cost).sum();
        assert_eq!(owner.starting_money() - owner.money(), costs, "funds conservation");
        assert_eq!(
            owner.remaining_picks() + owner.occupied_slot_count(),
            roster().len(),
            "slot conservation"
        );
        for (player, cost, kind) in owner.purchases() {
            assert!(cost >= 1);
            assert!(kind.accepts(player));
            assert!(owner.owns(player));
            assert!(seen.insert(player.id), "{player} owned twice");
        }
    }

    assert_eq!(seen.len() + a.undrafted_players().len(), a.players().len());
    assert_eq!(seen.len(), a.sales().len());
    assert!(a
        .undrafted_players()
        .windows(2)
        .all(|w| w[0].value >= w[1].value));

    match a.state() {
        AuctionState::Nominate => {
            assert!(a.nominee().is_none());
            assert!(a.owners()[a.turn_index()].remaining_picks() > 0);
        }
        AuctionState::Bid => {
            assert!(a.nominee().is_some());
            assert!(a.owners()[a.turn_index()].remaining_picks() > 0);
            assert_eq!(a.bids().iter().copied().max(), a.current_bid());
        }
        AuctionState::Done => {
            assert!(a.owners().iter().all(|o| o.remaining_picks() == 0));
        }
    }
}

fn nominate_randomly(a: &mut Auction, rng: &mut StdRng) {
    let turn = a.turn_index();
    let nominator = &a.owners()[turn];
    let max_bid = nominator.max_bid();

    // Players the nominator could buy themselves, so settlement never fails.
    let mut choices: Vec<usize> = a
        .undrafted_players()
        .iter()
        .filter(|p| nominator.can_buy(p, 1))
        .filter_map(|p| a.player_index(p.id))
        .collect();
    choices.shuffle(rng);
    let player_index = *choices.first().expect("nominator has a buyable player");

    // Out-of-turn nominations are always refused.
    let other = (turn + 1) % OWNERS;
    assert!(a.nominate(other, player_index, 1).is_err());
    check_invariants(a);

    let bid = rng.gen_range(1..=max_bid.min(10));
    if a.nominate(turn, player_index, bid).is_err() {
        a.nominate(turn, player_index, 1).unwrap();
    }
}

fn bid_randomly(a: &mut Auction, rng: &mut StdRng) {
    let current = a.current_bid().unwrap();
    for owner in 0..OWNERS {
        if !rng.gen_bool(0.35) {
            continue;
        }
        // Stale bids never change anything.
        assert!(a.place_bid(owner, current).is_err());

        let bid = current + rng.gen_range(1..=3);
        let nominee = a.nominee().unwrap().clone();
        let allowed = a.owners()[owner].can_buy(&nominee, bid);
        assert_eq!(a.place_bid(owner, bid).is_ok(), allowed);
    }
}

fn drive(seed: u64) -> Auction {
    let mut rng = StdRng::seed_from_u64(seed);
    let players = pool(&mut rng);
    let mut a = Auction::new(
        players,
        OWNERS,
        MONEY,
        roster(),
        RandomTieBreaker::seeded(seed ^ 0xA5A5),
    )
    .unwrap();

    check_invariants(&a);
    for _ in 0..10_000 {
        match a.state() {
            AuctionState::Nominate => nominate_randomly(&mut a, &mut rng),
            AuctionState::Bid => bid_randomly(&mut a, &mut rng),
            AuctionState::Done => break,
        }
        check_invariants(&a);
        a.tick().unwrap();
        check_invariants(&a);
    }
    a
}

#[test]
fn invariants_hold_through_random_auctions() {
    for seed in 0..20 {
        let a = drive(seed);
        assert!(a.is_done(), "seed {seed} did not finish");
        assert_eq!(a.sales().len(), OWNERS * roster().len());
        for owner in a.owners() {
            assert!(owner.money() <= MONEY);
        }
    }
}

#[test]
fn same_seed_replays_identically() {
    let left = drive(7);
    let right = drive(7);
    let summarize = |a: &Auction| -> Vec<(usize, u32, u32)> {
        a.sales()
            .iter()
            .map(|s| (s.owner_id, s.player.id.0, s.price))
            .collect()
    };
    assert_eq!(summarize(&left), summarize(&right));
    assert_eq!(left.scores(0.75), right.scores(0.75));
}
