// Auction engine: nomination, bidding, settlement, and turn rotation.
//
// The engine is driven by a single caller in strict call/response order.
// `nominate` and `place_bid` only record intent; every state transition
// happens in `tick`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::owner::{Owner, OwnerError};
use crate::player::{Player, PlayerId};
use crate::position::RosterSlotKind;
use crate::tiebreak::{RandomTieBreaker, TieBreaker};

// ---------------------------------------------------------------------------
// State and records
// ---------------------------------------------------------------------------

/// Where the auction is in its nominate -> bid -> settle cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionState {
    /// Waiting for the owner whose turn it is to put a player up.
    Nominate,
    /// A nominee is up and owners may raise the bid.
    Bid,
    /// Every roster is full.
    Done,
}

impl fmt::Display for AuctionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuctionState::Nominate => "NOMINATE",
            AuctionState::Bid => "BID",
            AuctionState::Done => "DONE",
        };
        f.write_str(s)
    }
}

/// A nomination recorded during NOMINATE, committed by the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Nomination {
    pub owner_id: usize,
    pub player_index: usize,
    pub bid: u32,
}

/// A settled lot.
#[derive(Debug, Clone, Serialize)]
pub struct Sale {
    /// Sequential pick number (1-indexed).
    pub pick_number: usize,
    pub owner_id: usize,
    pub player_index: usize,
    pub player: Player,
    pub price: u32,
}

/// What a call to [`Auction::tick`] did.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// The pending nomination was committed and bidding is open.
    BiddingOpened { player_index: usize, bid: u32 },
    /// The highest bid submitted this tick was accepted. `contenders` is how
    /// many owners submitted that same amount.
    BidAccepted {
        owner_id: usize,
        bid: u32,
        contenders: usize,
    },
    /// Nobody raised, so the high bidder bought the nominee.
    Sold(Sale),
    /// The auction is already over.
    Idle,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// The broad kind of rule an invalid action broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// Wrong state, wrong turn, or an owner/player that does not exist.
    Sequencing,
    /// Bid too low, or more than the owner can spend.
    Economic,
    /// No open slot for the player's position.
    Roster,
    /// Player already owned or already drafted.
    Duplicate,
    /// Nobody at all could buy the player at the proposed bid.
    UnreachableMarket,
}

/// A `nominate` or `place_bid` call the rules do not allow. Rejected calls
/// never change auction state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("cannot {action} while the auction is in the {state} state")]
    WrongState {
        action: &'static str,
        state: AuctionState,
    },

    #[error("owner {owner_id} does not exist ({owner_count} owners)")]
    UnknownOwner { owner_id: usize, owner_count: usize },

    #[error("owner {owner_id} tried to nominate, but it is owner {turn_index}'s turn")]
    NotYourTurn { owner_id: usize, turn_index: usize },

    #[error("player index {player_index} is out of range ({player_count} players)")]
    UnknownPlayer {
        player_index: usize,
        player_count: usize,
    },

    #[error("{player} (index {player_index}) has already been drafted")]
    AlreadyDrafted { player_index: usize, player: String },

    #[error("bid of ${bid} is below the $1 minimum")]
    BidBelowMinimum { bid: u32 },

    #[error("bid of ${bid} exceeds owner {owner_id}'s max bid of ${max_bid}")]
    ExceedsMaxBid {
        owner_id: usize,
        bid: u32,
        max_bid: u32,
    },

    #[error("bid of ${bid} must be greater than the current bid of ${current_bid}")]
    BidNotAboveCurrent { bid: u32, current_bid: u32 },

    #[error("owner {owner_id} has no open roster slot for {player}")]
    NoRosterSlot { owner_id: usize, player: String },

    #[error("owner {owner_id} already owns {player}")]
    AlreadyOwned { owner_id: usize, player: String },

    #[error("no owner can buy {player} for ${bid}")]
    UnreachableMarket { player: String, bid: u32 },
}

impl InvalidAction {
    pub fn violation(&self) -> Violation {
        match self {
            InvalidAction::WrongState { .. }
            | InvalidAction::UnknownOwner { .. }
            | InvalidAction::NotYourTurn { .. }
            | InvalidAction::UnknownPlayer { .. } => Violation::Sequencing,
            InvalidAction::BidBelowMinimum { .. }
            | InvalidAction::ExceedsMaxBid { .. }
            | InvalidAction::BidNotAboveCurrent { .. } => Violation::Economic,
            InvalidAction::NoRosterSlot { .. } => Violation::Roster,
            InvalidAction::AlreadyDrafted { .. } | InvalidAction::AlreadyOwned { .. } => {
                Violation::Duplicate
            }
            InvalidAction::UnreachableMarket { .. } => Violation::UnreachableMarket,
        }
    }

    fn from_owner_error(owner_id: usize, err: OwnerError) -> Self {
        match err {
            OwnerError::InsufficientFunds { cost, max_bid } => InvalidAction::ExceedsMaxBid {
                owner_id,
                bid: cost,
                max_bid,
            },
            OwnerError::NoValidRosterSlot { player, .. } => {
                InvalidAction::NoRosterSlot { owner_id, player }
            }
            OwnerError::AlreadyPurchased { player } => {
                InvalidAction::AlreadyOwned { owner_id, player }
            }
        }
    }
}

/// `tick` called in a way the protocol does not allow. These are caller
/// bugs, not game events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    #[error("tick was invoked during nomination but no nominee was selected")]
    NoNominee,

    #[error("owner {owner_id} won {player} but cannot complete the purchase: {source}")]
    Settlement {
        owner_id: usize,
        player: String,
        source: OwnerError,
    },
}

/// Auction construction arguments that cannot produce a playable auction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("an auction needs at least one owner")]
    NoOwners,

    #[error("the roster template has no slots")]
    EmptyRoster,

    #[error("starting money of ${money} cannot fill {slots} roster slots at $1 each")]
    InsufficientStartingMoney { money: u32, slots: usize },

    #[error("player id {id} appears more than once")]
    DuplicatePlayerId { id: PlayerId },
}

// ---------------------------------------------------------------------------
// Auction
// ---------------------------------------------------------------------------

/// A sealed-turn ascending-bid auction.
///
/// Owners are identified by their index in [`Auction::owners`]; players by
/// their index in [`Auction::players`], which keeps the order the caller
/// supplied.
#[derive(Debug)]
pub struct Auction<T = RandomTieBreaker> {
    owners: Vec<Owner>,
    players: Vec<Player>,
    /// Players not yet sold, highest value first.
    undrafted: Vec<Player>,
    roster: Vec<RosterSlotKind>,
    starting_money: u32,
    state: AuctionState,
    turn_index: usize,
    pending: Option<Nomination>,
    /// Index of the player up for bidding. Set only in BID.
    nominee: Option<usize>,
    /// Accepted bid for the nominee. Set only in BID.
    bid: Option<u32>,
    /// Each owner's latest accepted bid on the current nominee.
    bids: Vec<u32>,
    /// Bids submitted since the last tick.
    tick_bids: Vec<u32>,
    /// Owner of each player, by player index.
    drafted_by: Vec<Option<usize>>,
    index_by_id: HashMap<PlayerId, usize>,
    sales: Vec<Sale>,
    tie_breaker: T,
}

impl<T: TieBreaker> Auction<T> {
    /// Start an auction. Every owner gets `starting_money` and a private copy
    /// of `roster`; owner 0 nominates first.
    pub fn new(
        players: Vec<Player>,
        owner_count: usize,
        starting_money: u32,
        roster: Vec<RosterSlotKind>,
        tie_breaker: T,
    ) -> Result<Self, SetupError> {
        if owner_count == 0 {
            return Err(SetupError::NoOwners);
        }
        if roster.is_empty() {
            return Err(SetupError::EmptyRoster);
        }
        if (starting_money as usize) < roster.len() {
            return Err(SetupError::InsufficientStartingMoney {
                money: starting_money,
                slots: roster.len(),
            });
        }

        let mut index_by_id = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            if index_by_id.insert(player.id, idx).is_some() {
                return Err(SetupError::DuplicatePlayerId { id: player.id });
            }
        }

        let owners = (0..owner_count)
            .map(|id| Owner::new(id, starting_money, &roster))
            .collect();

        let mut undrafted = players.clone();
        undrafted.sort_by(|a, b| b.value.cmp(&a.value));

        debug!(
            owners = owner_count,
            players = players.len(),
            slots = roster.len(),
            starting_money,
            "auction created"
        );

        Ok(Auction {
            owners,
            drafted_by: vec![None; players.len()],
            players,
            undrafted,
            roster,
            starting_money,
            state: AuctionState::Nominate,
            turn_index: 0,
            pending: None,
            nominee: None,
            bid: None,
            bids: vec![0; owner_count],
            tick_bids: vec![0; owner_count],
            index_by_id,
            sales: Vec::new(),
            tie_breaker,
        })
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Put `player_index` up for auction with an opening bid of `bid`.
    ///
    /// Only the owner whose turn it is may nominate, only undrafted players
    /// can be nominated, the opening bid must be within the nominator's
    /// budget, and at least one owner must be able to buy the player at that
    /// price. Nominating again before the next tick replaces the previous
    /// nomination.
    pub fn nominate(
        &mut self,
        owner_id: usize,
        player_index: usize,
        bid: u32,
    ) -> Result<(), InvalidAction> {
        self.ensure_state(AuctionState::Nominate, "nominate")?;
        let owner = self.owner_checked(owner_id)?;
        if owner_id != self.turn_index {
            return Err(InvalidAction::NotYourTurn {
                owner_id,
                turn_index: self.turn_index,
            });
        }

        let player = self
            .players
            .get(player_index)
            .ok_or(InvalidAction::UnknownPlayer {
                player_index,
                player_count: self.players.len(),
            })?;
        if self.drafted_by[player_index].is_some() {
            return Err(InvalidAction::AlreadyDrafted {
                player_index,
                player: player.name.clone(),
            });
        }

        if bid < 1 {
            return Err(InvalidAction::BidBelowMinimum { bid });
        }
        let max_bid = owner.max_bid();
        if bid > max_bid {
            return Err(InvalidAction::ExceedsMaxBid {
                owner_id,
                bid,
                max_bid,
            });
        }
        if !self.owners.iter().any(|o| o.can_buy(player, bid)) {
            return Err(InvalidAction::UnreachableMarket {
                player: player.name.clone(),
                bid,
            });
        }

        debug!(owner = owner_id, player = %player, bid, "nomination recorded");
        self.pending = Some(Nomination {
            owner_id,
            player_index,
            bid,
        });
        Ok(())
    }

    /// Submit a bid on the current nominee for this tick.
    ///
    /// The bid must beat the current accepted bid and the owner must be able
    /// to buy the nominee at that price. Submitting again before the next
    /// tick replaces the owner's earlier submission.
    pub fn place_bid(&mut self, owner_id: usize, bid: u32) -> Result<(), InvalidAction> {
        self.ensure_state(AuctionState::Bid, "bid")?;
        let owner = self.owner_checked(owner_id)?;
        let (Some(nominee), Some(current_bid)) = (self.nominee, self.bid) else {
            return Err(InvalidAction::WrongState {
                action: "bid",
                state: self.state,
            });
        };

        if bid <= current_bid {
            return Err(InvalidAction::BidNotAboveCurrent { bid, current_bid });
        }
        owner
            .check_purchase(&self.players[nominee], bid)
            .map_err(|e| InvalidAction::from_owner_error(owner_id, e))?;

        debug!(owner = owner_id, bid, "bid submitted");
        self.tick_bids[owner_id] = bid;
        Ok(())
    }

    /// Advance the auction one step.
    ///
    /// - NOMINATE: commits the pending nomination and opens bidding, with the
    ///   nominator holding the opening bid.
    /// - BID with submissions: accepts the highest submitted bid. Equal top
    ///   submissions are arbitrated by the tie-breaker.
    /// - BID without submissions: the high bidder buys the nominee, and the
    ///   turn passes to the next owner with open slots (or the auction ends).
    /// - DONE: nothing happens.
    pub fn tick(&mut self) -> Result<TickOutcome, TickError> {
        match self.state {
            AuctionState::Nominate => self.open_bidding(),
            AuctionState::Bid => {
                let top = self.tick_bids.iter().copied().max().unwrap_or(0);
                if top == 0 {
                    self.settle()
                } else {
                    Ok(self.accept_top_bid(top))
                }
            }
            AuctionState::Done => Ok(TickOutcome::Idle),
        }
    }

    fn open_bidding(&mut self) -> Result<TickOutcome, TickError> {
        let nomination = self.pending.take().ok_or(TickError::NoNominee)?;

        self.state = AuctionState::Bid;
        self.nominee = Some(nomination.player_index);
        self.bid = Some(nomination.bid);
        self.bids.fill(0);
        self.bids[nomination.owner_id] = nomination.bid;
        self.tick_bids.fill(0);

        debug!(
            owner = nomination.owner_id,
            player = %self.players[nomination.player_index],
            bid = nomination.bid,
            "bidding opened"
        );
        Ok(TickOutcome::BiddingOpened {
            player_index: nomination.player_index,
            bid: nomination.bid,
        })
    }

    fn accept_top_bid(&mut self, top: u32) -> TickOutcome {
        let contenders: Vec<usize> = self
            .tick_bids
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == top)
            .map(|(idx, _)| idx)
            .collect();
        let accepted = if contenders.len() == 1 {
            contenders[0]
        } else {
            let chosen = self.tie_breaker.choose(&contenders);
            debug!(?contenders, chosen, bid = top, "tie between equal bids");
            chosen
        };

        self.bid = Some(top);
        self.bids[accepted] = top;
        self.tick_bids.fill(0);

        TickOutcome::BidAccepted {
            owner_id: accepted,
            bid: top,
            contenders: contenders.len(),
        }
    }

    fn settle(&mut self) -> Result<TickOutcome, TickError> {
        let (Some(player_index), Some(price)) = (self.nominee, self.bid) else {
            return Err(TickError::NoNominee);
        };
        let winner = self.winning_owner_index().unwrap_or(self.turn_index);
        let player = self.players[player_index].clone();

        self.owners[winner]
            .buy(player.clone(), price)
            .map_err(|source| TickError::Settlement {
                owner_id: winner,
                player: player.name.clone(),
                source,
            })?;

        self.drafted_by[player_index] = Some(winner);
        self.undrafted.retain(|p| p.id != player.id);
        self.nominee = None;
        self.bid = None;
        self.bids.fill(0);

        let sale = Sale {
            pick_number: self.sales.len() + 1,
            owner_id: winner,
            player_index,
            player,
            price,
        };
        info!(
            pick = sale.pick_number,
            owner = winner,
            player = %sale.player,
            price,
            "player sold"
        );
        self.sales.push(sale.clone());

        self.advance_turn();
        Ok(TickOutcome::Sold(sale))
    }

    /// Pass the nomination to the next owner (by index, wrapping) who still
    /// has open slots, or finish the auction if nobody does.
    fn advance_turn(&mut self) {
        let count = self.owners.len();
        let next = (1..=count)
            .map(|step| (self.turn_index + step) % count)
            .find(|&idx| self.owners[idx].remaining_picks() > 0);

        match next {
            Some(idx) => {
                self.turn_index = idx;
                self.state = AuctionState::Nominate;
            }
            None => {
                self.state = AuctionState::Done;
                info!(sales = self.sales.len(), "auction complete");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Results
    // -----------------------------------------------------------------------

    /// Each owner's weighted score, by owner index. Meaningful once DONE.
    ///
    /// `starter_weight` in [0, 1] sets how much the starting lineup counts
    /// relative to the bench.
    pub fn scores(&self, starter_weight: f64) -> Vec<f64> {
        self.owners
            .iter()
            .map(|o| o.score(starter_weight))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn state(&self) -> AuctionState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == AuctionState::Done
    }

    /// Index of the owner whose turn it is to nominate.
    pub fn turn_index(&self) -> usize {
        self.turn_index
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn owner(&self, owner_id: usize) -> Option<&Owner> {
        self.owners.get(owner_id)
    }

    /// The full player catalog, in the order supplied at construction.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Players still available, highest value first.
    pub fn undrafted_players(&self) -> &[Player] {
        &self.undrafted
    }

    pub fn roster_template(&self) -> &[RosterSlotKind] {
        &self.roster
    }

    pub fn starting_money(&self) -> u32 {
        self.starting_money
    }

    /// The nomination waiting for the next tick, if any.
    pub fn pending_nomination(&self) -> Option<&Nomination> {
        self.pending.as_ref()
    }

    /// The player currently up for bidding.
    pub fn nominee(&self) -> Option<&Player> {
        self.nominee.map(|idx| &self.players[idx])
    }

    pub fn nominee_index(&self) -> Option<usize> {
        self.nominee
    }

    /// The accepted bid on the current nominee.
    pub fn current_bid(&self) -> Option<u32> {
        self.bid
    }

    /// Each owner's latest accepted bid on the current nominee.
    pub fn bids(&self) -> &[u32] {
        &self.bids
    }

    /// Bids submitted since the last tick.
    pub fn tick_bids(&self) -> &[u32] {
        &self.tick_bids
    }

    /// Owner holding the highest accepted bid, if any bid is standing.
    pub fn winning_owner_index(&self) -> Option<usize> {
        let mut winner = None;
        let mut price = 0;
        for (idx, &bid) in self.bids.iter().enumerate() {
            if bid > price {
                price = bid;
                winner = Some(idx);
            }
        }
        winner
    }

    /// Which owner bought the player at `player_index`, if anyone has.
    pub fn owner_of_player(&self, player_index: usize) -> Option<usize> {
        self.drafted_by.get(player_index).copied().flatten()
    }

    /// Catalog index of the player with the given id.
    pub fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// Every settled lot, in order.
    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn ensure_state(&self, expected: AuctionState, action: &'static str) -> Result<(), InvalidAction> {
        if self.state != expected {
            return Err(InvalidAction::WrongState {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn owner_checked(&self, owner_id: usize) -> Result<&Owner, InvalidAction> {
        self.owners.get(owner_id).ok_or(InvalidAction::UnknownOwner {
            owner_id,
            owner_count: self.owners.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    /// Always picks the last candidate.
    #[derive(Debug)]
    struct LastCandidate;

    impl TieBreaker for LastCandidate {
        fn choose(&mut self, candidates: &[usize]) -> usize {
            candidates[candidates.len() - 1]
        }
    }

    fn bench_only() -> Vec<RosterSlotKind> {
        vec![RosterSlotKind::bench()]
    }

    fn one_player() -> Vec<Player> {
        vec![Player::new(PlayerId(0), "Lonely", Position::Kicker, 1)]
    }

    fn auction(
        players: Vec<Player>,
        owners: usize,
        money: u32,
        roster: Vec<RosterSlotKind>,
    ) -> Auction<LastCandidate> {
        Auction::new(players, owners, money, roster, LastCandidate).unwrap()
    }

    #[test]
    fn setup_rejects_unplayable_arguments() {
        let err = Auction::new(one_player(), 0, 200, bench_only(), LastCandidate).unwrap_err();
        assert_eq!(err, SetupError::NoOwners);

        let err = Auction::new(one_player(), 2, 200, vec![], LastCandidate).unwrap_err();
        assert_eq!(err, SetupError::EmptyRoster);

        let roster = vec![RosterSlotKind::bench(); 3];
        let err = Auction::new(one_player(), 2, 2, roster, LastCandidate).unwrap_err();
        assert_eq!(err, SetupError::InsufficientStartingMoney { money: 2, slots: 3 });

        let dupes = vec![
            Player::new(PlayerId(5), "A", Position::Kicker, 1),
            Player::new(PlayerId(5), "B", Position::Kicker, 2),
        ];
        let err = Auction::new(dupes, 2, 200, bench_only(), LastCandidate).unwrap_err();
        assert_eq!(err, SetupError::DuplicatePlayerId { id: PlayerId(5) });
    }

    #[test]
    fn starts_in_nominate_with_owner_zero() {
        let a = auction(one_player(), 3, 200, bench_only());
        assert_eq!(a.state(), AuctionState::Nominate);
        assert_eq!(a.turn_index(), 0);
        assert!(a.nominee().is_none());
        assert_eq!(a.current_bid(), None);
        assert_eq!(a.bids(), &[0, 0, 0]);
    }

    #[test]
    fn tick_without_nominee_is_an_error() {
        let mut a = auction(one_player(), 2, 200, bench_only());
        assert_eq!(a.tick().unwrap_err(), TickError::NoNominee);
        assert_eq!(a.state(), AuctionState::Nominate);
    }

    #[test]
    fn basic_settle() {
        let mut a = auction(one_player(), 3, 200, bench_only());
        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        assert_eq!(a.state(), AuctionState::Bid);
        assert_eq!(a.bids(), &[1, 0, 0]);

        a.place_bid(2, 4).unwrap();
        a.tick().unwrap();
        assert_eq!(a.bids(), &[1, 0, 4]);
        assert_eq!(a.current_bid(), Some(4));

        let sale = match a.tick().unwrap() {
            TickOutcome::Sold(sale) => sale,
            other => panic!("expected a sale, got {other:?}"),
        };
        assert_eq!(sale.owner_id, 2);
        assert_eq!(sale.price, 4);
        assert_eq!(sale.pick_number, 1);
        assert_eq!(a.owners()[2].money(), 196);
        assert!(a.owners()[2].owns(&a.players()[0]));
        assert_eq!(a.owner_of_player(0), Some(2));
        assert!(a.undrafted_players().is_empty());

        // Owners 0 and 1 still have an open slot; the turn moves on.
        assert_eq!(a.state(), AuctionState::Nominate);
        assert_eq!(a.turn_index(), 1);
    }

    #[test]
    fn reaches_done_exactly_when_all_rosters_are_full() {
        let players: Vec<Player> = (0..3)
            .map(|i| Player::new(PlayerId(i), format!("P{i}"), Position::WideReceiver, 10 - i))
            .collect();
        let mut a = auction(players, 3, 10, bench_only());

        for pick in 0..3 {
            assert_eq!(a.state(), AuctionState::Nominate);
            let nominator = a.turn_index();
            let idx = a.player_index(a.undrafted_players()[0].id).unwrap();
            a.nominate(nominator, idx, 1).unwrap();
            a.tick().unwrap();
            a.tick().unwrap();
            assert_eq!(a.owners()[nominator].remaining_picks(), 0);
            if pick < 2 {
                assert_ne!(a.state(), AuctionState::Done);
            }
        }
        assert_eq!(a.state(), AuctionState::Done);
        assert!(matches!(a.tick().unwrap(), TickOutcome::Idle));
        assert!(a.owners().iter().all(|o| o.remaining_picks() == 0));
    }

    #[test]
    fn turn_skips_owners_with_full_rosters() {
        let players: Vec<Player> = (0..4)
            .map(|i| Player::new(PlayerId(i), format!("P{i}"), Position::RunningBack, 5))
            .collect();
        let roster = vec![RosterSlotKind::bench(); 2];
        let mut a = auction(players, 3, 20, roster);

        // Owner 0 nominates, owner 1 buys.
        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        a.place_bid(1, 2).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        assert_eq!(a.turn_index(), 1);

        // Owner 1 nominates and buys again, filling their roster.
        a.nominate(1, 1, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        assert_eq!(a.owners()[1].remaining_picks(), 0);
        assert_eq!(a.turn_index(), 2);

        // Owner 2 nominates and buys; owner 0 is next.
        a.nominate(2, 2, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        assert_eq!(a.turn_index(), 0);

        // Owner 0 buys; owner 1 is full, so the turn jumps to owner 2.
        a.nominate(0, 3, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        assert_eq!(a.turn_index(), 2);
    }

    #[test]
    fn nominate_rejections_do_not_mutate() {
        let players = vec![
            Player::new(PlayerId(0), "QB1", Position::Quarterback, 30),
            Player::new(PlayerId(1), "K1", Position::Kicker, 3),
        ];
        let roster = vec![RosterSlotKind::from_label("QB").unwrap()];
        let mut a = auction(players, 2, 10, roster);

        assert_eq!(
            a.nominate(1, 0, 1),
            Err(InvalidAction::NotYourTurn { owner_id: 1, turn_index: 0 })
        );
        assert_eq!(
            a.nominate(5, 0, 1),
            Err(InvalidAction::UnknownOwner { owner_id: 5, owner_count: 2 })
        );
        assert_eq!(
            a.nominate(0, 9, 1),
            Err(InvalidAction::UnknownPlayer { player_index: 9, player_count: 2 })
        );
        assert_eq!(a.nominate(0, 0, 0), Err(InvalidAction::BidBelowMinimum { bid: 0 }));
        assert_eq!(
            a.nominate(0, 0, 11),
            Err(InvalidAction::ExceedsMaxBid { owner_id: 0, bid: 11, max_bid: 10 })
        );
        let err = a.nominate(0, 1, 1).unwrap_err();
        assert_eq!(err.violation(), Violation::UnreachableMarket);

        assert!(a.pending_nomination().is_none());
        assert_eq!(a.state(), AuctionState::Nominate);
    }

    #[test]
    fn renomination_overwrites_until_tick() {
        let players: Vec<Player> = (0..2)
            .map(|i| Player::new(PlayerId(i), format!("P{i}"), Position::Kicker, 5))
            .collect();
        let mut a = auction(players, 2, 20, bench_only());

        a.nominate(0, 0, 1).unwrap();
        a.nominate(0, 1, 3).unwrap();
        assert_eq!(
            a.pending_nomination(),
            Some(&Nomination { owner_id: 0, player_index: 1, bid: 3 })
        );
        a.tick().unwrap();
        assert_eq!(a.nominee_index(), Some(1));
        assert_eq!(a.current_bid(), Some(3));
        assert_eq!(a.bids(), &[3, 0]);
    }

    #[test]
    fn place_bid_rejections_do_not_mutate() {
        let mut a = auction(one_player(), 3, 10, bench_only());
        assert_eq!(
            a.place_bid(1, 2).unwrap_err().violation(),
            Violation::Sequencing
        );

        a.nominate(0, 0, 2).unwrap();
        a.tick().unwrap();

        assert_eq!(
            a.place_bid(1, 2),
            Err(InvalidAction::BidNotAboveCurrent { bid: 2, current_bid: 2 })
        );
        assert_eq!(
            a.place_bid(2, 1),
            Err(InvalidAction::BidNotAboveCurrent { bid: 1, current_bid: 2 })
        );
        assert_eq!(
            a.place_bid(1, 11),
            Err(InvalidAction::ExceedsMaxBid { owner_id: 1, bid: 11, max_bid: 10 })
        );
        assert_eq!(a.bids(), &[2, 0, 0]);
        assert_eq!(a.tick_bids(), &[0, 0, 0]);
        assert_eq!(a.current_bid(), Some(2));
    }

    #[test]
    fn rejected_bids_keep_earlier_submissions() {
        let players = vec![
            Player::new(PlayerId(0), "K1", Position::Kicker, 5),
            Player::new(PlayerId(1), "QB1", Position::Quarterback, 9),
            Player::new(PlayerId(2), "QB2", Position::Quarterback, 8),
            Player::new(PlayerId(3), "K2", Position::Kicker, 4),
        ];
        let roster = vec![
            RosterSlotKind::from_label("K").unwrap(),
            RosterSlotKind::from_label("QB").unwrap(),
        ];
        let mut a = auction(players, 3, 10, roster);
        for (owner, player) in [(0, 0), (1, 1), (2, 2)] {
            a.nominate(owner, player, 1).unwrap();
            a.tick().unwrap();
            a.tick().unwrap();
        }

        // Owner 0's kicker slot is taken; the others can still use K2.
        a.nominate(0, 3, 1).unwrap();
        a.tick().unwrap();
        a.place_bid(2, 3).unwrap();

        let err = a.place_bid(0, 4).unwrap_err();
        assert_eq!(
            err,
            InvalidAction::NoRosterSlot { owner_id: 0, player: "K2".into() }
        );
        assert_eq!(err.violation(), Violation::Roster);

        let low = a.place_bid(1, 1).unwrap_err();
        assert_eq!(
            low,
            InvalidAction::BidNotAboveCurrent { bid: 1, current_bid: 1 }
        );
        assert_eq!(low.violation(), Violation::Economic);

        assert_eq!(a.tick_bids(), &[0, 0, 3]);
        assert_eq!(a.bids(), &[1, 0, 0]);
        a.tick().unwrap();
        assert_eq!(a.winning_owner_index(), Some(2));
    }

    #[test]
    fn nominating_during_bid_is_a_sequencing_violation() {
        let mut a = auction(one_player(), 2, 10, bench_only());
        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        let err = a.nominate(0, 0, 2).unwrap_err();
        assert_eq!(
            err,
            InvalidAction::WrongState { action: "nominate", state: AuctionState::Bid }
        );
        assert_eq!(err.violation(), Violation::Sequencing);
    }

    #[test]
    fn resubmission_overwrites_within_a_tick() {
        let mut a = auction(one_player(), 2, 10, bench_only());
        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        a.place_bid(1, 5).unwrap();
        a.place_bid(1, 3).unwrap();
        assert_eq!(a.tick_bids(), &[0, 3]);
        a.tick().unwrap();
        assert_eq!(a.current_bid(), Some(3));
    }

    #[test]
    fn equal_top_bids_go_to_the_tie_breaker() {
        let mut a = auction(one_player(), 3, 10, bench_only());
        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        a.place_bid(0, 2).unwrap();
        a.place_bid(1, 4).unwrap();
        a.place_bid(2, 4).unwrap();

        match a.tick().unwrap() {
            TickOutcome::BidAccepted { owner_id, bid, contenders } => {
                assert_eq!(owner_id, 2);
                assert_eq!(bid, 4);
                assert_eq!(contenders, 2);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(a.bids(), &[1, 0, 4]);
        assert_eq!(a.winning_owner_index(), Some(2));
    }

    #[test]
    fn settlement_failure_leaves_bidding_open() {
        let players = vec![
            Player::new(PlayerId(0), "K1", Position::Kicker, 5),
            Player::new(PlayerId(1), "QB1", Position::Quarterback, 9),
            Player::new(PlayerId(2), "K2", Position::Kicker, 4),
        ];
        let roster = vec![
            RosterSlotKind::from_label("K").unwrap(),
            RosterSlotKind::from_label("QB").unwrap(),
        ];
        let mut a = auction(players, 2, 10, roster);

        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        a.nominate(1, 1, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();

        // Owner 0's kicker slot is full, but owner 1 could still buy K2,
        // so the nomination itself is legal.
        a.nominate(0, 2, 1).unwrap();
        a.tick().unwrap();
        let err = a.tick().unwrap_err();
        assert!(matches!(err, TickError::Settlement { owner_id: 0, .. }));
        assert_eq!(a.state(), AuctionState::Bid);
        assert_eq!(a.nominee_index(), Some(2));
        assert_eq!(a.owners()[0].money(), 9);

        a.place_bid(1, 2).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        assert_eq!(a.owner_of_player(2), Some(1));
        assert!(a.is_done() || a.state() == AuctionState::Nominate);
    }

    #[test]
    fn scores_follow_owner_order() {
        let players = vec![
            Player::new(PlayerId(0), "Star", Position::Quarterback, 30),
            Player::new(PlayerId(1), "Scrub", Position::Quarterback, 4),
        ];
        let roster = vec![RosterSlotKind::from_label("QB").unwrap()];
        let mut a = auction(players, 2, 10, roster);

        a.nominate(0, 0, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();
        a.nominate(1, 1, 1).unwrap();
        a.tick().unwrap();
        a.tick().unwrap();

        assert!(a.is_done());
        assert_eq!(a.scores(1.0), vec![30.0, 4.0]);
        assert_eq!(a.scores(0.0), vec![0.0, 0.0]);
    }
}
