// Owner state: budget, roster slots, and purchase settlement.

use std::collections::HashSet;
use std::mem;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::player::{Player, PlayerId};
use crate::position::{Position, RosterSlotKind};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why an owner refused a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnerError {
    #[error("cost of ${cost} exceeds the max bid of ${max_bid}")]
    InsufficientFunds { cost: u32, max_bid: u32 },

    #[error("no empty roster slot accepts {position} {player}")]
    NoValidRosterSlot { player: String, position: Position },

    #[error("{player} is already owned")]
    AlreadyPurchased { player: String },
}

// ---------------------------------------------------------------------------
// Roster slots
// ---------------------------------------------------------------------------

/// A player bought at a given price.
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub player: Player,
    pub cost: u32,
}

/// One roster opening on a specific owner's team.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSlot {
    pub kind: RosterSlotKind,
    /// The purchase filling this slot, if any.
    pub occupant: Option<Purchase>,
}

impl OwnerSlot {
    fn empty(kind: RosterSlotKind) -> Self {
        OwnerSlot {
            kind,
            occupant: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    fn is_open_for(&self, player: &Player) -> bool {
        self.is_empty() && self.kind.accepts(player)
    }
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// A participant in the auction.
///
/// The roster is a private copy of the league template, sorted from most to
/// least specific slot (so bench slots come last). `money` only ever changes
/// through [`Owner::buy`], which keeps `starting_money - money` equal to the
/// total cost of everything on the roster.
#[derive(Debug, Clone, Serialize)]
pub struct Owner {
    id: usize,
    starting_money: u32,
    money: u32,
    roster: Vec<OwnerSlot>,
    #[serde(skip)]
    owned: HashSet<PlayerId>,
}

impl Owner {
    pub fn new(id: usize, money: u32, template: &[RosterSlotKind]) -> Self {
        let mut roster: Vec<OwnerSlot> = template.iter().cloned().map(OwnerSlot::empty).collect();
        // Stable sort: equally specific slots keep template order.
        roster.sort_by_key(|slot| slot.kind.specificity());

        Owner {
            id,
            starting_money: money,
            money,
            roster,
            owned: HashSet::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Money left to spend.
    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn starting_money(&self) -> u32 {
        self.starting_money
    }

    /// Total paid for every purchase so far.
    pub fn spent(&self) -> u32 {
        self.starting_money - self.money
    }

    /// Roster slots, most specific first.
    pub fn roster(&self) -> &[OwnerSlot] {
        &self.roster
    }

    /// Number of slots still waiting for a player.
    pub fn remaining_picks(&self) -> usize {
        self.roster.iter().filter(|s| s.is_empty()).count()
    }

    pub fn occupied_slot_count(&self) -> usize {
        self.roster.len() - self.remaining_picks()
    }

    pub fn total_slots(&self) -> usize {
        self.roster.len()
    }

    /// Maximum bid this owner can make right now.
    ///
    /// Every open slot must eventually be filled for at least $1, so $1 is
    /// held back for each remaining slot except the one being bid on.
    pub fn max_bid(&self) -> u32 {
        (self.money + 1).saturating_sub(self.remaining_picks() as u32)
    }

    pub fn owns(&self, player: &Player) -> bool {
        self.owned.contains(&player.id)
    }

    /// Every purchase as (player, cost, slot kind), in roster order.
    pub fn purchases(&self) -> impl Iterator<Item = (&Player, u32, &RosterSlotKind)> {
        self.roster.iter().filter_map(|slot| {
            slot.occupant
                .as_ref()
                .map(|p| (&p.player, p.cost, &slot.kind))
        })
    }

    /// Check whether `player` could be bought for `cost`, reporting the
    /// first reason it could not.
    pub fn check_purchase(&self, player: &Player, cost: u32) -> Result<(), OwnerError> {
        let max_bid = self.max_bid();
        if cost > max_bid {
            return Err(OwnerError::InsufficientFunds { cost, max_bid });
        }
        if !self.roster.iter().any(|s| s.is_open_for(player)) {
            return Err(OwnerError::NoValidRosterSlot {
                player: player.name.clone(),
                position: player.position,
            });
        }
        if self.owns(player) {
            return Err(OwnerError::AlreadyPurchased {
                player: player.name.clone(),
            });
        }
        Ok(())
    }

    /// Whether this owner has room for `player`, can afford `bid`, and does
    /// not already own the player.
    pub fn can_buy(&self, player: &Player, bid: u32) -> bool {
        self.check_purchase(player, bid).is_ok()
    }

    /// Buy `player` for `cost` and seat them on the roster.
    ///
    /// Either the purchase fully succeeds or the owner is left untouched.
    pub fn buy(&mut self, player: Player, cost: u32) -> Result<(), OwnerError> {
        self.check_purchase(&player, cost)?;

        self.money -= cost;
        self.owned.insert(player.id);
        self.seat(Purchase { player, cost });
        Ok(())
    }

    /// Place a new purchase so that higher-value players hold the most
    /// specific slots they are eligible for.
    fn seat(&mut self, purchase: Purchase) {
        let mut staged = self.roster.clone();
        if place_cascading(&mut staged, purchase.clone()) {
            self.roster = staged;
            return;
        }

        // Bumping left someone with no eligible seat. Only happens for
        // templates with overlapping flex slots of equal specificity.
        warn!(
            owner = self.id,
            player = %purchase.player,
            "cascading placement failed; seating in first open slot"
        );
        if let Some(slot) = self
            .roster
            .iter_mut()
            .find(|s| s.is_open_for(&purchase.player))
        {
            slot.occupant = Some(purchase);
        }
    }

    /// Value of everyone in the starting lineup.
    pub fn start_value(&self) -> f64 {
        self.lineup_value(false)
    }

    /// Value of everyone on the bench. 0 when there is no bench.
    pub fn bench_value(&self) -> f64 {
        self.lineup_value(true)
    }

    fn lineup_value(&self, bench: bool) -> f64 {
        self.roster
            .iter()
            .filter(|s| s.kind.is_bench() == bench)
            .filter_map(|s| s.occupant.as_ref())
            .map(|p| f64::from(p.player.value))
            .sum()
    }

    /// Weighted team score. `starter_weight` in [0, 1]: 1 ignores the bench
    /// entirely, 0 counts only the bench.
    pub fn score(&self, starter_weight: f64) -> f64 {
        self.start_value() * starter_weight + self.bench_value() * (1.0 - starter_weight)
    }
}

/// Scan slots in order. The first accepting slot that is empty takes the
/// pending purchase; the first accepting slot holding a lower-value player
/// takes it too, and the bumped player becomes pending with the scan
/// restarting at slot 0. Returns false if a pending player ends up with no
/// seat.
fn place_cascading(slots: &mut [OwnerSlot], purchase: Purchase) -> bool {
    let mut pending = purchase;
    'placing: loop {
        for slot in slots.iter_mut() {
            if !slot.kind.accepts(&pending.player) {
                continue;
            }
            if slot.occupant.is_none() {
                slot.occupant = Some(pending);
                return true;
            }
            if let Some(occupant) = slot.occupant.as_mut() {
                if pending.player.value > occupant.player.value {
                    pending = mem::replace(occupant, pending);
                    continue 'placing;
                }
            }
        }
        return false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
