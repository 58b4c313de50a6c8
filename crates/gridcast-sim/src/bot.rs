// Computer-controlled owners.
//
// A bot never mutates the auction; it looks at the current state and
// proposes the action it wants the runner to submit.

use gridcast_core::{Auction, AuctionState, Player, TieBreaker};

/// Bids up to a fixed multiple of each player's cheatsheet value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBot {
    owner_id: usize,
    value_scale: f64,
}

impl ValueBot {
    pub fn new(owner_id: usize, value_scale: f64) -> Self {
        ValueBot {
            owner_id,
            value_scale,
        }
    }

    pub fn owner_id(&self) -> usize {
        self.owner_id
    }

    /// Most this bot will pay for `player`. Never below $1.
    pub fn limit(&self, player: &Player) -> u32 {
        let scaled = (f64::from(player.value) * self.value_scale).round();
        if scaled >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            (scaled as u32).max(1)
        }
    }

    /// `(player_index, opening_bid)` to nominate on this bot's turn.
    ///
    /// Prefers the most valuable player the bot can fit itself. Failing that,
    /// it puts up the most valuable player some other owner can take off its
    /// hands at $2, since a lot the nominator cannot settle has to be
    /// outbid. `None` when neither exists.
    pub fn choose_nomination<T: TieBreaker>(&self, auction: &Auction<T>) -> Option<(usize, u32)> {
        if auction.state() != AuctionState::Nominate || auction.turn_index() != self.owner_id {
            return None;
        }
        let me = auction.owner(self.owner_id)?;
        let undrafted = auction.undrafted_players();

        let own_pick = undrafted.iter().find(|p| me.can_buy(p, 1));
        let pick = own_pick.or_else(|| {
            undrafted.iter().find(|p| {
                auction
                    .owners()
                    .iter()
                    .any(|o| o.id() != self.owner_id && o.can_buy(p, 2))
            })
        })?;

        auction.player_index(pick.id).map(|idx| (idx, 1))
    }

    /// The raise this bot wants to submit on the current nominee, if any.
    ///
    /// The bot raises by $1 when someone else holds the high bid, it can
    /// afford and seat the player, and the price stays within its limit. It
    /// also raises past its limit when the standing high bidder could not
    /// complete the purchase.
    pub fn choose_bid<T: TieBreaker>(&self, auction: &Auction<T>) -> Option<u32> {
        if auction.state() != AuctionState::Bid {
            return None;
        }
        let nominee = auction.nominee()?;
        let current = auction.current_bid()?;
        let holder = auction.winning_owner_index();
        if holder == Some(self.owner_id) {
            return None;
        }

        let next = current.checked_add(1)?;
        let me = auction.owner(self.owner_id)?;
        if !me.can_buy(nominee, next) {
            return None;
        }

        let stranded = match holder.and_then(|h| auction.owner(h)) {
            Some(owner) => !owner.can_buy(nominee, current),
            None => true,
        };
        (next <= self.limit(nominee) || stranded).then_some(next)
    }
}
