// Drives an auction to completion with bots playing every owner.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use gridcast_core::{
    Auction, AuctionState, InvalidAction, Position, TickError, TickOutcome, TieBreaker,
};

use crate::bot::ValueBot;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("owner {owner_id} has {remaining_picks} open slots but no player can be nominated")]
    Stalled {
        owner_id: usize,
        remaining_picks: usize,
    },

    #[error("draft did not finish within {max_ticks} ticks")]
    TickLimit { max_ticks: usize },

    #[error("no bot plays owner {owner_id}")]
    MissingBot { owner_id: usize },

    #[error("bot action rejected: {0}")]
    Action(#[from] InvalidAction),

    #[error(transparent)]
    Tick(#[from] TickError),
}

/// Run bots against `auction` until it is DONE. Returns the number of ticks
/// taken.
///
/// Each iteration submits the actions the bots want for the current state,
/// then ticks once.
pub fn run_draft<T: TieBreaker>(
    auction: &mut Auction<T>,
    bots: &[ValueBot],
    max_ticks: usize,
) -> Result<usize, DraftError> {
    for ticks in 0..max_ticks {
        match auction.state() {
            AuctionState::Done => {
                info!(ticks, picks = auction.sales().len(), "draft finished");
                return Ok(ticks);
            }
            AuctionState::Nominate => {
                let owner_id = auction.turn_index();
                let bot = bots
                    .iter()
                    .find(|b| b.owner_id() == owner_id)
                    .ok_or(DraftError::MissingBot { owner_id })?;
                let (player_index, bid) =
                    bot.choose_nomination(auction)
                        .ok_or_else(|| DraftError::Stalled {
                            owner_id,
                            remaining_picks: auction.owners()[owner_id].remaining_picks(),
                        })?;
                auction.nominate(owner_id, player_index, bid)?;
            }
            AuctionState::Bid => {
                for bot in bots {
                    if let Some(bid) = bot.choose_bid(auction) {
                        auction.place_bid(bot.owner_id(), bid)?;
                    }
                }
            }
        }

        match auction.tick()? {
            TickOutcome::BidAccepted {
                owner_id,
                bid,
                contenders,
            } if contenders > 1 => {
                debug!(owner_id, bid, contenders, "tied bid resolved");
            }
            _ => {}
        }
    }

    if auction.is_done() {
        Ok(max_ticks)
    } else {
        Err(DraftError::TickLimit { max_ticks })
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One roster slot in the final report.
#[derive(Debug, Clone, Serialize)]
pub struct SlotReport {
    pub slot: String,
    pub player: Option<String>,
    pub position: Option<Position>,
    pub value: Option<u32>,
    pub cost: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerReport {
    pub owner_id: usize,
    pub money_left: u32,
    pub spent: u32,
    pub start_value: f64,
    pub bench_value: f64,
    pub score: f64,
    pub roster: Vec<SlotReport>,
}

/// Serializable summary of a finished (or abandoned) draft.
#[derive(Debug, Clone, Serialize)]
pub struct DraftReport {
    pub league: String,
    pub starter_weight: f64,
    pub picks: usize,
    pub owners: Vec<OwnerReport>,
}

impl DraftReport {
    pub fn from_auction<T: TieBreaker>(
        league: &str,
        auction: &Auction<T>,
        starter_weight: f64,
    ) -> Self {
        let owners = auction
            .owners()
            .iter()
            .map(|owner| OwnerReport {
                owner_id: owner.id(),
                money_left: owner.money(),
                spent: owner.spent(),
                start_value: owner.start_value(),
                bench_value: owner.bench_value(),
                score: owner.score(starter_weight),
                roster: owner
                    .roster()
                    .iter()
                    .map(|slot| SlotReport {
                        slot: slot.kind.label().to_string(),
                        player: slot.occupant.as_ref().map(|p| p.player.name.clone()),
                        position: slot.occupant.as_ref().map(|p| p.player.position),
                        value: slot.occupant.as_ref().map(|p| p.player.value),
                        cost: slot.occupant.as_ref().map(|p| p.cost),
                    })
                    .collect(),
            })
            .collect();

        DraftReport {
            league: league.to_string(),
            starter_weight,
            picks: auction.sales().len(),
            owners,
        }
    }

    /// Owner with the best score; the lowest id wins a tie.
    pub fn leader(&self) -> Option<usize> {
        self.owners
            .iter()
            .fold(None::<&OwnerReport>, |best, o| match best {
                Some(b) if b.score >= o.score => Some(b),
                _ => Some(o),
            })
            .map(|o| o.owner_id)
    }
}
