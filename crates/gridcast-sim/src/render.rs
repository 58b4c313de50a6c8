// Plain-text views of an auction and its final standings.

use std::fmt;

use gridcast_core::{Auction, AuctionState, TieBreaker};

use crate::runner::DraftReport;

/// Multi-section snapshot: state header, per-owner bids, rosters, and the
/// undrafted pool in value order.
pub struct AuctionBoard<'a, T>(pub &'a Auction<T>);

impl<T: TieBreaker> fmt::Display for AuctionBoard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auction = self.0;

        match auction.state() {
            AuctionState::Nominate => {
                writeln!(f, "State: Nominating")?;
                writeln!(f, "Owner {}'s turn", auction.turn_index())?;
            }
            AuctionState::Bid => {
                writeln!(f, "State: Bidding\n")?;
                if let Some(nominee) = auction.nominee() {
                    writeln!(f, "Nominee: {nominee}\n")?;
                }
            }
            AuctionState::Done => writeln!(f, "State: Done\n")?,
        }

        for (i, owner) in auction.owners().iter().enumerate() {
            writeln!(
                f,
                "Owner {i}: ${} (Tick: ${} Max ${})",
                auction.bids()[i],
                auction.tick_bids()[i],
                owner.max_bid()
            )?;
        }

        writeln!(f, "\n###OWNER STATUS###")?;
        for (i, owner) in auction.owners().iter().enumerate() {
            writeln!(f, "Owner {i} (${} left)", owner.money())?;
            writeln!(f, "Roster:")?;
            for slot in owner.roster() {
                match &slot.occupant {
                    Some(purchase) => writeln!(
                        f,
                        "  {:<8} {} (${})",
                        slot.kind.label(),
                        purchase.player.name,
                        purchase.cost
                    )?,
                    None => writeln!(f, "  {:<8} Empty", slot.kind.label())?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "\n###UNDRAFTED PLAYERS###")?;
        for (i, player) in auction.undrafted_players().iter().enumerate() {
            writeln!(f, "{}. {player}", i + 1)?;
        }
        Ok(())
    }
}

/// Final standings, best score first.
pub struct Standings<'a>(pub &'a DraftReport);

impl fmt::Display for Standings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "{}: {} picks, starter weight {:.2}",
            report.league, report.picks, report.starter_weight
        )?;

        let mut order: Vec<&_> = report.owners.iter().collect();
        order.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.owner_id.cmp(&b.owner_id)));

        for (rank, owner) in order.iter().enumerate() {
            writeln!(
                f,
                "{}. Owner {}  score {:.1}  (start {:.0}, bench {:.0}, spent ${}, left ${})",
                rank + 1,
                owner.owner_id,
                owner.score,
                owner.start_value,
                owner.bench_value,
                owner.spent,
                owner.money_left
            )?;
        }
        Ok(())
    }
}

pub fn render_auction<T: TieBreaker>(auction: &Auction<T>) -> String {
    AuctionBoard(auction).to_string()
}

pub fn render_standings(report: &DraftReport) -> String {
    Standings(report).to_string()
}
