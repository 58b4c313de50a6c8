// Stock league setups.

use gridcast_core::{Auction, Player, RosterSlotKind, SetupError, TieBreaker};

/// Slot labels of a typical 15-player league roster.
pub const DEFAULT_ROSTER_LABELS: &[&str] = &[
    "QB", "RB", "RB", "WR", "WR", "WR/RB/TE", "TE", "K", "DST", "BN", "BN", "BN", "BN", "BN", "BN",
];

pub const DEFAULT_OWNERS: usize = 3;
pub const DEFAULT_MONEY: u32 = 200;

/// QB, RB, RB, WR, WR, WR/RB/TE, TE, K, DST and six bench spots.
pub fn default_roster() -> Vec<RosterSlotKind> {
    DEFAULT_ROSTER_LABELS
        .iter()
        .filter_map(|label| RosterSlotKind::from_label(label))
        .collect()
}

/// A three-owner, $200 auction over `players` using [`default_roster`].
pub fn default_auction<T: TieBreaker>(
    players: Vec<Player>,
    tie_breaker: T,
) -> Result<Auction<T>, SetupError> {
    Auction::new(
        players,
        DEFAULT_OWNERS,
        DEFAULT_MONEY,
        default_roster(),
        tie_breaker,
    )
}
