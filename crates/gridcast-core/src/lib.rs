// Library root: the auction state machine and the value types it trades in.

pub mod auction;
pub mod owner;
pub mod player;
pub mod position;
pub mod tiebreak;

pub use auction::{
    Auction, AuctionState, InvalidAction, Nomination, Sale, SetupError, TickError, TickOutcome,
    Violation,
};
pub use owner::{Owner, OwnerError, OwnerSlot, Purchase};
pub use player::{Player, PlayerId};
pub use position::{Position, RosterSlotKind};
pub use tiebreak::{RandomTieBreaker, TieBreaker};
