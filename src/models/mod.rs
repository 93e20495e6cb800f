//! Data structures for the bracket: teams, matches, rounds, fixtures.

mod fixture;
mod game;
mod round;
mod team;

pub use fixture::{BracketError, Fixture, TournamentId};
pub use game::{GameMatch, MatchDraft, MatchId, MatchStatus};
pub use round::{Round, RoundFormat, RoundId};
pub use team::{Team, TeamId, BYE};
