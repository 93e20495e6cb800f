//! Fixture (all rounds of one tournament) and BracketError.

use crate::models::game::MatchStatus;
use crate::models::round::Round;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Errors that can occur during bracket computation and fixture operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Fewer than 2 advancers when generating a round.
    InsufficientAdvancers { found: usize },
    /// Bracket sizing needs at least 2 teams.
    InvalidTeamCount(usize),
    /// The round has no format chosen yet.
    UnsetFormat,
    /// No round with this round value in the fixture.
    RoundNotFound(u32),
    /// No match at this position in the round.
    MatchNotFound { round_value: u32, index: usize },
    /// Match status change not allowed by the match lifecycle.
    InvalidStatusTransition { from: MatchStatus, to: MatchStatus },
    /// The reported winner does not play in the match.
    WinnerNotInMatch(TeamId),
    /// The round is the last one the bracket has room for.
    NoFurtherRound(u32),
    /// The chosen winner is a placeholder for a match that is not decided yet.
    UndecidedWinner(TeamId),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InsufficientAdvancers { found } => write!(
                f,
                "At least 2 advancing teams are needed to generate a round (found {})",
                found
            ),
            BracketError::InvalidTeamCount(n) => {
                write!(f, "A bracket needs at least 2 teams (got {})", n)
            }
            BracketError::UnsetFormat => write!(f, "Choose a round format first"),
            BracketError::RoundNotFound(v) => write!(f, "No round with value {}", v),
            BracketError::MatchNotFound { round_value, index } => {
                write!(f, "No match {} in round {}", index, round_value)
            }
            BracketError::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot change match status from {} to {}", from, to)
            }
            BracketError::WinnerNotInMatch(id) => {
                write!(f, "Team {} does not play in this match", id)
            }
            BracketError::NoFurtherRound(v) => {
                write!(f, "Round {} is the last round of the bracket", v)
            }
            BracketError::UndecidedWinner(id) => {
                write!(f, "Team {} is a placeholder and cannot win a match yet", id)
            }
        }
    }
}

impl std::error::Error for BracketError {}

/// Identifier of a tournament as assigned by the backend.
pub type TournamentId = i64;

/// All rounds of one tournament, earliest round first (descending `round_value`).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub tournament_id: TournamentId,
    /// Rounds a single-elimination bracket of the roster can go through.
    pub total_rounds: u32,
    pub rounds: Vec<Round>,
}

impl Fixture {
    /// An empty fixture; rounds are added by `start_fixture` and `advance_round`.
    pub fn new(tournament_id: TournamentId, total_rounds: u32) -> Self {
        Self {
            tournament_id,
            total_rounds,
            rounds: Vec::new(),
        }
    }

    pub fn round(&self, round_value: u32) -> Result<&Round, BracketError> {
        self.rounds
            .iter()
            .find(|r| r.round_value == round_value)
            .ok_or(BracketError::RoundNotFound(round_value))
    }

    pub fn round_mut(&mut self, round_value: u32) -> Result<&mut Round, BracketError> {
        self.rounds
            .iter_mut()
            .find(|r| r.round_value == round_value)
            .ok_or(BracketError::RoundNotFound(round_value))
    }

    /// Drop every round played after `round_value`. Returns how many were removed.
    pub fn remove_rounds_after(&mut self, round_value: u32) -> usize {
        let before = self.rounds.len();
        self.rounds.retain(|r| r.round_value >= round_value);
        before - self.rounds.len()
    }

    /// Keep rounds in play order.
    pub fn sort_rounds(&mut self) {
        self.rounds.sort_by(|a, b| b.round_value.cmp(&a.round_value));
    }
}
