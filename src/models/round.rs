//! Round and RoundFormat.

use crate::models::game::{GameMatch, MatchStatus};
use crate::models::team::Team;
use serde::{Deserialize, Serialize};

/// Identifier of a round as assigned by the backend.
pub type RoundId = i64;

/// How the matches of a round are generated and decided.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundFormat {
    /// Single elimination: the winner of each match advances.
    Knockout,
    /// Every pair of entrants plays once.
    RoundRobin,
    /// No format chosen yet; the round has no matches.
    #[default]
    Unset,
}

impl std::fmt::Display for RoundFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RoundFormat::Knockout => "KNOCKOUT",
            RoundFormat::RoundRobin => "ROUND_ROBIN",
            RoundFormat::Unset => "UNSET",
        };
        f.write_str(s)
    }
}

/// One round of a fixture.
///
/// `round_value` counts down towards the final: the first round has the highest value and the
/// final has value 1, so sorting by `round_value` descending yields play order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    #[serde(default)]
    pub id: Option<RoundId>,
    pub round_value: u32,
    #[serde(default)]
    pub round_name: String,
    #[serde(default, alias = "type")]
    pub format: RoundFormat,
    /// Entrants of this round: the roster for the first round, advancers afterwards.
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
}

impl Round {
    /// A new round without a format or matches.
    pub fn new(round_value: u32, round_name: impl Into<String>, teams: Vec<Team>) -> Self {
        Self {
            id: None,
            round_value,
            round_name: round_name.into(),
            format: RoundFormat::Unset,
            teams,
            matches: Vec::new(),
        }
    }

    /// All matches are completed or cancelled (and there is at least one).
    pub fn is_decided(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(|m| m.status.is_terminal())
    }

    pub fn completed_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Completed)
    }

    /// Distinct non-bye teams across all matches, in order of first appearance.
    pub fn distinct_teams(&self) -> Vec<Team> {
        let mut seen: Vec<Team> = Vec::new();
        for t in self.matches.iter().flat_map(GameMatch::teams) {
            if !seen.iter().any(|s| s.id == t.id && s.name == t.name) {
                seen.push(t.clone());
            }
        }
        seen
    }
}
