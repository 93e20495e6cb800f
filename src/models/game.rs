//! Match (game), MatchStatus and MatchDraft for a single fixture slot.

use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a match as assigned by the backend.
pub type MatchId = i64;

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Completed and cancelled matches never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }

    /// SCHEDULED -> ONGOING -> COMPLETED | CANCELLED. A scheduled match may also be
    /// completed or cancelled directly (results entered after the fact, walkovers).
    pub fn can_transition_to(self, next: MatchStatus) -> bool {
        use MatchStatus::*;
        matches!(
            (self, next),
            (Scheduled, Ongoing) | (Scheduled, Completed) | (Scheduled, Cancelled)
                | (Ongoing, Completed)
                | (Ongoing, Cancelled)
        )
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Ongoing => "ONGOING",
            MatchStatus::Completed => "COMPLETED",
            MatchStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// A single match between two teams. `team_2` is `None` or the `BYE` sentinel when team 1
/// has no opponent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    #[serde(default)]
    pub id: Option<MatchId>,
    #[serde(rename = "team1")]
    pub team_1: Team,
    #[serde(rename = "team2", default)]
    pub team_2: Option<Team>,
    #[serde(default)]
    pub status: MatchStatus,
    /// Set once the match is completed.
    #[serde(default)]
    pub winner_team_id: Option<TeamId>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(rename = "team1Score", default)]
    pub team_1_score: Option<u32>,
    #[serde(rename = "team2Score", default)]
    pub team_2_score: Option<u32>,
}

impl GameMatch {
    pub fn new(team_1: Team, team_2: Option<Team>) -> Self {
        Self {
            id: None,
            team_1,
            team_2,
            status: MatchStatus::Scheduled,
            winner_team_id: None,
            venue: None,
            scheduled_time: None,
            team_1_score: None,
            team_2_score: None,
        }
    }

    /// True when team 1 has no real opponent and advances automatically.
    pub fn is_bye(&self) -> bool {
        self.team_2.as_ref().map_or(true, Team::is_bye)
    }

    /// The non-bye teams taking part in this match.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        std::iter::once(&self.team_1)
            .chain(self.team_2.iter())
            .filter(|t| !t.is_bye())
    }

    /// Look up a participating team by id.
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams().find(|t| t.id == id)
    }

    /// The winning team, if the match is completed with a winner that plays in it.
    pub fn winner(&self) -> Option<&Team> {
        if self.status != MatchStatus::Completed {
            return None;
        }
        self.winner_team_id.and_then(|id| self.team(id))
    }
}

/// A match produced by next-round generation, before the backend assigns it an id.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDraft {
    #[serde(rename = "team1")]
    pub team_1: Team,
    #[serde(rename = "team2")]
    pub team_2: Option<Team>,
    pub status: MatchStatus,
    pub winner_team_id: Option<TeamId>,
    pub round_value: u32,
}

impl MatchDraft {
    pub fn new(team_1: Team, team_2: Option<Team>, round_value: u32) -> Self {
        Self {
            team_1,
            team_2,
            status: MatchStatus::Scheduled,
            winner_team_id: None,
            round_value,
        }
    }
}

impl From<MatchDraft> for GameMatch {
    fn from(draft: MatchDraft) -> Self {
        GameMatch::new(draft.team_1, draft.team_2)
    }
}
