//! Round-robin standings and standings-based advancement.

use crate::logic::winners::{advancing_count, compute_winners};
use crate::models::{BracketError, Round, RoundFormat, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Points for a win and a draw. A loss is worth nothing.
const POINTS_FOR_WIN: u32 = 3;
const POINTS_FOR_DRAW: u32 = 1;

/// One row of a round-robin table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub team: Team,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
    pub scored: u32,
    pub conceded: u32,
}

impl Standing {
    fn new(team: Team) -> Self {
        Self {
            team,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            points: 0,
            scored: 0,
            conceded: 0,
        }
    }

    fn add_win(&mut self) {
        self.played += 1;
        self.won += 1;
        self.points += POINTS_FOR_WIN;
    }

    fn add_draw(&mut self) {
        self.played += 1;
        self.drawn += 1;
        self.points += POINTS_FOR_DRAW;
    }

    fn add_loss(&mut self) {
        self.played += 1;
        self.lost += 1;
    }
}

/// Which teams a round-robin round sends on to the next round.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementPolicy {
    /// Unranked "Qualifier N" placeholders, as `compute_winners` returns.
    #[default]
    Placeholders,
    /// The top of the standings table once every match is decided.
    Standings,
}

impl std::str::FromStr for AdvancementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholders" => Ok(AdvancementPolicy::Placeholders),
            "standings" => Ok(AdvancementPolicy::Standings),
            other => Err(format!("unknown advancement policy: {}", other)),
        }
    }
}

/// Standings of a round from its completed matches.
///
/// Ordered by wins, then by wins among the teams tied on wins (head-to-head), then by name.
/// A completed match without a winner counts as a draw. Byes are ignored.
pub fn standings(round: &Round) -> Vec<Standing> {
    let mut rows: Vec<Standing> = round.distinct_teams().into_iter().map(Standing::new).collect();
    let index: HashMap<TeamId, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, s)| (s.team.id, i))
        .collect();

    // (winner, loser) pairs for head-to-head.
    let mut results: Vec<(TeamId, TeamId)> = Vec::new();

    for m in round.completed_matches() {
        let Some(team_2) = m.team_2.as_ref().filter(|t| !t.is_bye()) else {
            continue;
        };
        let (Some(&i1), Some(&i2)) = (index.get(&m.team_1.id), index.get(&team_2.id)) else {
            continue;
        };
        let s1 = m.team_1_score.unwrap_or(0);
        let s2 = m.team_2_score.unwrap_or(0);
        rows[i1].scored += s1;
        rows[i1].conceded += s2;
        rows[i2].scored += s2;
        rows[i2].conceded += s1;

        match m.winner_team_id {
            Some(w) if w == m.team_1.id => {
                rows[i1].add_win();
                rows[i2].add_loss();
                results.push((m.team_1.id, team_2.id));
            }
            Some(w) if w == team_2.id => {
                rows[i2].add_win();
                rows[i1].add_loss();
                results.push((team_2.id, m.team_1.id));
            }
            _ => {
                rows[i1].add_draw();
                rows[i2].add_draw();
            }
        }
    }

    // Head-to-head: wins against teams level on wins.
    let h2h: HashMap<TeamId, u32> = rows
        .iter()
        .map(|s| {
            let beaten = results
                .iter()
                .filter(|(w, l)| {
                    *w == s.team.id && rows.iter().any(|o| o.team.id == *l && o.won == s.won)
                })
                .count() as u32;
            (s.team.id, beaten)
        })
        .collect();

    rows.sort_by(|a, b| {
        b.won
            .cmp(&a.won)
            .then_with(|| h2h[&b.team.id].cmp(&h2h[&a.team.id]))
            .then_with(|| a.team.name.cmp(&b.team.name))
    });
    rows
}

/// Advancers of `round` under the standings policy: the top `advancing_count` teams of a
/// decided round-robin round. Knockout rounds and undecided round-robin rounds fall back to
/// [`compute_winners`].
pub fn ranked_advancers(round: &Round) -> Result<Vec<Team>, BracketError> {
    if round.format != RoundFormat::RoundRobin || !round.is_decided() {
        return compute_winners(round);
    }
    let table = standings(round);
    let count = advancing_count(table.len());
    Ok(table.into_iter().take(count).map(|s| s.team).collect())
}

/// Advancers of `round` according to `policy`.
pub fn advancers(round: &Round, policy: AdvancementPolicy) -> Result<Vec<Team>, BracketError> {
    match policy {
        AdvancementPolicy::Placeholders => compute_winners(round),
        AdvancementPolicy::Standings => ranked_advancers(round),
    }
}
