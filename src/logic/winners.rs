//! Advancement: who moves on from a round.

use crate::models::{BracketError, GameMatch, MatchStatus, Round, RoundFormat, Team, TeamId};

/// Placeholder id for the slot at `index`. Negative so it never clashes with backend ids.
fn placeholder_id(index: usize) -> TeamId {
    -(index as TeamId + 1)
}

/// Compute the teams advancing from `round`.
///
/// Knockout: one entry per match, in match order. A completed match yields its winner, a bye
/// yields team 1 whatever the status, anything else yields a "Match N Winner" placeholder.
///
/// Round robin: `advancing_count` placeholders. No ranking is applied here; see
/// [`crate::logic::ranked_advancers`] for the standings-based variant.
pub fn compute_winners(round: &Round) -> Result<Vec<Team>, BracketError> {
    match round.format {
        RoundFormat::Unset => Err(BracketError::UnsetFormat),
        RoundFormat::Knockout => Ok(round
            .matches
            .iter()
            .enumerate()
            .map(|(i, m)| knockout_advancer(i, m))
            .collect()),
        RoundFormat::RoundRobin => {
            let count = advancing_count(round.distinct_teams().len());
            Ok((0..count)
                .map(|i| Team::placeholder(placeholder_id(i), format!("Qualifier {}", i + 1)))
                .collect())
        }
    }
}

fn knockout_advancer(index: usize, m: &GameMatch) -> Team {
    if let Some(winner) = m.winner() {
        return winner.clone();
    }
    if m.winner_team_id.is_some() && m.status == MatchStatus::Completed {
        log::warn!(
            "Match {} reports winner {:?} which does not play in it",
            index + 1,
            m.winner_team_id
        );
    }
    if m.is_bye() {
        return m.team_1.clone();
    }
    Team::placeholder(placeholder_id(index), format!("Match {} Winner", index + 1))
}

/// How many teams advance from a round-robin group of `distinct_teams`: the largest even
/// number not above half the group, but never fewer than `min(2, distinct_teams)`.
pub fn advancing_count(distinct_teams: usize) -> usize {
    let half = distinct_teams / 2;
    let even = half - half % 2;
    if even < 2 {
        distinct_teams.min(2)
    } else {
        even
    }
}

/// Replace locally synthesized placeholders with the ones the backend persisted for the same
/// slot (same index). Concrete teams are kept; surplus backend entries are ignored.
pub fn prefer_backend_placeholders(local: &[Team], backend: &[Team]) -> Vec<Team> {
    local
        .iter()
        .enumerate()
        .map(|(i, t)| match backend.get(i) {
            Some(persisted) if t.is_placeholder => Team {
                is_placeholder: true,
                ..persisted.clone()
            },
            _ => t.clone(),
        })
        .collect()
}
