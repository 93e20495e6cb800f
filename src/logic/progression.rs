//! Round lifecycle on a fixture: format selection, results, advancement.
//!
//! Rounds further down the bracket are derived from earlier ones. Anything that changes who
//! advances from a round (a new format, a different winner) deletes every later round.

use crate::logic::naming::round_name;
use crate::logic::pairing::next_round_matches;
use crate::logic::standings::{advancers, AdvancementPolicy};
use crate::models::{BracketError, Fixture, GameMatch, MatchStatus, Round, RoundFormat, Team, TeamId};

/// Choose the format of a round and generate its matches from the round's entrants.
///
/// Any round after this one was built from the old matches and is removed.
pub fn select_round_type(
    fixture: &mut Fixture,
    round_value: u32,
    format: RoundFormat,
) -> Result<(), BracketError> {
    if format == RoundFormat::Unset {
        return Err(BracketError::UnsetFormat);
    }
    let teams = fixture.round(round_value)?.teams.clone();
    // Entrants of this round are the advancers of a virtual round one step earlier.
    let drafts = next_round_matches(&teams, format, round_value + 1)?;

    let tournament_id = fixture.tournament_id;
    let removed = fixture.remove_rounds_after(round_value);
    if removed > 0 {
        log::info!(
            "Tournament {}: regenerating round {} removed {} later round(s)",
            tournament_id,
            round_value,
            removed
        );
    }
    let round = fixture.round_mut(round_value)?;
    round.format = format;
    round.matches = drafts.into_iter().map(GameMatch::from).collect();
    log::info!(
        "Tournament {}: round {} ({}) set to {} with {} match(es)",
        tournament_id,
        round_value,
        round.round_name,
        format,
        round.matches.len()
    );
    Ok(())
}

fn match_mut(
    fixture: &mut Fixture,
    round_value: u32,
    index: usize,
) -> Result<&mut GameMatch, BracketError> {
    fixture
        .round_mut(round_value)?
        .matches
        .get_mut(index)
        .ok_or(BracketError::MatchNotFound { round_value, index })
}

/// Move a match along its lifecycle (SCHEDULED -> ONGOING -> COMPLETED | CANCELLED).
pub fn set_match_status(
    fixture: &mut Fixture,
    round_value: u32,
    index: usize,
    status: MatchStatus,
) -> Result<(), BracketError> {
    let m = match_mut(fixture, round_value, index)?;
    if !m.status.can_transition_to(status) {
        return Err(BracketError::InvalidStatusTransition {
            from: m.status,
            to: status,
        });
    }
    m.status = status;
    if status != MatchStatus::Completed {
        m.winner_team_id = None;
    }
    Ok(())
}

/// Record the winner (and optionally the score) of a match and mark it completed.
///
/// The winner must be a concrete team: a placeholder slot has not been decided yet. Without a
/// score, any previously recorded score is cleared.
///
/// A completed match may be corrected. If the winner changes, later rounds are removed since
/// they were built from the old winner.
pub fn record_result(
    fixture: &mut Fixture,
    round_value: u32,
    index: usize,
    winner_team_id: TeamId,
    score: Option<(u32, u32)>,
) -> Result<(), BracketError> {
    let m = match_mut(fixture, round_value, index)?;
    if m.status == MatchStatus::Cancelled {
        return Err(BracketError::InvalidStatusTransition {
            from: m.status,
            to: MatchStatus::Completed,
        });
    }
    match m.team(winner_team_id) {
        None => return Err(BracketError::WinnerNotInMatch(winner_team_id)),
        Some(t) if t.is_placeholder => {
            return Err(BracketError::UndecidedWinner(winner_team_id))
        }
        Some(_) => {}
    }
    let changed = m.status == MatchStatus::Completed && m.winner_team_id != Some(winner_team_id);
    m.status = MatchStatus::Completed;
    m.winner_team_id = Some(winner_team_id);
    m.team_1_score = score.map(|(s1, _)| s1);
    m.team_2_score = score.map(|(_, s2)| s2);

    if changed {
        let removed = fixture.remove_rounds_after(round_value);
        log::info!(
            "Tournament {}: winner of match {} in round {} corrected, removed {} later round(s)",
            fixture.tournament_id,
            index + 1,
            round_value,
            removed
        );
    }
    Ok(())
}

/// Build the round after `round_value` from its advancers. The new round has no format yet.
///
/// Undecided matches contribute placeholders, so the bracket can be previewed before all
/// results are in; `resolve_placeholders` fills them in later.
pub fn advance_round(
    fixture: &mut Fixture,
    round_value: u32,
    policy: AdvancementPolicy,
) -> Result<(), BracketError> {
    let round = fixture.round(round_value)?;
    if round_value <= 1 {
        return Err(BracketError::NoFurtherRound(round_value));
    }
    let next_teams = advancers(round, policy)?;
    if next_teams.len() < 2 {
        return Err(BracketError::InsufficientAdvancers {
            found: next_teams.len(),
        });
    }

    let next_value = round_value - 1;
    let name = round_name(next_value, next_teams.len());
    fixture.remove_rounds_after(round_value);
    log::info!(
        "Tournament {}: advancing {} team(s) into round {} ({})",
        fixture.tournament_id,
        next_teams.len(),
        next_value,
        name
    );
    fixture.rounds.push(Round::new(next_value, name, next_teams));
    fixture.sort_rounds();
    Ok(())
}

/// Swap placeholders for the teams that have since won their slot. Returns how many slots
/// were filled.
pub fn resolve_placeholders(
    fixture: &mut Fixture,
    policy: AdvancementPolicy,
) -> Result<usize, BracketError> {
    fixture.sort_rounds();
    let mut resolved = 0;
    for i in 0..fixture.rounds.len().saturating_sub(1) {
        let round = &fixture.rounds[i];
        if round.format == RoundFormat::Unset {
            continue;
        }
        let winners = advancers(round, policy)?;
        let next_value = round.round_value - 1;
        let next = &mut fixture.rounds[i + 1];
        if next.round_value != next_value {
            continue;
        }
        for (slot, winner) in winners.iter().enumerate() {
            if winner.is_placeholder {
                continue;
            }
            let Some(current) = next.teams.get(slot) else {
                break;
            };
            if !current.is_placeholder {
                continue;
            }
            let stale = current.clone();
            next.teams[slot] = winner.clone();
            for m in &mut next.matches {
                replace_team(&mut m.team_1, &stale, winner);
                if let Some(t) = m.team_2.as_mut() {
                    replace_team(t, &stale, winner);
                }
            }
            log::debug!("Round {}: {} is now {}", next_value, stale.name, winner.name);
            resolved += 1;
        }
    }
    Ok(resolved)
}

fn replace_team(slot: &mut Team, stale: &Team, winner: &Team) {
    if slot == stale {
        *slot = winner.clone();
    }
}
