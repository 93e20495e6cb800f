//! Next-round generation: knockout pairs and round-robin groups.

use crate::models::{BracketError, MatchDraft, RoundFormat, Team};

/// Generate the matches of the round after the one valued `generating_round_value`.
///
/// Knockout pairs advancers as (0,1), (2,3), ...; an odd last team gets a bye match so it
/// advances instead of being dropped. Round robin plays every unordered pair once.
/// Every draft is scheduled, without a winner, and valued `generating_round_value - 1`.
pub fn next_round_matches(
    advancers: &[Team],
    format: RoundFormat,
    generating_round_value: u32,
) -> Result<Vec<MatchDraft>, BracketError> {
    if advancers.len() < 2 {
        return Err(BracketError::InsufficientAdvancers {
            found: advancers.len(),
        });
    }
    // Round values count down to 1; nothing comes after a round valued 0.
    if generating_round_value == 0 {
        return Err(BracketError::NoFurtherRound(0));
    }
    pair_teams(advancers, format, generating_round_value - 1)
}

/// Pair `teams` into drafts for the round valued `round_value`.
fn pair_teams(
    teams: &[Team],
    format: RoundFormat,
    round_value: u32,
) -> Result<Vec<MatchDraft>, BracketError> {
    let drafts: Vec<MatchDraft> = match format {
        RoundFormat::Unset => return Err(BracketError::UnsetFormat),
        RoundFormat::Knockout => teams
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => MatchDraft::new(a.clone(), Some(b.clone()), round_value),
                [last] => {
                    log::debug!("{} gets a bye in round {}", last.name, round_value);
                    MatchDraft::new(last.clone(), Some(Team::bye()), round_value)
                }
                _ => unreachable!("chunks(2) yields one or two teams"),
            })
            .collect(),
        RoundFormat::RoundRobin => teams
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                teams[i + 1..]
                    .iter()
                    .map(move |b| MatchDraft::new(a.clone(), Some(b.clone()), round_value))
            })
            .collect(),
    };
    log::debug!(
        "Generated {} {} match(es) for {} team(s)",
        drafts.len(),
        format,
        teams.len()
    );
    Ok(drafts)
}
