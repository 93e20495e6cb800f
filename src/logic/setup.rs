//! Setup phase: roster import and the first round of a fixture.

use crate::logic::naming::{round_name, total_rounds_for_bracket};
use crate::models::{BracketError, Fixture, Round, Team, TeamId, TournamentId, BYE};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

/// Errors while reading a team roster.
#[derive(Debug)]
pub enum RosterError {
    /// Malformed CSV or a row that does not match `id,name`.
    Csv(csv::Error),
    /// Two rows share the same team id.
    DuplicateTeamId(TeamId),
    /// A row has an empty team name.
    EmptyName { line: u64 },
    /// `BYE` is reserved for byes.
    ReservedName { line: u64 },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Invalid roster CSV: {}", e),
            RosterError::DuplicateTeamId(id) => write!(f, "Team id {} appears more than once", id),
            RosterError::EmptyName { line } => write!(f, "Empty team name on line {}", line),
            RosterError::ReservedName { line } => {
                write!(f, "Team name {} on line {} is reserved", BYE, line)
            }
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

#[derive(Deserialize)]
struct RosterRow {
    id: TeamId,
    name: String,
}

/// Read teams from CSV with an `id,name` header. Names are trimmed.
pub fn import_roster<R: Read>(reader: R) -> Result<Vec<Team>, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for row in rdr.deserialize::<RosterRow>() {
        let row = row?;
        // Header is line 1.
        let line = teams.len() as u64 + 2;
        if row.name.is_empty() {
            return Err(RosterError::EmptyName { line });
        }
        if row.name.eq_ignore_ascii_case(BYE) {
            return Err(RosterError::ReservedName { line });
        }
        if !seen.insert(row.id) {
            return Err(RosterError::DuplicateTeamId(row.id));
        }
        teams.push(Team::new(row.id, row.name));
    }
    log::debug!("Imported {} team(s) from roster", teams.len());
    Ok(teams)
}

/// Create a fixture whose first round holds `teams`, optionally in random order.
///
/// The first round is valued `total_rounds_for_bracket(teams.len())` and has no format yet;
/// choosing one with `select_round_type` generates its matches.
pub fn start_fixture(
    tournament_id: TournamentId,
    mut teams: Vec<Team>,
    shuffle: bool,
) -> Result<Fixture, BracketError> {
    let total_rounds = total_rounds_for_bracket(teams.len())?;
    if shuffle {
        teams.shuffle(&mut rand::thread_rng());
    }
    let name = round_name(total_rounds, teams.len());
    let mut fixture = Fixture::new(tournament_id, total_rounds);
    fixture.rounds.push(Round::new(total_rounds, name, teams));
    log::info!(
        "Started fixture for tournament {} ({} round(s) max)",
        tournament_id,
        total_rounds
    );
    Ok(fixture)
}
