//! Round labels and bracket depth.

use crate::models::BracketError;

/// Canonical label for a round, based on how many teams enter it.
///
/// 2 teams is the final, 4 the semi final, 8 the quarter final and 16 or more "Round of N".
/// Other counts below 16 (6, 10, 12, ...) have no agreed label and fall back to
/// "Round {round_number_from_end}".
pub fn round_name(round_number_from_end: u32, team_count_in_round: usize) -> String {
    match team_count_in_round {
        2 => "Final".to_string(),
        4 => "Semi Final".to_string(),
        8 => "Quarter Final".to_string(),
        n if n >= 16 => format!("Round of {}", n),
        _ => format!("Round {}", round_number_from_end),
    }
}

/// Number of rounds a bracket of `team_count` teams can go through: `ceil(log2(n)) + 1`.
pub fn total_rounds_for_bracket(team_count: usize) -> Result<u32, BracketError> {
    if team_count < 2 {
        return Err(BracketError::InvalidTeamCount(team_count));
    }
    // ceil(log2(n)) is the exponent of the next power of two.
    Ok(team_count.next_power_of_two().trailing_zeros() + 1)
}
