//! Tournament bracket engine: library with models, bracket logic and a backend client.

pub mod backend;
pub mod logic;
pub mod models;

pub use logic::{
    advance_round, advancers, advancing_count, compute_winners, import_roster,
    next_round_matches, prefer_backend_placeholders, ranked_advancers, record_result,
    resolve_placeholders, round_name, select_round_type, set_match_status, standings,
    start_fixture, total_rounds_for_bracket, AdvancementPolicy, RosterError, Standing,
};
pub use models::{
    BracketError, Fixture, GameMatch, MatchDraft, MatchId, MatchStatus, Round, RoundFormat,
    RoundId, Team, TeamId, TournamentId, BYE,
};
