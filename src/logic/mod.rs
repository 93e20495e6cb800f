//! Bracket business logic: naming, advancement, pairing, standings, fixture lifecycle.

mod naming;
mod pairing;
mod progression;
mod setup;
mod standings;
mod winners;

pub use naming::{round_name, total_rounds_for_bracket};
pub use pairing::next_round_matches;
pub use progression::{
    advance_round, record_result, resolve_placeholders, select_round_type, set_match_status,
};
pub use setup::{import_roster, start_fixture, RosterError};
pub use standings::{advancers, ranked_advancers, standings, AdvancementPolicy, Standing};
pub use winners::{advancing_count, compute_winners, prefer_backend_placeholders};
