//! Team data structure, including placeholder and bye slots.

use serde::{Deserialize, Serialize};

/// Identifier of a team as assigned by the backend (positive) or synthesized locally (negative).
pub type TeamId = i64;

/// Reserved team name marking a bye slot. Never a real team.
pub const BYE: &str = "BYE";

/// A team in a fixture, or a slot standing in for one.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// True when the slot depends on a match that has not been decided yet ("Match 3 Winner").
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Team {
    /// A concrete team with the given backend id and name.
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_placeholder: false,
        }
    }

    /// A placeholder slot. Locally synthesized placeholders use negative ids so they never
    /// collide with backend teams.
    pub fn placeholder(id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_placeholder: true,
        }
    }

    /// The bye sentinel used as an absent opponent.
    pub fn bye() -> Self {
        Self {
            id: 0,
            name: BYE.to_string(),
            is_placeholder: false,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.name == BYE
    }
}
