use crate::Chips;
use crate::Position;
use serde::Deserialize;
use serde::Serialize;

/// Read-only projection of the hand state for one seat.
///
/// Produced on demand by the engine and shipped to that seat's agent; the
/// recipient never mutates it. Field names follow the external agent wire
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameObservation {
    pub hand_no: u64,
    pub seat: Position,
    pub hole_cards: Vec<String>,
    pub community_cards: Vec<String>,
    pub pot: Chips,
    /// Chips this seat already has in on the current street.
    pub bet: Chips,
    pub to_call: Chips,
    pub stack: Chips,
    pub position: String,
    pub street: String,
    /// Empty for folded and all-in seats: they have no decision to make.
    pub legal_actions: Vec<String>,
}

impl GameObservation {
    pub fn may(&self, action: &str) -> bool {
        self.legal_actions.iter().any(|a| a == action)
    }
}
