use super::seat::Seat;
use crate::Position;

/// Picks the winning seat once the hand is terminal.
pub struct Showdown;

impl Showdown {
    /// Uncontested pots go to the last seat standing. Contested pots fall
    /// through to the placeholder below.
    pub fn resolve(seats: &[Seat]) -> Position {
        let live = seats
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.folded())
            .map(|(i, _)| i)
            .collect::<Vec<Position>>();
        match live.as_slice() {
            [] => panic!("no live seats at showdown"),
            [only] => *only,
            _ => Self::placeholder_rank(&live),
        }
    }

    /// Placeholder for real 5-card evaluation: multi-way pots are awarded
    /// to the lowest-indexed live seat without ranking hands.
    /// TODO: rank 7-card hands (high-hand ordering, kicker tie-breaks,
    /// split pots on exact ties).
    fn placeholder_rank(live: &[Position]) -> Position {
        live[0]
    }
}
