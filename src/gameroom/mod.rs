//! Async orchestration for live dealer tables.
//!
//! The [`Room`] is the imperative shell around the gameplay engine: it
//! solicits decisions from remote agents with a bounded wait, folds seats
//! that fail to answer, advances streets, and hands finished hands to the
//! settlement facilitator. Agents are pluggable behind the [`Agent`]
//! capability trait so the fold-on-timeout policy is testable without
//! network I/O.
mod outcome;
mod player;
mod room;

pub mod players;

pub use outcome::HandOutcome;
pub use player::Agent;
pub use players::Fish;
pub use players::RemoteAgent;
pub use room::Room;
pub use room::TableStatus;
