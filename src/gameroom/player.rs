use crate::gameplay::GameObservation;
use crate::gameplay::PlayerAction;

/// Capability interface for a seat's decision maker.
///
/// The room applies the bounded wait and the fold-on-failure policy;
/// implementations just answer. The room is transport-agnostic: decisions
/// may come from local heuristics, HTTP services, or anything else.
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    /// The participant address this agent plays for.
    fn address(&self) -> &str;

    /// Decide one action for the observed spot.
    async fn decide(&self, observation: &GameObservation) -> anyhow::Result<PlayerAction>;
}
