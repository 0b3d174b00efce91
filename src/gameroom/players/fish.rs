use crate::gameplay::GameObservation;
use crate::gameplay::PlayerAction;
use crate::gameroom::Agent;
use rand::Rng;

/// Pot-odds weighted random strategy.
///
/// The built-in stand-in for a remote agent: seats with no endpoint
/// configured are played by a Fish so a table runs standalone. Always
/// picks from the advertised legal set.
pub struct Fish {
    address: String,
}

impl Fish {
    pub fn new(address: String) -> Self {
        Self { address }
    }
}

#[async_trait::async_trait]
impl Agent for Fish {
    fn address(&self) -> &str {
        &self.address
    }

    async fn decide(&self, observation: &GameObservation) -> anyhow::Result<PlayerAction> {
        if observation.may("check") {
            return Ok(PlayerAction::Check);
        }
        let pot_odds = if observation.pot + observation.to_call > 0 {
            observation.to_call as f64 / (observation.pot + observation.to_call) as f64
        } else {
            0.0
        };
        let roll = rand::thread_rng().gen::<f64>();
        if roll < 0.3 {
            Ok(PlayerAction::Fold)
        } else if roll < 0.7 || pot_odds > 0.5 {
            Ok(PlayerAction::Call)
        } else {
            // minimum legal raise: double the table bet
            Ok(PlayerAction::Raise(observation.bet + observation.to_call))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(to_call: i64) -> GameObservation {
        GameObservation {
            hand_no: 1,
            seat: 0,
            hole_cards: vec!["As".into(), "Kh".into()],
            community_cards: vec![],
            pot: 15,
            bet: 0,
            to_call,
            stack: 1000,
            position: "UTG".into(),
            street: "preflop".into(),
            legal_actions: if to_call == 0 {
                vec!["fold".into(), "check".into()]
            } else {
                vec!["fold".into(), "call".into(), "raise:20".into()]
            },
        }
    }

    #[tokio::test]
    async fn checks_when_free() {
        let fish = Fish::new("0xaa".into());
        assert_eq!(fish.decide(&spot(0)).await.unwrap(), PlayerAction::Check);
    }

    #[tokio::test]
    async fn stays_within_legal_set_facing_a_bet() {
        let fish = Fish::new("0xaa".into());
        for _ in 0..100 {
            match fish.decide(&spot(10)).await.unwrap() {
                PlayerAction::Fold | PlayerAction::Call => {}
                PlayerAction::Raise(amount) => assert_eq!(amount, 10),
                PlayerAction::Check => panic!("check is not legal facing a bet"),
            }
        }
    }
}
