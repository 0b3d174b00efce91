use crate::Chips;
use crate::Position;
use colored::Colorize;

/// A decision returned by a player agent.
///
/// Closed set: anything an agent sends that does not parse into one of
/// these is treated like a timeout by the orchestrator. The raise payload
/// is the additional amount over the current call level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Raise(Chips),
}

/// Wire format matches the agent contract: `"fold"`, `"check"`, `"call"`,
/// or `{"raise": n}`.
impl serde::Serialize for PlayerAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        match self {
            Self::Fold => serializer.serialize_str("fold"),
            Self::Check => serializer.serialize_str("check"),
            Self::Call => serializer.serialize_str("call"),
            Self::Raise(amount) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("raise", amount)?;
                map.end()
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for PlayerAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let value = serde_json::Value::deserialize(deserializer)?;
        match &value {
            serde_json::Value::String(s) => match s.as_str() {
                "fold" => Ok(Self::Fold),
                "check" => Ok(Self::Check),
                "call" => Ok(Self::Call),
                other => Err(D::Error::custom(format!("unknown action: {}", other))),
            },
            serde_json::Value::Object(map) => map
                .get("raise")
                .and_then(serde_json::Value::as_i64)
                .map(Self::Raise)
                .ok_or_else(|| D::Error::custom("raise action missing amount")),
            _ => Err(D::Error::custom("action must be a string or raise object")),
        }
    }
}

impl std::fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fold => write!(f, "{}", "FOLD".red()),
            Self::Check => write!(f, "{}", "CHECK".cyan()),
            Self::Call => write!(f, "{}", "CALL".yellow()),
            Self::Raise(amount) => write!(f, "{}", format!("RAISE {}", amount).green()),
        }
    }
}

/// One entry of the per-hand action log, appended in arrival order.
///
/// The ordered log is the source of the receipt commitment: the rendered
/// records are joined and hashed, so any tamper to order or content
/// changes the commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionRecord {
    SmallBlind { seat: Position, amount: Chips },
    BigBlind { seat: Position, amount: Chips },
    Fold { seat: Position },
    Check { seat: Position },
    Call { seat: Position, amount: Chips },
    Raise { seat: Position, amount: Chips },
}

impl std::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::SmallBlind { seat, .. } => write!(f, "SB:{}", seat),
            Self::BigBlind { seat, .. } => write!(f, "BB:{}", seat),
            Self::Fold { seat } => write!(f, "FOLD:{}", seat),
            Self::Check { seat } => write!(f, "CHECK:{}", seat),
            Self::Call { seat, amount } => write!(f, "CALL:{}:{}", seat, amount),
            Self::Raise { seat, amount } => write!(f, "RAISE:{}:{}", seat, amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_roundtrip() {
        for action in [
            PlayerAction::Fold,
            PlayerAction::Check,
            PlayerAction::Call,
            PlayerAction::Raise(40),
        ] {
            let json = serde_json::to_string(&action).unwrap();
            let back = serde_json::from_str::<PlayerAction>(&json).unwrap();
            assert_eq!(action, back);
        }
    }

    #[test]
    fn wire_shapes() {
        assert_eq!(serde_json::to_string(&PlayerAction::Fold).unwrap(), r#""fold""#);
        assert_eq!(
            serde_json::to_string(&PlayerAction::Raise(40)).unwrap(),
            r#"{"raise":40}"#
        );
    }

    #[test]
    fn malformed_rejected() {
        assert!(serde_json::from_str::<PlayerAction>(r#""shove""#).is_err());
        assert!(serde_json::from_str::<PlayerAction>(r#"{"bet":10}"#).is_err());
        assert!(serde_json::from_str::<PlayerAction>("42").is_err());
    }

    #[test]
    fn record_rendering() {
        assert_eq!(ActionRecord::SmallBlind { seat: 0, amount: 5 }.to_string(), "SB:0");
        assert_eq!(ActionRecord::Call { seat: 2, amount: 10 }.to_string(), "CALL:2:10");
        assert_eq!(ActionRecord::Fold { seat: 1 }.to_string(), "FOLD:1");
    }
}
