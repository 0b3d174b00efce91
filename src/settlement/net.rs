use crate::Chips;
use serde::Deserialize;
use serde::Serialize;

/// One participant's aggregate gain or loss for one hand, as an absolute
/// amount after partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetPosition {
    pub address: String,
    pub amount: Chips,
}

/// Partition per-seat deltas by sign into (payers, payees). Payers owe the
/// absolute value of their negative delta; zero deltas drop out.
pub fn split_positions(deltas: &[Chips], addresses: &[String]) -> (Vec<NetPosition>, Vec<NetPosition>) {
    let mut payers = Vec::new();
    let mut payees = Vec::new();
    for (delta, address) in deltas.iter().zip(addresses.iter()) {
        if *delta < 0 {
            payers.push(NetPosition { address: address.clone(), amount: -delta });
        } else if *delta > 0 {
            payees.push(NetPosition { address: address.clone(), amount: *delta });
        }
    }
    (payers, payees)
}
