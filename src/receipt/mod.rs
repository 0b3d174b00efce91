use crate::gameplay::ActionRecord;
use crate::Chips;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

/// Auditable commitment to one completed hand.
///
/// Immutable once built; this is the unit of settlement and audit. The
/// per-seat deltas carry the rake deduction and sum to exactly minus the
/// rake. Field names follow the settlement wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandReceipt {
    pub table_id: String,
    pub hand_no: u64,
    pub rng_seed: String,
    pub players: Vec<String>,
    pub actions_commitment: String,
    pub deltas: Vec<Chips>,
    pub rake_bps: u32,
    pub ts: u64,
}

impl HandReceipt {
    /// Build the receipt for a settled hand: rake is floor(pot * bps /
    /// 10000), deducted evenly across seats with the remainder taken one
    /// chip each from the lowest seats so the deltas sum to -rake exactly.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        table_id: &str,
        rake_bps: u32,
        hand_no: u64,
        rng_seed: &str,
        players: Vec<String>,
        actions: &[ActionRecord],
        pot: Chips,
        mut deltas: Vec<Chips>,
        ts: u64,
    ) -> Self {
        let rake = pot * Chips::from(rake_bps) / 10_000;
        let n = deltas.len() as Chips;
        let share = rake / n;
        let extra = rake % n;
        for (i, delta) in deltas.iter_mut().enumerate() {
            *delta -= share + if (i as Chips) < extra { 1 } else { 0 };
        }
        Self {
            table_id: table_id.to_owned(),
            hand_no,
            rng_seed: rng_seed.to_owned(),
            players,
            actions_commitment: Self::commit(actions),
            deltas,
            rake_bps,
            ts,
        }
    }

    /// One-way hash of the action log: records rendered in arrival order,
    /// joined, and digested. Any tamper to order or content changes it.
    pub fn commit(actions: &[ActionRecord]) -> String {
        let joined = actions
            .iter()
            .map(ActionRecord::to_string)
            .collect::<Vec<String>>()
            .join("|");
        hex::encode(Sha256::digest(joined.as_bytes()))
    }

    /// Hash of the canonical receipt encoding (key-sorted JSON). Both
    /// sides of settlement recompute this and compare bit-for-bit.
    pub fn hash(&self) -> String {
        let canonical = serde_json::to_value(self)
            .expect("receipt serializes")
            .to_string();
        hex::encode(Sha256::digest(canonical.as_bytes()))
    }

    /// The exact rake this receipt carries.
    pub fn rake(&self) -> Chips {
        -self.deltas.iter().sum::<Chips>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn actions() -> Vec<ActionRecord> {
        vec![
            ActionRecord::SmallBlind { seat: 1, amount: 5 },
            ActionRecord::BigBlind { seat: 2, amount: 10 },
            ActionRecord::Fold { seat: 0 },
            ActionRecord::Call { seat: 1, amount: 5 },
            ActionRecord::Check { seat: 2 },
        ]
    }

    fn receipt() -> HandReceipt {
        HandReceipt::build(
            "table-1",
            500,
            7,
            "seed_hand_7",
            vec!["0xaa".into(), "0xbb".into(), "0xcc".into()],
            &actions(),
            20,
            vec![0, 10, -10],
            1_700_000_000,
        )
    }

    #[test]
    fn deltas_sum_to_minus_rake() {
        let built = receipt();
        // rake = floor(20 * 500 / 10000) = 1
        assert_eq!(built.rake(), 1);
        assert_eq!(built.deltas.iter().sum::<i64>(), -1);
        assert_eq!(built.deltas, vec![-1, 10, -10]);
    }

    #[test]
    fn rake_remainder_is_exact() {
        // pot 55 at 500bps: rake = 2, one extra chip from the first seat
        let built = HandReceipt::build(
            "t",
            500,
            1,
            "s",
            vec!["a".into(), "b".into(), "c".into()],
            &[],
            55,
            vec![45, -25, -20],
            0,
        );
        assert_eq!(built.deltas.iter().sum::<i64>(), -2);
        assert_eq!(built.deltas, vec![44, -25, -21]);
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(receipt().hash(), receipt().hash());
    }

    #[test]
    fn hash_covers_every_field() {
        let base = receipt();
        let mut tampered = base.clone();
        tampered.hand_no += 1;
        assert_ne!(base.hash(), tampered.hash());
        let mut tampered = base.clone();
        tampered.deltas[0] += 1;
        assert_ne!(base.hash(), tampered.hash());
        let mut tampered = base.clone();
        tampered.ts += 1;
        assert_ne!(base.hash(), tampered.hash());
    }

    #[test]
    fn commitment_is_order_sensitive() {
        let forward = actions();
        let mut reversed = actions();
        reversed.reverse();
        assert_ne!(HandReceipt::commit(&forward), HandReceipt::commit(&reversed));
    }

    #[test]
    fn commitment_is_content_sensitive() {
        let original = actions();
        let mut tampered = actions();
        tampered[3] = ActionRecord::Call { seat: 1 as Position, amount: 6 };
        assert_ne!(HandReceipt::commit(&original), HandReceipt::commit(&tampered));
    }
}
