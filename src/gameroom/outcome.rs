use crate::receipt::HandReceipt;

/// Result of one hand, consumed by the session loop.
///
/// The loop always proceeds to the next hand regardless of the variant;
/// a failed hand is logged, never fatal. Settlement failure does not make
/// a hand Failed: the game state never rolls back and the receipt stays
/// eligible for out-of-band retry.
#[derive(Debug)]
pub enum HandOutcome {
    Completed(HandReceipt),
    Failed(String),
}
