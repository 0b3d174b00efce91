use crate::cards::Card;
use crate::Chips;

/// One seat at the table.
///
/// Owned exclusively by the engine for the duration of a hand. The stack
/// persists across hands; cards, bets, and flags reset on every deal.
#[derive(Debug, Clone)]
pub struct Seat {
    address: String,
    stack: Chips,
    stake: Chips,
    spent: Chips,
    hole: Vec<Card>,
    folded: bool,
    acted: bool,
}

impl Seat {
    pub fn new(address: String, stack: Chips) -> Self {
        Self {
            address,
            stack,
            stake: 0,
            spent: 0,
            hole: Vec::with_capacity(2),
            folded: false,
            acted: false,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    /// Chips committed on the current street.
    pub fn stake(&self) -> Chips {
        self.stake
    }
    /// Chips committed over the whole hand.
    pub fn spent(&self) -> Chips {
        self.spent
    }
    pub fn folded(&self) -> bool {
        self.folded
    }
    /// Has voluntarily acted on the current street.
    pub fn acted(&self) -> bool {
        self.acted
    }
    pub fn cards(&self) -> &[Card] {
        &self.hole
    }

    /// Reset transient state for a new hand; the stack carries over and the
    /// address re-synchronizes to the current participant roster.
    pub(crate) fn reset(&mut self, address: String) {
        self.address = address;
        self.stake = 0;
        self.spent = 0;
        self.hole.clear();
        self.folded = false;
        self.acted = false;
    }
    pub(crate) fn deal(&mut self, card: Card) {
        self.hole.push(card);
    }
    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }
    pub(crate) fn touch(&mut self) {
        self.acted = true;
    }
    /// Move up to `amount` from stack to the current stake, short all-ins
    /// included. Returns what actually moved.
    pub(crate) fn commit(&mut self, amount: Chips) -> Chips {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.stake += moved;
        self.spent += moved;
        moved
    }
    pub(crate) fn clear_stake(&mut self) {
        self.stake = 0;
        self.acted = false;
    }
    pub(crate) fn win(&mut self, amount: Chips) {
        self.stack += amount;
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let status = if self.folded { "F" } else { "P" };
        write!(f, "{}{:<8}{:>7}", status, self.address, self.stack)
    }
}
