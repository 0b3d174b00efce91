use super::card::Card;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::Digest;
use sha2::Sha256;

/// Ordered 52-card deck in a seed-derived permutation.
///
/// The permutation is a Fisher-Yates shuffle keyed by the SHA-256 digest of
/// the seed string, so the same seed always yields the same card order and
/// any hand can be independently replayed without storing the deck.
#[derive(Debug, Clone)]
pub struct Deck(Vec<Card>);

impl Deck {
    pub fn new(seed: &str) -> Self {
        let mut cards = (0u8..52).map(Card::from).collect::<Vec<Card>>();
        let key: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
        let mut rng = ChaCha8Rng::from_seed(key);
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }
        Self(cards)
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Remove the top card. Exhaustion is a dealing bug, never a
    /// recoverable state: the configured seat count plus five community
    /// cards can never consume 52.
    pub fn draw(&mut self) -> Card {
        assert!(!self.0.is_empty(), "deck exhausted");
        self.0.pop().expect("deck exhausted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn same_seed_same_order() {
        let mut a = Deck::new("tournament_hand_7");
        let mut b = Deck::new("tournament_hand_7");
        for _ in 0..52 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn different_seed_different_order() {
        let a = Deck::new("tournament_hand_7").0;
        let b = Deck::new("tournament_hand_8").0;
        assert_ne!(a, b);
    }

    #[test]
    fn fifty_two_unique() {
        let deck = Deck::new("any seed");
        assert_eq!(deck.size(), 52);
        let unique = deck.0.iter().copied().collect::<HashSet<Card>>();
        assert_eq!(unique.len(), 52);
    }
}
