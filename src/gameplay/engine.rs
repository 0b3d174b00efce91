use super::action::ActionRecord;
use super::action::PlayerAction;
use super::observation::GameObservation;
use super::seat::Seat;
use super::showdown::Showdown;
use crate::cards::Card;
use crate::cards::Deck;
use crate::cards::Street;
use crate::Chips;
use crate::Position;

/// Rejection at the engine boundary. Every rejection leaves the hand state
/// bit-for-bit unchanged; the caller decides the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    HandComplete,
    SeatFolded(Position),
    CheckFacingBet { seat: Position, owed: Chips },
    RaiseBelowMinimum { seat: Position, target: Chips, minimum: Chips },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::HandComplete => write!(f, "hand already complete"),
            Self::SeatFolded(seat) => write!(f, "seat {} already folded", seat),
            Self::CheckFacingBet { seat, owed } => {
                write!(f, "seat {} cannot check facing {} to call", seat, owed)
            }
            Self::RaiseBelowMinimum { seat, target, minimum } => {
                write!(f, "seat {} raise to {} below minimum {}", seat, target, minimum)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Outcome of a street transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreetAdvance {
    Advanced(Street),
    Terminal,
}

/// The per-hand betting state machine.
///
/// Owns deck, seats, pot, and streets for exactly one hand at a time and
/// performs no I/O. Seats persist across hands (stacks carry over); all
/// transient state resets on [`HandEngine::deal`]. The ordered action log
/// is the source of the receipt commitment.
#[derive(Debug)]
pub struct HandEngine {
    hand_no: u64,
    seed: String,
    deck: Deck,
    board: Vec<Card>,
    pot: Chips,
    current_bet: Chips,
    street: Street,
    button: Position,
    seats: Vec<Seat>,
    actions: Vec<ActionRecord>,
    sblind: Chips,
    bblind: Chips,
}

impl HandEngine {
    pub fn new(count: usize, stack: Chips, sblind: Chips, bblind: Chips) -> Self {
        assert!((2..=22).contains(&count), "seat count must fit one deck");
        assert!(sblind > 0 && bblind >= sblind, "blinds must be posted in order");
        Self {
            hand_no: 0,
            seed: String::new(),
            deck: Deck::new(""),
            board: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            street: Street::Done,
            button: 0,
            seats: (0..count)
                .map(|i| Seat::new(format!("player_{}", i), stack))
                .collect(),
            actions: Vec::new(),
            sblind,
            bblind,
        }
    }

    /// Start a new hand: advance the button, re-synchronize addresses,
    /// shuffle from the seed, deal two hole cards per seat round-robin,
    /// and post the blinds from the two seats after the button.
    pub fn deal(&mut self, hand_no: u64, seed: &str, addresses: &[String]) {
        let n = self.seats.len();
        self.hand_no = hand_no;
        self.seed = seed.to_owned();
        self.deck = Deck::new(seed);
        self.board.clear();
        self.pot = 0;
        self.current_bet = 0;
        self.street = Street::Pref;
        self.actions.clear();
        self.button = (self.button + 1) % n;
        for (i, seat) in self.seats.iter_mut().enumerate() {
            let address = addresses
                .get(i)
                .cloned()
                .unwrap_or_else(|| seat.address().to_owned());
            seat.reset(address);
        }
        for _ in 0..2 {
            for seat in self.seats.iter_mut() {
                seat.deal(self.deck.draw());
            }
        }
        let sb = (self.button + 1) % n;
        let bb = (self.button + 2) % n;
        let paid = self.seats[sb].commit(self.sblind);
        self.pot += paid;
        self.actions.push(ActionRecord::SmallBlind { seat: sb, amount: paid });
        let paid = self.seats[bb].commit(self.bblind);
        self.pot += paid;
        self.actions.push(ActionRecord::BigBlind { seat: bb, amount: paid });
        self.current_bet = self.bblind;
    }

    /// Project the hand state for one seat. Folded and all-in seats get an
    /// empty legal-action set; otherwise fold is always available, plus
    /// check at zero to call or call/raise facing a bet.
    pub fn observe(&self, seat: Position) -> GameObservation {
        let s = &self.seats[seat];
        let to_call = self.current_bet - s.stake();
        let mut legal = Vec::new();
        if self.street != Street::Done && !s.folded() && s.stack() > 0 {
            legal.push("fold".to_string());
            if to_call == 0 {
                legal.push("check".to_string());
            } else {
                legal.push("call".to_string());
                legal.push(format!("raise:{}", self.current_bet * 2));
            }
        }
        GameObservation {
            hand_no: self.hand_no,
            seat,
            hole_cards: s.cards().iter().map(Card::to_string).collect(),
            community_cards: self.board.iter().map(Card::to_string).collect(),
            pot: self.pot,
            bet: s.stake(),
            to_call,
            stack: s.stack(),
            position: self.position_label(seat),
            street: self.street.to_string(),
            legal_actions: legal,
        }
    }

    /// Apply one action for one seat, appending to the action log in
    /// arrival order. Call supports short all-ins; raise enforces the
    /// doubling minimum over the current bet.
    pub fn apply(&mut self, seat: Position, action: PlayerAction) -> Result<(), EngineError> {
        if self.street == Street::Done {
            return Err(EngineError::HandComplete);
        }
        if self.seats[seat].folded() {
            return Err(EngineError::SeatFolded(seat));
        }
        let to_call = self.current_bet - self.seats[seat].stake();
        match action {
            PlayerAction::Fold => {
                self.seats[seat].fold();
                self.seats[seat].touch();
                self.actions.push(ActionRecord::Fold { seat });
            }
            PlayerAction::Check => {
                if to_call != 0 {
                    return Err(EngineError::CheckFacingBet { seat, owed: to_call });
                }
                self.seats[seat].touch();
                self.actions.push(ActionRecord::Check { seat });
            }
            PlayerAction::Call => {
                let moved = self.seats[seat].commit(to_call);
                self.pot += moved;
                self.seats[seat].touch();
                self.actions.push(ActionRecord::Call { seat, amount: moved });
            }
            PlayerAction::Raise(amount) => {
                let target = self.current_bet + amount;
                let minimum = self.current_bet * 2;
                if amount <= 0 || target < minimum {
                    return Err(EngineError::RaiseBelowMinimum { seat, target, minimum });
                }
                let owed = target - self.seats[seat].stake();
                let moved = self.seats[seat].commit(owed);
                self.pot += moved;
                // short all-in raises never lower the table bet
                self.current_bet = self.current_bet.max(self.seats[seat].stake());
                self.seats[seat].touch();
                self.actions.push(ActionRecord::Raise { seat, amount: moved });
            }
        }
        Ok(())
    }

    /// A betting round is closed once at most one live seat remains, or
    /// every live seat with chips behind has voluntarily acted this street
    /// and matched the current bet. Posting a blind is not acting, so the
    /// blind-only preflop state never closes the round and the big blind
    /// keeps its option; all-in seats are exempt from matching.
    pub fn is_round_complete(&self) -> bool {
        let live = self
            .seats
            .iter()
            .filter(|s| !s.folded())
            .collect::<Vec<&Seat>>();
        if live.len() <= 1 {
            return true;
        }
        let actors = live
            .iter()
            .filter(|s| s.stack() > 0)
            .collect::<Vec<&&Seat>>();
        if actors.is_empty() {
            return true;
        }
        let matched = actors.iter().all(|s| s.stake() == self.current_bet);
        let acted = actors.iter().all(|s| s.acted());
        matched && acted
    }

    /// Reveal the next community cards (3/1/1), zero all stakes, and move
    /// to the next street. Terminal once past the river.
    pub fn advance_street(&mut self) -> StreetAdvance {
        match self.street {
            Street::Pref | Street::Flop | Street::Turn => {
                for _ in 0..self.street.n_revealed() {
                    self.board.push(self.deck.draw());
                }
                self.street = self.street.next();
                self.current_bet = 0;
                for seat in self.seats.iter_mut() {
                    seat.clear_stake();
                }
                StreetAdvance::Advanced(self.street)
            }
            Street::Rive => {
                self.street = Street::Done;
                StreetAdvance::Terminal
            }
            Street::Done => StreetAdvance::Terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.street == Street::Done
    }

    /// Award the pot and return per-seat deltas (payout minus own
    /// contribution), which sum to exactly zero. Rake is a receipt-level
    /// concern and never touches chip stacks.
    pub fn settle(&mut self) -> Vec<Chips> {
        assert!(self.is_terminal(), "settling a live hand");
        let winner = Showdown::resolve(&self.seats);
        let mut deltas = self
            .seats
            .iter()
            .map(|s| -s.spent())
            .collect::<Vec<Chips>>();
        deltas[winner] += self.pot;
        self.seats[winner].win(self.pot);
        deltas
    }

    /// Preflop action starts under the gun; every later street starts at
    /// the small blind.
    pub fn first_to_act(&self) -> Position {
        let offset = if self.street == Street::Pref { 3 } else { 1 };
        (self.button + offset) % self.seats.len()
    }

    fn position_label(&self, seat: Position) -> String {
        const LABELS: [&str; 8] = ["SB", "BB", "UTG", "UTG+1", "UTG+2", "MP", "MP+1", "CO"];
        if seat == self.button {
            return "BTN".to_string();
        }
        let n = self.seats.len();
        let offset = (seat + n - self.button - 1) % n;
        LABELS[offset.min(LABELS.len() - 1)].to_string()
    }

    pub fn hand_no(&self) -> u64 {
        self.hand_no
    }
    pub fn seed(&self) -> &str {
        &self.seed
    }
    pub fn pot(&self) -> Chips {
        self.pot
    }
    pub fn street(&self) -> Street {
        self.street
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }
    pub fn addresses(&self) -> Vec<String> {
        self.seats.iter().map(|s| s.address().to_owned()).collect()
    }
}

impl std::fmt::Display for HandEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for seat in self.seats.iter() {
            write!(f, "{} ", seat)?;
        }
        write!(f, "@ {:>6} {}", self.pot, self.street)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HandEngine {
        let mut engine = HandEngine::new(3, 1000, 5, 10);
        let addresses = vec!["0xaa".to_string(), "0xbb".to_string(), "0xcc".to_string()];
        engine.deal(1, "seed_hand_1", &addresses);
        engine
    }

    #[test]
    fn blinds_posted() {
        let engine = table();
        let n = engine.seat_count();
        let sb = (engine.button + 1) % n;
        let bb = (engine.button + 2) % n;
        assert_eq!(engine.pot(), 15);
        assert_eq!(engine.seats()[sb].stake(), 5);
        assert_eq!(engine.seats()[bb].stake(), 10);
        assert_eq!(engine.current_bet, 10);
        assert_eq!(engine.street(), Street::Pref);
        assert!(engine.seats().iter().all(|s| s.cards().len() == 2));
    }

    #[test]
    fn pot_matches_contributions() {
        let mut engine = table();
        let utg = engine.first_to_act();
        engine.apply(utg, PlayerAction::Raise(10)).unwrap();
        engine.apply((utg + 1) % 3, PlayerAction::Call).unwrap();
        let spent = engine.seats().iter().map(|s| s.spent()).sum::<i64>();
        assert_eq!(engine.pot(), spent);
    }

    #[test]
    fn round_not_complete_on_blinds_alone() {
        let engine = table();
        assert!(!engine.is_round_complete());
    }

    #[test]
    fn fold_call_check_advances_to_flop() {
        let mut engine = table();
        let n = engine.seat_count();
        let utg = engine.first_to_act();
        let sb = (utg + 1) % n;
        let bb = (utg + 2) % n;
        engine.apply(utg, PlayerAction::Fold).unwrap();
        assert!(!engine.is_round_complete());
        engine.apply(sb, PlayerAction::Call).unwrap();
        assert!(!engine.is_round_complete());
        engine.apply(bb, PlayerAction::Check).unwrap();
        assert!(engine.is_round_complete());
        assert_eq!(engine.advance_street(), StreetAdvance::Advanced(Street::Flop));
        assert_eq!(engine.board().len(), 3);
        assert_eq!(engine.pot(), 20);
        assert!(engine.seats().iter().all(|s| s.stake() == 0));
    }

    #[test]
    fn raise_below_minimum_rejected_unchanged() {
        let mut engine = table();
        let utg = engine.first_to_act();
        let pot = engine.pot();
        let actions = engine.actions().len();
        let stake = engine.seats()[utg].stake();
        let rejection = engine.apply(utg, PlayerAction::Raise(4));
        assert_eq!(
            rejection,
            Err(EngineError::RaiseBelowMinimum { seat: utg, target: 14, minimum: 20 })
        );
        assert_eq!(engine.pot(), pot);
        assert_eq!(engine.actions().len(), actions);
        assert_eq!(engine.seats()[utg].stake(), stake);
        assert_eq!(engine.current_bet, 10);
    }

    #[test]
    fn raise_moves_chips_and_reprices() {
        let mut engine = table();
        let utg = engine.first_to_act();
        engine.apply(utg, PlayerAction::Raise(10)).unwrap();
        assert_eq!(engine.current_bet, 20);
        assert_eq!(engine.seats()[utg].stake(), 20);
        assert_eq!(engine.pot(), 35);
    }

    #[test]
    fn folded_seat_rejected_and_unobservable() {
        let mut engine = table();
        let utg = engine.first_to_act();
        engine.apply(utg, PlayerAction::Fold).unwrap();
        assert!(engine.observe(utg).legal_actions.is_empty());
        assert_eq!(
            engine.apply(utg, PlayerAction::Call),
            Err(EngineError::SeatFolded(utg))
        );
    }

    #[test]
    fn check_facing_bet_rejected() {
        let mut engine = table();
        let utg = engine.first_to_act();
        assert!(matches!(
            engine.apply(utg, PlayerAction::Check),
            Err(EngineError::CheckFacingBet { .. })
        ));
    }

    #[test]
    fn check_around_completes_flop() {
        let mut engine = table();
        let n = engine.seat_count();
        let utg = engine.first_to_act();
        engine.apply(utg, PlayerAction::Call).unwrap();
        engine.apply((utg + 1) % n, PlayerAction::Call).unwrap();
        engine.apply((utg + 2) % n, PlayerAction::Check).unwrap();
        assert!(engine.is_round_complete());
        assert_eq!(engine.advance_street(), StreetAdvance::Advanced(Street::Flop));
        let first = engine.first_to_act();
        for i in 0..n {
            assert!(!engine.is_round_complete());
            engine.apply((first + i) % n, PlayerAction::Check).unwrap();
        }
        assert!(engine.is_round_complete());
    }

    #[test]
    fn short_all_in_call_does_not_stall_round() {
        let mut engine = HandEngine::new(3, 1000, 5, 10);
        engine.seats[0] = Seat::new("short".to_string(), 25);
        let addresses = engine.addresses();
        engine.deal(1, "seed_hand_1", &addresses);
        // find the short stack's seat after the deal and have everyone in
        let short = engine
            .seats()
            .iter()
            .position(|s| s.address() == "short")
            .unwrap();
        let n = engine.seat_count();
        let utg = engine.first_to_act();
        for i in 0..n {
            let seat = (utg + i) % n;
            let action = if seat == short {
                PlayerAction::Call
            } else {
                PlayerAction::Raise(40)
            };
            let _ = engine.apply(seat, action);
        }
        // short stack is all-in below the current bet
        if engine.seats()[short].stack() == 0 {
            assert!(engine.observe(short).legal_actions.is_empty());
        }
        // equalize the two big stacks: round must close despite the short stake
        let utg = engine.first_to_act();
        for i in 0..n {
            let seat = (utg + i) % n;
            if seat != short && !engine.is_round_complete() {
                let _ = engine.apply(seat, PlayerAction::Call);
            }
        }
        assert!(engine.is_round_complete());
    }

    #[test]
    fn uncontested_pot_goes_to_last_live_seat() {
        let mut engine = table();
        let n = engine.seat_count();
        let utg = engine.first_to_act();
        let sb = (utg + 1) % n;
        let bb = (utg + 2) % n;
        engine.apply(utg, PlayerAction::Fold).unwrap();
        engine.apply(sb, PlayerAction::Fold).unwrap();
        assert!(engine.is_round_complete());
        while engine.advance_street() != StreetAdvance::Terminal {}
        let stack = engine.seats()[bb].stack();
        let deltas = engine.settle();
        assert_eq!(deltas.iter().sum::<i64>(), 0);
        assert_eq!(deltas[bb], 15 - engine.seats()[bb].spent());
        assert_eq!(engine.seats()[bb].stack(), stack + 15);
    }

    #[test]
    fn contested_pot_uses_placeholder_winner() {
        let mut engine = table();
        let n = engine.seat_count();
        let utg = engine.first_to_act();
        engine.apply(utg, PlayerAction::Call).unwrap();
        engine.apply((utg + 1) % n, PlayerAction::Call).unwrap();
        engine.apply((utg + 2) % n, PlayerAction::Check).unwrap();
        loop {
            match engine.advance_street() {
                StreetAdvance::Advanced(_) => {
                    let first = engine.first_to_act();
                    for i in 0..n {
                        engine.apply((first + i) % n, PlayerAction::Check).unwrap();
                    }
                }
                StreetAdvance::Terminal => break,
            }
        }
        let deltas = engine.settle();
        assert_eq!(deltas.iter().sum::<i64>(), 0);
        assert_eq!(deltas[0], 30 - 10);
    }

    #[test]
    fn streets_never_revisit() {
        let mut engine = table();
        let seen = [Street::Flop, Street::Turn, Street::Rive];
        for street in seen {
            assert_eq!(engine.advance_street(), StreetAdvance::Advanced(street));
        }
        assert_eq!(engine.advance_street(), StreetAdvance::Terminal);
        assert_eq!(engine.advance_street(), StreetAdvance::Terminal);
        assert_eq!(engine.board().len(), 5);
        assert!(engine.is_terminal());
    }

    #[test]
    fn button_advances_each_deal() {
        let mut engine = table();
        let before = engine.button;
        let addresses = engine.addresses();
        engine.deal(2, "seed_hand_2", &addresses);
        assert_eq!(engine.button, (before + 1) % 3);
    }
}
