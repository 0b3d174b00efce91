use super::outcome::HandOutcome;
use super::player::Agent;
use crate::config::TableConfig;
use crate::gameplay::GameObservation;
use crate::gameplay::HandEngine;
use crate::gameplay::PlayerAction;
use crate::gameplay::StreetAdvance;
use crate::receipt::HandReceipt;
use crate::settlement::split_positions;
use crate::settlement::Facilitator;
use crate::Position;
use serde::Serialize;
use std::sync::Arc;
use std::sync::RwLock;

/// Read-only session counters shared with the hosting layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStatus {
    pub running: bool,
    pub hand_no: u64,
    pub hands_completed: u64,
    pub hands_settled: u64,
    pub mode: String,
}

impl TableStatus {
    pub fn new(mode: String) -> Self {
        Self {
            running: false,
            hand_no: 0,
            hands_completed: 0,
            hands_settled: 0,
            mode,
        }
    }
}

/// Live table coordinator.
///
/// Imperative shell that owns the engine (functional core) and drives one
/// hand at a time: solicit, apply, advance, then receipt and settlement.
/// Partial failure of any single participant never blocks the rest of the
/// table, and no per-hand failure aborts the session loop.
pub struct Room {
    config: TableConfig,
    engine: HandEngine,
    agents: Vec<Box<dyn Agent>>,
    facilitator: Facilitator,
    status: Arc<RwLock<TableStatus>>,
}

impl Room {
    pub fn new(
        config: TableConfig,
        agents: Vec<Box<dyn Agent>>,
        facilitator: Facilitator,
        status: Arc<RwLock<TableStatus>>,
    ) -> Self {
        assert!(agents.len() == config.player_count, "one agent per seat");
        let engine = HandEngine::new(
            config.player_count,
            config.starting_stack,
            config.small_blind,
            config.big_blind,
        );
        Self {
            config,
            engine,
            agents,
            facilitator,
            status,
        }
    }

    /// Session loop: hands 1..=max_hands with a fixed inter-hand delay.
    /// Every outcome is consumed and the loop proceeds regardless.
    pub async fn run(mut self) {
        let table = self.config.table_id.clone();
        log::info!(
            "[room {}] starting game loop ({} seats, {} hands max, {} settlement)",
            table,
            self.config.player_count,
            self.config.max_hands,
            self.facilitator.mode()
        );
        self.status.write().expect("poisoned status").running = true;
        for hand_no in 1..=self.config.max_hands {
            match self.play_hand(hand_no).await {
                HandOutcome::Completed(receipt) => {
                    log::info!(
                        "[room {}] hand {} complete, rake {}",
                        table,
                        hand_no,
                        receipt.rake()
                    );
                }
                HandOutcome::Failed(reason) => {
                    log::error!("[room {}] hand {} failed: {}", table, hand_no, reason);
                }
            }
            self.status.write().expect("poisoned status").hands_completed += 1;
            tokio::time::sleep(self.config.hand_delay).await;
        }
        self.status.write().expect("poisoned status").running = false;
        log::info!("[room {}] game loop finished", table);
    }

    /// Drive one hand from deal to settlement.
    async fn play_hand(&mut self, hand_no: u64) -> HandOutcome {
        let seed = self.config.hand_seed(hand_no);
        let addresses = self
            .agents
            .iter()
            .map(|a| a.address().to_owned())
            .collect::<Vec<String>>();
        log::info!(
            "[room {}] dealing hand {} with seed {}",
            self.config.table_id,
            hand_no,
            seed
        );
        self.engine.deal(hand_no, &seed, &addresses);
        self.status.write().expect("poisoned status").hand_no = hand_no;
        self.run_streets().await;
        self.conclude(addresses).await
    }

    /// Betting passes until the hand is terminal. Each pass walks the
    /// rotation once; a closed round advances the street immediately.
    async fn run_streets(&mut self) {
        let n = self.engine.seat_count();
        'hand: loop {
            let first = self.engine.first_to_act();
            for i in 0..n {
                let seat = (first + i) % n;
                if self.engine.is_round_complete() {
                    break;
                }
                let observation = self.engine.observe(seat);
                if observation.legal_actions.is_empty() {
                    continue;
                }
                let action = self.solicit(seat, &observation).await;
                if let Err(rejection) = self.engine.apply(seat, action) {
                    // a rejected action is treated like a malformed response
                    log::warn!(
                        "[room {}] seat {} action rejected ({}), folding",
                        self.config.table_id,
                        seat,
                        rejection
                    );
                    let _ = self.engine.apply(seat, PlayerAction::Fold);
                }
                if self.engine.is_round_complete() {
                    match self.engine.advance_street() {
                        StreetAdvance::Advanced(street) => {
                            log::debug!(
                                "[room {}] {} dealt, board {:?}",
                                self.config.table_id,
                                street,
                                self.engine.board().iter().map(ToString::to_string).collect::<Vec<_>>()
                            );
                            continue 'hand;
                        }
                        StreetAdvance::Terminal => break 'hand,
                    }
                }
            }
            if self.engine.is_round_complete() {
                match self.engine.advance_street() {
                    StreetAdvance::Advanced(_) => continue 'hand,
                    StreetAdvance::Terminal => break 'hand,
                }
            }
        }
    }

    /// Bounded wait for one decision. Timeout, transport failure, and
    /// malformed responses all resolve to a fold so the hand keeps moving.
    async fn solicit(&self, seat: Position, observation: &GameObservation) -> PlayerAction {
        let agent = &self.agents[seat];
        match tokio::time::timeout(self.config.decision_timeout, agent.decide(observation)).await {
            Ok(Ok(action)) => {
                log::debug!(
                    "[room {}] seat {} decided {}",
                    self.config.table_id,
                    seat,
                    action
                );
                action
            }
            Ok(Err(failure)) => {
                log::warn!(
                    "[room {}] seat {} agent failed ({}), folding",
                    self.config.table_id,
                    seat,
                    failure
                );
                PlayerAction::Fold
            }
            Err(_) => {
                log::warn!(
                    "[room {}] seat {} timed out after {:?}, folding",
                    self.config.table_id,
                    seat,
                    self.config.decision_timeout
                );
                PlayerAction::Fold
            }
        }
    }

    /// Terminal hand: award the pot, build the receipt, settle. A failed
    /// settlement leaves the hand complete; it is retriable out-of-band.
    async fn conclude(&mut self, addresses: Vec<String>) -> HandOutcome {
        let pot = self.engine.pot();
        let deltas = self.engine.settle();
        let receipt = HandReceipt::build(
            &self.config.table_id,
            self.config.rake_bps,
            self.engine.hand_no(),
            self.engine.seed(),
            addresses,
            self.engine.actions(),
            pot,
            deltas,
            crate::clock(),
        );
        let receipt_hash = receipt.hash();
        log::info!(
            "[room {}] hand {} receipt {}",
            self.config.table_id,
            receipt.hand_no,
            receipt_hash
        );
        let (payers, payees) = split_positions(&receipt.deltas, &receipt.players);
        match self
            .facilitator
            .settle(&receipt, &receipt_hash, &payers, &payees)
            .await
        {
            Ok(record) => {
                log::info!(
                    "[room {}] hand {} settled, tx {}",
                    self.config.table_id,
                    receipt.hand_no,
                    record.tx_ref
                );
                self.status.write().expect("poisoned status").hands_settled += 1;
            }
            Err(failure) => {
                log::error!(
                    "[room {}] settlement failed for hand {}: {} (retriable out of band)",
                    self.config.table_id,
                    receipt.hand_no,
                    failure
                );
            }
        }
        HandOutcome::Completed(receipt)
    }
}
