use crate::config::TableConfig;
use crate::gameroom::Agent;
use crate::gameroom::Fish;
use crate::gameroom::RemoteAgent;
use crate::gameroom::Room;
use crate::gameroom::TableStatus;
use crate::settlement::Facilitator;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::RwLock;

/// One table session with a defined lifecycle: created at server start,
/// torn down when the process exits. Owns the config and shared status,
/// and launches the room loop at most once.
pub struct Floor {
    config: TableConfig,
    status: Arc<RwLock<TableStatus>>,
    started: AtomicBool,
}

impl Floor {
    pub fn new(config: TableConfig) -> Self {
        let mode = if config.off_chain() { "off-chain" } else { "on-chain" };
        Self {
            config,
            status: Arc::new(RwLock::new(TableStatus::new(mode.to_string()))),
            started: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn status(&self) -> TableStatus {
        self.status.read().expect("poisoned status").clone()
    }

    /// Launch the hand loop asynchronously and return immediately.
    /// Idempotent per session: a second trigger is a no-op.
    pub fn start(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            log::debug!("[floor {}] start ignored, loop already running", self.config.table_id);
            return false;
        }
        let agents = self.seat_agents();
        let facilitator = Facilitator::from_config(&self.config);
        let room = Room::new(self.config.clone(), agents, facilitator, self.status.clone());
        tokio::spawn(room.run());
        log::info!("[floor {}] game loop launched", self.config.table_id);
        true
    }

    /// Seats with a configured endpoint get a remote agent; the rest are
    /// played by the built-in Fish so the table runs standalone.
    fn seat_agents(&self) -> Vec<Box<dyn Agent>> {
        (0..self.config.player_count)
            .map(|seat| {
                let address = self.config.agent_address(seat);
                match self.config.agent_endpoint(seat) {
                    Some(endpoint) => {
                        Box::new(RemoteAgent::new(address, endpoint)) as Box<dyn Agent>
                    }
                    None => Box::new(Fish::new(address)) as Box<dyn Agent>,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_is_idempotent() {
        let config = TableConfig {
            player_count: 2,
            max_hands: 1,
            hand_delay: std::time::Duration::from_millis(1),
            ..TableConfig::default()
        };
        let floor = Floor::new(config);
        assert!(floor.start());
        assert!(!floor.start());
    }

    #[test]
    fn mode_reflects_configuration() {
        let floor = Floor::new(TableConfig::default());
        assert_eq!(floor.status().mode, "off-chain");
    }
}
