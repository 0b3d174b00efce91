use crate::Chips;
use crate::Position;
use std::time::Duration;

/// Everything one table needs, loaded once from the environment and passed
/// by reference through the session object graph.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub table_id: String,
    pub pot_size_usd: Chips,
    /// Rake in basis points (500 = 5%).
    pub rake_bps: u32,
    pub max_hands: u64,
    pub player_count: usize,
    pub starting_stack: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub chain_id: u64,
    pub token_address: String,
    pub escrow_address: String,
    pub facilitator_address: String,
    pub rpc_url: String,
    pub tournament_seed: String,
    /// Bounded wait for one remote decision.
    pub decision_timeout: Duration,
    /// Pause between hands.
    pub hand_delay: Duration,
    pub bind_addr: String,
    pub auto_start: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_id: uuid::Uuid::new_v4().to_string(),
            pot_size_usd: 10,
            rake_bps: 500,
            max_hands: 1000,
            player_count: 9,
            starting_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            chain_id: 56,
            token_address: String::new(),
            escrow_address: String::new(),
            facilitator_address: String::new(),
            rpc_url: "https://bsc-dataseed1.binance.org/".to_string(),
            tournament_seed: "fixed_tournament_seed_2024".to_string(),
            decision_timeout: Duration::from_secs(10),
            hand_delay: Duration::from_millis(1000),
            bind_addr: "0.0.0.0:3000".to_string(),
            auto_start: false,
        }
    }
}

impl TableConfig {
    /// Load from environment variables, falling back to defaults. Missing
    /// on-chain addresses are legal: they select simulated settlement.
    pub fn load() -> Self {
        let defaults = Self::default();
        let config = Self {
            table_id: var("TABLE_ID").unwrap_or(defaults.table_id),
            pot_size_usd: parse("POT_SIZE_USD", defaults.pot_size_usd),
            rake_bps: parse("RAKE_BPS", defaults.rake_bps),
            max_hands: parse("MAX_HANDS", defaults.max_hands),
            player_count: parse("PLAYER_COUNT", defaults.player_count),
            starting_stack: parse("STARTING_STACK", defaults.starting_stack),
            small_blind: parse("SMALL_BLIND", defaults.small_blind),
            big_blind: parse("BIG_BLIND", defaults.big_blind),
            chain_id: parse("CHAIN_ID", defaults.chain_id),
            token_address: var("TOKEN_ADDRESS").unwrap_or_default(),
            escrow_address: var("ESCROW_ADDRESS").unwrap_or_default(),
            facilitator_address: var("FACILITATOR_ADDRESS").unwrap_or_default(),
            rpc_url: var("RPC_URL").unwrap_or(defaults.rpc_url),
            tournament_seed: var("TOURNAMENT_SEED").unwrap_or(defaults.tournament_seed),
            decision_timeout: Duration::from_secs(parse("DECISION_TIMEOUT_SECS", 10)),
            hand_delay: Duration::from_millis(parse("HAND_DELAY_MS", 1000)),
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            auto_start: var("AUTO_START").map(|v| v == "true").unwrap_or(false),
        };
        if config.off_chain() {
            log::warn!(
                "running in off-chain mode: set TOKEN_ADDRESS, ESCROW_ADDRESS, FACILITATOR_ADDRESS for on-chain settlement"
            );
        }
        config
    }

    /// No live transfer backend configured: settlement degrades to the
    /// simulated mode instead of failing startup.
    pub fn off_chain(&self) -> bool {
        self.token_address.is_empty()
            || self.escrow_address.is_empty()
            || self.facilitator_address.is_empty()
    }

    /// Deterministic per-hand seed, so every hand is independently
    /// reproducible from the table-level tournament seed.
    pub fn hand_seed(&self, hand_no: u64) -> String {
        format!("{}_hand_{}", self.tournament_seed, hand_no)
    }

    /// Remote agent endpoint for a seat, if one is wired up.
    pub fn agent_endpoint(&self, seat: Position) -> Option<String> {
        var(&format!("PLAYER_{}_ENDPOINT", seat))
    }

    /// Participant address for a seat; unset seats get a local handle.
    pub fn agent_address(&self, seat: Position) -> String {
        var(&format!("PLAYER_{}_ADDRESS", seat)).unwrap_or_else(|| format!("player_{}", seat))
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
