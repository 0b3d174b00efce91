//! Dealer, settlement, and orchestration services for gasless multiplayer poker.
//!
//! One table runs as one process. The [`gameplay`] engine is the functional
//! core: it owns seats, pot, and streets for the duration of a hand and does
//! no I/O. The [`gameroom`] orchestrator drives hands to completion across
//! remote player agents with bounded waits, the [`receipt`] module commits
//! each finished hand to an auditable hash, and the [`settlement`] facilitator
//! converts per-seat deltas into signed, collect-before-pay token transfers.
//! The [`hosting`] module exposes the operational HTTP surface.
pub mod cards;
pub mod config;
pub mod gameplay;
pub mod gameroom;
pub mod hosting;
pub mod receipt;
pub mod settlement;

/// Chip amounts in token base units.
pub type Chips = i64;
/// Seat index around the table.
pub type Position = usize;

/// Initialize combined logging: terminal at Info, logs/<ts>.log at Debug.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("install ctrl-c handler");
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

/// Seconds since the Unix epoch.
pub fn clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs()
}
