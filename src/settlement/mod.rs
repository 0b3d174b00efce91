mod authorization;
mod backend;
mod facilitator;
mod net;

pub use authorization::Authorization;
pub use authorization::Authorizer;
pub use authorization::SessionSigner;
pub use backend::RelayBackend;
pub use backend::SettlementMode;
pub use backend::SimulatedBackend;
pub use backend::TransferBackend;
pub use facilitator::Facilitator;
pub use facilitator::SettleError;
pub use facilitator::SettlementRecord;
pub use net::split_positions;
pub use net::NetPosition;
