mod floor;
mod server;

pub use floor::Floor;
pub use server::Server;
