pub mod handler;
pub mod session;
pub mod msg_update_handler;
pub mod msg_meta_handler;
pub mod msg_ping_handler;

pub use handler::websocket_handler;
