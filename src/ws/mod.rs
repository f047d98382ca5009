pub mod document;
pub mod registry;
pub mod hub;

pub use hub::Hub;
pub use registry::ConnectionId;
