pub mod health;
pub mod document;
pub mod save;
pub mod diagnostics;
pub mod messages;
pub mod error;

pub use health::*;
pub use document::*;
pub use save::*;
pub use diagnostics::*;
pub use messages::*;
pub use error::*;
