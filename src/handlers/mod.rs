pub mod health;
pub mod save;
pub mod diagnostics;

pub use health::*;
pub use save::*;
pub use diagnostics::*;
