//! Request types for HTTP handlers.

mod orders;
mod paths;
mod settings;

pub use orders::*;
pub use paths::*;
pub use settings::*;
