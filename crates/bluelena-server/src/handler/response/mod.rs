//! Response types for HTTP handlers.

mod errors;
mod monitors;
mod orders;
mod settings;

pub use errors::*;
pub use monitors::*;
pub use orders::*;
pub use settings::*;
