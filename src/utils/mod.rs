// Shared utilities module
pub mod errors;
pub mod logging;
pub mod size;

pub use errors::*;
pub use logging::*;
pub use size::*;
