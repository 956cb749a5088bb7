// Infrastructure layer
pub mod file_system;
pub mod processors;
pub mod reporter;

pub use file_system::*;
pub use processors::*;
pub use reporter::*;
