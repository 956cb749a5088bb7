// tsumu - sequential multi-entry distribution builder
// Clean separation: core driver, infrastructure processors, ambient utils

pub mod cli;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod utils;
