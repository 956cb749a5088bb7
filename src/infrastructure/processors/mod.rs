// Bundling and minification processors
pub mod bundler;
pub mod minifier;

pub use bundler::*;
pub use minifier::*;
