mod config;
mod runner;

pub use config::*;
pub use runner::*;
