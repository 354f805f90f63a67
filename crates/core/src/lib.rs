pub mod config;
pub mod rule;

pub use config::Config;
pub use rule::*;
