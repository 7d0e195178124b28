pub mod arena;
pub mod bot_driver;
pub mod bot_strategy;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod log;
pub mod pacing;
pub mod session;
