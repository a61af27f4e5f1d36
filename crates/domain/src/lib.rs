pub mod assistant;
pub mod config;
pub mod error;
