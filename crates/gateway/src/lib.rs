pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod reply;
pub mod server;
pub mod state;
