//! tvremote - LAN remote-control gateway for televisions
//!
//! Forwards key presses, app launches, searches and text input to TVs on
//! the local network. Roku is driven over ECP (HTTP), Samsung over its
//! remote-control WebSocket; Google TV is reserved but not implemented.
//! TVs are found with SSDP or a subnet sweep and remembered in a small
//! JSON registry.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod errors;
pub mod models;
pub mod protocols;
pub mod registry;
pub mod server;
pub mod utils;

// Re-export commonly used types
pub use errors::*;
pub use models::*;

/// tvremote version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// tvremote application name
pub const APP_NAME: &str = "tvremote";
