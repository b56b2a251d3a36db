//! Utility functions and helpers used throughout tvremote

pub mod logging;
pub mod network;
