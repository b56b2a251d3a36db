//! Configuration management for tvremote

pub mod app_config;

pub use app_config::*;
