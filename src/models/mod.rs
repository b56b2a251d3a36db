//! Data models and types used throughout tvremote

pub mod action;
pub mod app;
pub mod device;
pub mod responses;

// Re-export commonly used types
pub use action::*;
pub use app::*;
pub use device::*;
pub use responses::*;
