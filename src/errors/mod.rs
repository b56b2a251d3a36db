//! Error taxonomy for tvremote

mod types;

pub use types::*;
