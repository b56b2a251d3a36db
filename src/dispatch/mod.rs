//! Command dispatch and per-client sessions

pub mod dispatcher;
pub mod session;

pub use dispatcher::{CommandDispatcher, Connection, ConnectionState};
pub use session::{SessionSnapshot, SessionTable};
