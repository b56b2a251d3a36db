//! Custom error types for tvremote

use std::net::Ipv4Addr;
use thiserror::Error;

use crate::models::{RemoteAction, Vendor};

/// Hint shown when a Roku refuses or ignores control requests
pub const ROKU_REMOTE_HINT: &str = "Make sure the Roku is on and \"Control by mobile apps\" is enabled in Settings \u{2192} System \u{2192} Advanced system settings";

/// Hint shown when a Samsung TV refuses the remote control channel
pub const SAMSUNG_REMOTE_HINT: &str = "Make sure your Samsung TV is on and \"Remote Access\" is enabled in Settings \u{2192} General \u{2192} Network";

/// Hint shown for every Google TV request
pub const GOOGLE_TV_HINT: &str = "For now, use the official Google TV app on your phone";

/// Failure of a vendor call, already converted at the adapter boundary
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Missing or malformed IP address; rejected before any network access
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// Timeout, refused connection or failed send
    #[error("Device at {target} is unreachable: {reason}")]
    RemoteUnreachable {
        target: Ipv4Addr,
        reason: String,
        hint: Option<String>,
    },

    /// The action has no wire token for this vendor
    #[error("{vendor} does not support the {action} action")]
    UnsupportedAction { vendor: Vendor, action: String },

    /// The vendor protocol (or this operation of it) is not implemented
    #[error("{vendor} {operation} is not implemented: {message}")]
    NotImplemented {
        vendor: Vendor,
        operation: &'static str,
        message: String,
    },

    /// No installed app matched a launch-by-name query
    #[error("No installed app matches '{0}'")]
    AppNotFound(String),

    /// Session has no active connection
    #[error("Not connected to a TV")]
    NotConnected,

    /// The device answered with something that could not be interpreted
    #[error("Unexpected device response: {0}")]
    Protocol(String),
}

impl RemoteError {
    pub fn unreachable(target: Ipv4Addr, reason: impl ToString, hint: Option<&str>) -> Self {
        RemoteError::RemoteUnreachable {
            target,
            reason: reason.to_string(),
            hint: hint.map(str::to_string),
        }
    }

    pub fn unsupported(vendor: Vendor, action: RemoteAction) -> Self {
        RemoteError::UnsupportedAction {
            vendor,
            action: action.to_string(),
        }
    }

    /// Stable machine-readable label
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteError::InvalidTarget(_) => "invalid_target",
            RemoteError::RemoteUnreachable { .. } => "remote_unreachable",
            RemoteError::UnsupportedAction { .. } => "unsupported_action",
            RemoteError::NotImplemented { .. } => "not_implemented",
            RemoteError::AppNotFound(_) => "app_not_found",
            RemoteError::NotConnected => "not_connected",
            RemoteError::Protocol(_) => "protocol_error",
        }
    }

    /// Remediation text suitable for a user-facing notification
    pub fn hint(&self) -> Option<&str> {
        match self {
            RemoteError::RemoteUnreachable { hint, .. } => hint.as_deref(),
            RemoteError::NotImplemented {
                vendor: Vendor::GoogleTv,
                ..
            } => Some(GOOGLE_TV_HINT),
            RemoteError::NotConnected => Some("Connect to a TV first"),
            _ => None,
        }
    }

    /// HTTP status the gateway answers with
    pub fn status_code(&self) -> u16 {
        match self {
            RemoteError::InvalidTarget(_) | RemoteError::UnsupportedAction { .. } => 400,
            RemoteError::AppNotFound(_) => 404,
            RemoteError::NotConnected => 409,
            RemoteError::NotImplemented { .. } => 501,
            RemoteError::RemoteUnreachable { .. } | RemoteError::Protocol(_) => 502,
        }
    }
}

/// Saved-device registry failures
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Device not found: {0}")]
    NotFound(Ipv4Addr),

    #[error("Invalid device: {0}")]
    Invalid(String),

    #[error("Registry I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Registry serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RemoteError> for RegistryError {
    fn from(err: RemoteError) -> Self {
        RegistryError::Invalid(err.to_string())
    }
}

impl RegistryError {
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::NotFound(_) => 404,
            RegistryError::Invalid(_) => 400,
            RegistryError::Io(_) | RegistryError::Serialization(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::NotFound(_) => "not_found",
            RegistryError::Invalid(_) => "invalid_device",
            RegistryError::Io(_) => "registry_io",
            RegistryError::Serialization(_) => "registry_serialization",
        }
    }
}

/// Discovery run failures; an empty result is not an error
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Invalid subnet base '{0}', expected three octets like 192.168.1")]
    InvalidBase(String),

    #[error("Unknown discovery strategy '{0}', expected ssdp, sweep or combined")]
    UnknownStrategy(String),

    #[error("Discovery socket error: {0}")]
    Socket(#[from] std::io::Error),
}

impl DiscoveryError {
    pub fn status_code(&self) -> u16 {
        match self {
            DiscoveryError::InvalidBase(_) | DiscoveryError::UnknownStrategy(_) => 400,
            DiscoveryError::Socket(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DiscoveryError::InvalidBase(_) => "invalid_base",
            DiscoveryError::UnknownStrategy(_) => "unknown_strategy",
            DiscoveryError::Socket(_) => "discovery_socket",
        }
    }
}

/// Session table failures
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Too many open sessions (limit {0}); close an unused one and retry")]
    LimitReached(usize),
}

impl SessionError {
    pub fn status_code(&self) -> u16 {
        match self {
            SessionError::LimitReached(_) => 503,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::LimitReached(_) => "session_limit",
        }
    }
}
