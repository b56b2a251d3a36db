//! Vendor protocol adapters
//!
//! Each TV vendor implements [`RemoteAdapter`]; [`AdapterRegistry`] picks
//! the adapter for a [`Vendor`] so callers never branch on vendor names.

pub mod google;
pub mod keymap;
pub mod roku;
pub mod samsung;
pub mod xml;

pub use google::GoogleTvAdapter;
pub use keymap::VendorKeyMap;
pub use roku::RokuAdapter;
pub use samsung::SamsungAdapter;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::config::ProtocolConfig;
use crate::errors::RemoteError;
use crate::models::{AppIcon, AppInfo, DeviceInfo, KeyEvent, RemoteAction, Target, Vendor};

/// What a command actually put on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    /// Request path or key token sent to the device
    pub wire: String,
    /// HTTP status, for HTTP-based vendors
    pub status: Option<u16>,
    /// Whether the device acknowledged the command
    pub accepted: bool,
}

impl CommandOutcome {
    pub fn sent(wire: impl Into<String>) -> Self {
        Self {
            wire: wire.into(),
            status: None,
            accepted: true,
        }
    }
}

/// Capability contract shared by every vendor
#[async_trait]
pub trait RemoteAdapter: Send + Sync {
    fn vendor(&self) -> Vendor;

    fn key_map(&self) -> &'static VendorKeyMap {
        VendorKeyMap::for_vendor(self.vendor())
    }

    /// Send one key press, hold or release
    async fn send_key(
        &self,
        target: &Target,
        action: RemoteAction,
        event: KeyEvent,
    ) -> Result<CommandOutcome, RemoteError>;

    /// Lightweight capability probe; also used to name a device on connect
    async fn device_info(&self, target: &Target) -> Result<DeviceInfo, RemoteError>;

    async fn launch_app(&self, _target: &Target, _app_id: &str) -> Result<CommandOutcome, RemoteError> {
        Err(self.not_implemented("app launch"))
    }

    async fn search(&self, _target: &Target, _keyword: &str) -> Result<CommandOutcome, RemoteError> {
        Err(self.not_implemented("search"))
    }

    async fn input_text(&self, _target: &Target, _text: &str) -> Result<Vec<CommandOutcome>, RemoteError> {
        Err(self.not_implemented("text input"))
    }

    async fn list_apps(&self, _target: &Target) -> Result<Vec<AppInfo>, RemoteError> {
        Err(self.not_implemented("app listing"))
    }

    async fn app_icon(&self, _target: &Target, _app_id: &str) -> Result<AppIcon, RemoteError> {
        Err(self.not_implemented("app icons"))
    }

    fn not_implemented(&self, operation: &'static str) -> RemoteError {
        RemoteError::NotImplemented {
            vendor: self.vendor(),
            operation,
            message: format!("{} does not support {} in this version", self.vendor(), operation),
        }
    }
}

/// One adapter per vendor, selected by an exhaustive match
pub struct AdapterRegistry {
    roku: RokuAdapter,
    samsung: SamsungAdapter,
    google: GoogleTvAdapter,
}

impl AdapterRegistry {
    pub fn new(config: &ProtocolConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            roku: RokuAdapter::new(http.clone(), config),
            samsung: SamsungAdapter::new(http, config),
            google: GoogleTvAdapter,
        })
    }

    pub fn adapter(&self, vendor: Vendor) -> &dyn RemoteAdapter {
        match vendor {
            Vendor::Roku => &self.roku,
            Vendor::Samsung => &self.samsung,
            Vendor::GoogleTv => &self.google,
        }
    }
}
