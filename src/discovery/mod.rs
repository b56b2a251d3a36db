//! Device discovery
//!
//! Two strategies find candidate TVs: SSDP multicast search and a subnet
//! sweep. Candidates are never persisted here; the registry only learns
//! about a device when a client connects to it or saves it.

pub mod ssdp;
pub mod sweep;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::config::{DiscoveryConfig, ProtocolConfig};
use crate::errors::DiscoveryError;
use crate::models::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryStrategy {
    #[default]
    Ssdp,
    Sweep,
    /// SSDP first, then the sweep; SSDP entries win on conflicts
    Combined,
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiscoveryStrategy::Ssdp => "ssdp",
            DiscoveryStrategy::Sweep => "sweep",
            DiscoveryStrategy::Combined => "combined",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DiscoveryStrategy {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssdp" => Ok(DiscoveryStrategy::Ssdp),
            "sweep" | "scan" => Ok(DiscoveryStrategy::Sweep),
            "combined" | "all" => Ok(DiscoveryStrategy::Combined),
            _ => Err(DiscoveryError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Ordered candidates of one discovery run, unique by IP (first seen wins)
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    devices: Vec<Device>,
    seen: HashSet<Ipv4Addr>,
}

impl DiscoveryResult {
    /// Reserve `ip`; false when it was already seen in this run
    pub fn claim(&mut self, ip: Ipv4Addr) -> bool {
        self.seen.insert(ip)
    }

    pub fn push(&mut self, device: Device) -> bool {
        if !self.claim(device.ip) {
            return false;
        }
        self.devices.push(device);
        true
    }

    pub fn extend(&mut self, devices: impl IntoIterator<Item = Device>) {
        for device in devices {
            self.push(device);
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn into_devices(self) -> Vec<Device> {
        self.devices
    }
}

/// Runs discovery strategies with one shared HTTP client
#[derive(Clone)]
pub struct DiscoveryEngine {
    config: DiscoveryConfig,
    roku_port: u16,
    http: reqwest::Client,
}

impl DiscoveryEngine {
    pub fn new(config: DiscoveryConfig, protocol: &ProtocolConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(protocol.request_timeout())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build discovery HTTP client: {}", e))?;

        Ok(Self {
            config,
            roku_port: protocol.roku_port,
            http,
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub async fn ssdp(&self) -> Result<Vec<Device>, DiscoveryError> {
        ssdp::search(&self.config, &self.http).await
    }

    /// Sweep the /24 chosen from `base`, the last used device or the default subnet
    pub async fn sweep(
        &self,
        base: Option<&str>,
        last_used: Option<Ipv4Addr>,
    ) -> Result<Vec<Device>, DiscoveryError> {
        let base = sweep::resolve_base(base, last_used, &self.config.default_subnet)?;
        Ok(sweep::sweep(base, self.roku_port, &self.config, &self.http).await)
    }

    /// Run `strategy` and return de-duplicated candidates.
    ///
    /// An empty list means nothing answered within the window, not that no
    /// device exists.
    pub async fn discover(
        &self,
        strategy: DiscoveryStrategy,
        base: Option<&str>,
        last_used: Option<Ipv4Addr>,
    ) -> Result<Vec<Device>, DiscoveryError> {
        let mut result = DiscoveryResult::default();
        match strategy {
            DiscoveryStrategy::Ssdp => result.extend(self.ssdp().await?),
            DiscoveryStrategy::Sweep => result.extend(self.sweep(base, last_used).await?),
            DiscoveryStrategy::Combined => {
                // Validate the base before spending the SSDP window
                sweep::resolve_base(base, last_used, &self.config.default_subnet)?;
                result.extend(self.ssdp().await?);
                result.extend(self.sweep(base, last_used).await?);
            }
        }
        Ok(result.into_devices())
    }
}
