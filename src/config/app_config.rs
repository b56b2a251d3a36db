//! Gateway configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main gateway configuration, loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerSettings,
    pub registry: RegistryConfig,
    pub protocol: ProtocolConfig,
    pub discovery: DiscoveryConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server listening address
    pub bind_address: String,
    /// Server listening port
    pub port: u16,
    /// Directory holding the browser UI, served when it exists
    pub static_dir: PathBuf,
    /// Open sessions allowed at once
    pub max_sessions: usize,
    /// Sessions untouched for this long are closed
    pub session_idle_secs: u64,
}

/// Saved-device persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub devices_file: PathBuf,
}

/// Vendor protocol tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Roku ECP port
    pub roku_port: u16,
    /// Samsung remote control WebSocket port
    pub samsung_port: u16,
    /// Timeout for a single HTTP call to a device
    pub request_timeout_ms: u64,
    /// Timeout for connect probes and WebSocket handshakes
    pub connect_timeout_ms: u64,
    /// Spacing between literal characters; devices drop input sent faster
    pub text_input_delay_ms: u64,
    /// Wait after a Samsung frame is sent before the socket is closed
    pub samsung_close_grace_ms: u64,
}

/// Discovery tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// SSDP search target
    pub search_target: String,
    /// How long SSDP responses are collected
    pub ssdp_window_ms: u64,
    /// SSDP multicast group
    pub multicast_addr: SocketAddr,
    /// SSDP MX header (seconds a responder may delay)
    pub mx: u8,
    /// First host number probed by the subnet sweep
    pub sweep_first: u8,
    /// Last host number probed by the subnet sweep
    pub sweep_last: u8,
    /// Hard per-probe timeout
    pub probe_timeout_ms: u64,
    /// Probes in flight at once
    pub sweep_concurrency: usize,
    /// Subnet used when no device has been used before
    pub default_subnet: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("./public"),
            max_sessions: 64,
            session_idle_secs: 30 * 60,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            devices_file: default_devices_file(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            roku_port: 8060,
            samsung_port: 8001,
            request_timeout_ms: 5000,
            connect_timeout_ms: 3000,
            text_input_delay_ms: 50,
            samsung_close_grace_ms: 100,
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_target: "roku:ecp".to_string(),
            ssdp_window_ms: 3000,
            multicast_addr: SocketAddr::from(([239, 255, 255, 250], 1900)),
            mx: 2,
            sweep_first: 1,
            sweep_last: 10,
            probe_timeout_ms: 1000,
            sweep_concurrency: 10,
            default_subnet: "192.168.0".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

impl ProtocolConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn text_input_delay(&self) -> Duration {
        Duration::from_millis(self.text_input_delay_ms)
    }

    pub fn samsung_close_grace(&self) -> Duration {
        Duration::from_millis(self.samsung_close_grace_ms)
    }
}

impl DiscoveryConfig {
    pub fn ssdp_window(&self) -> Duration {
        Duration::from_millis(self.ssdp_window_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: GatewayConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.bind_address, self.server.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))
    }
}

/// `<config dir>/tvremote/saved_devices.json`, or the working directory as a fallback
fn default_devices_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("tvremote"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("saved_devices.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_vendor_protocols() {
        let config = GatewayConfig::default();
        assert_eq!(config.protocol.roku_port, 8060);
        assert_eq!(config.protocol.samsung_port, 8001);
        assert_eq!(config.protocol.text_input_delay(), Duration::from_millis(50));
        assert_eq!(config.discovery.ssdp_window(), Duration::from_secs(3));
        assert_eq!(config.discovery.search_target, "roku:ecp");
        assert_eq!((config.discovery.sweep_first, config.discovery.sweep_last), (1, 10));
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
[server]
port = 8080

[discovery]
ssdp_window_ms = 1500
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.discovery.ssdp_window_ms, 1500);
        assert_eq!(config.discovery.probe_timeout_ms, 1000);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = GatewayConfig::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_generated_toml_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tvremote.toml");
        std::fs::write(&path, GatewayConfig::default().to_toml().unwrap()).unwrap();
        let config = GatewayConfig::load(&path).unwrap();
        assert_eq!(config.discovery.multicast_addr.port(), 1900);
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }
}
