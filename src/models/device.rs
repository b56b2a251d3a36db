//! Device records, device-info probes and command targets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::Ipv4Addr;

use super::action::Vendor;
use crate::errors::RemoteError;

/// A television known to the gateway, keyed by its IPv4 address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub ip: Ipv4Addr,
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default)]
    pub vendor: Vendor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl Device {
    /// Transient candidate as produced by discovery (never stamped with `last_used`)
    pub fn candidate(ip: Ipv4Addr, vendor: Vendor) -> Self {
        Self {
            ip,
            name: vendor.fallback_device_name().to_string(),
            model: "Unknown".to_string(),
            serial: None,
            vendor,
            last_used: None,
        }
    }
}

/// Network address of a command target plus an optional pairing token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub ip: Ipv4Addr,
    pub token: Option<String>,
}

impl Target {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self { ip, token: None }
    }

    /// Validate a caller-supplied address; no network access happens here
    pub fn parse(ip: Option<&str>) -> Result<Self, RemoteError> {
        Ok(Self::new(parse_ip(ip)?))
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

/// Parse a dotted-quad IPv4 address, mapping absence or garbage to `InvalidTarget`
pub fn parse_ip(ip: Option<&str>) -> Result<Ipv4Addr, RemoteError> {
    let raw = ip
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RemoteError::InvalidTarget("IP address required".to_string()))?;

    raw.parse::<Ipv4Addr>()
        .map_err(|_| RemoteError::InvalidTarget(format!("Invalid IPv4 address: {}", raw)))
}

/// Result of a vendor device-info probe.
///
/// Serializes as the vendor's own fields so the HTTP layer can pass them
/// through unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    #[serde(skip)]
    pub vendor: Vendor,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl DeviceInfo {
    pub fn new(vendor: Vendor, properties: Map<String, Value>) -> Self {
        Self { vendor, properties }
    }

    fn string_at(&self, path: &[&str]) -> Option<String> {
        let (first, rest) = path.split_first()?;
        let mut value = self.properties.get(*first)?;
        for key in rest {
            value = value.get(*key)?;
        }
        value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Display name, falling back to the model name and then a vendor default
    pub fn name(&self) -> String {
        let candidates: &[&[&str]] = match self.vendor {
            Vendor::Roku => &[&["friendly-device-name"], &["model-name"]],
            Vendor::Samsung => &[&["device", "name"], &["name"], &["device", "modelName"]],
            Vendor::GoogleTv => &[],
        };
        candidates
            .iter()
            .find_map(|path| self.string_at(path))
            .unwrap_or_else(|| self.vendor.fallback_device_name().to_string())
    }

    pub fn model(&self) -> String {
        let path: &[&str] = match self.vendor {
            Vendor::Roku => &["model-name"],
            Vendor::Samsung => &["device", "modelName"],
            Vendor::GoogleTv => &[],
        };
        self.string_at(path).unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn serial(&self) -> Option<String> {
        match self.vendor {
            Vendor::Roku => self.string_at(&["serial-number"]),
            Vendor::Samsung => self.string_at(&["device", "id"]),
            Vendor::GoogleTv => None,
        }
    }

    /// Registry record for the probed device, stamped as used now
    pub fn to_device(&self, ip: Ipv4Addr) -> Device {
        Device {
            ip,
            name: self.name(),
            model: self.model(),
            serial: self.serial(),
            vendor: self.vendor,
            last_used: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(vendor: Vendor, value: Value) -> DeviceInfo {
        match value {
            Value::Object(map) => DeviceInfo::new(vendor, map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_parse_ip_rejects_missing_and_malformed() {
        assert!(matches!(parse_ip(None), Err(RemoteError::InvalidTarget(_))));
        assert!(matches!(parse_ip(Some("  ")), Err(RemoteError::InvalidTarget(_))));
        assert!(matches!(
            parse_ip(Some("192.168.1")),
            Err(RemoteError::InvalidTarget(_))
        ));
        assert!(matches!(
            parse_ip(Some("300.1.1.1")),
            Err(RemoteError::InvalidTarget(_))
        ));
        assert_eq!(
            parse_ip(Some(" 10.0.0.5 ")).unwrap(),
            Ipv4Addr::new(10, 0, 0, 5)
        );
    }

    #[test]
    fn test_roku_name_falls_back_to_model_then_default() {
        let full = info(
            Vendor::Roku,
            json!({"friendly-device-name": "Living Room", "model-name": "Roku Ultra"}),
        );
        assert_eq!(full.name(), "Living Room");
        assert_eq!(full.model(), "Roku Ultra");

        let model_only = info(Vendor::Roku, json!({"model-name": "Roku Express"}));
        assert_eq!(model_only.name(), "Roku Express");

        let empty = info(Vendor::Roku, json!({"friendly-device-name": ""}));
        assert_eq!(empty.name(), "Roku Device");
        assert_eq!(empty.model(), "Unknown");
    }

    #[test]
    fn test_samsung_fields_come_from_nested_device() {
        let samsung = info(
            Vendor::Samsung,
            json!({"name": "Samsung Q60", "device": {"name": "[TV] Bedroom", "modelName": "QN55Q60", "id": "uuid:1"}}),
        );
        assert_eq!(samsung.name(), "[TV] Bedroom");
        assert_eq!(samsung.model(), "QN55Q60");
        assert_eq!(samsung.serial().as_deref(), Some("uuid:1"));
    }

    #[test]
    fn test_device_info_serializes_as_passthrough() {
        let roku = info(Vendor::Roku, json!({"model-name": "Roku Ultra"}));
        let value = serde_json::to_value(&roku).unwrap();
        assert_eq!(value, json!({"model-name": "Roku Ultra"}));
    }

    #[test]
    fn test_device_deserializes_legacy_record_without_vendor() {
        let device: Device =
            serde_json::from_str(r#"{"ip":"10.0.0.5","name":"TV","model":"Unknown"}"#).unwrap();
        assert_eq!(device.vendor, Vendor::Roku);
        assert!(device.last_used.is_none());
    }
}
