//! SSDP (UDP multicast) search for Roku players
//!
//! An `M-SEARCH` goes out once; responses are collected until the window
//! closes. Each new responder's `LOCATION` descriptor is fetched in the
//! background while listening continues; only descriptors parsed before
//! the window closes make it into the result.

use log::{debug, info, warn};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::DiscoveryResult;
use crate::config::DiscoveryConfig;
use crate::errors::DiscoveryError;
use crate::models::{Device, Vendor};
use crate::protocols::xml;

/// Build the `M-SEARCH` request for `search_target`
pub fn search_request(config: &DiscoveryConfig) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\r\n",
        config.multicast_addr, config.mx, config.search_target
    )
}

/// Headers of one SSDP response, keyed by upper-cased name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SsdpResponse {
    headers: HashMap<String, String>,
}

impl SsdpResponse {
    /// Parse an `HTTP/1.1 200 OK` SSDP answer; anything else is ignored
    pub fn parse(packet: &str) -> Option<Self> {
        let mut lines = packet.lines();
        let status = lines.next()?.trim();
        if !status.starts_with("HTTP/") || !status.contains(" 200") {
            return None;
        }

        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_uppercase(), value.trim().to_string()))
            .collect();
        Some(Self { headers })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn location(&self) -> Option<&str> {
        self.header("LOCATION")
    }

    /// A response without `ST` is accepted; one naming another target is not
    pub fn matches(&self, search_target: &str) -> bool {
        self.header("ST")
            .map(|st| st.eq_ignore_ascii_case(search_target))
            .unwrap_or(true)
    }
}

/// Run one SSDP search and return the described devices in arrival order
pub async fn search(
    config: &DiscoveryConfig,
    http: &reqwest::Client,
) -> Result<Vec<Device>, DiscoveryError> {
    let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0))).await?;
    socket.send_to(search_request(config).as_bytes(), config.multicast_addr).await?;
    debug!(
        "Sent M-SEARCH for {} to {}",
        config.search_target, config.multicast_addr
    );

    let mut seen = DiscoveryResult::default();
    let mut fetches: Vec<JoinHandle<Option<Device>>> = Vec::new();
    let mut buf = [0u8; 2048];
    let deadline = Instant::now() + config.ssdp_window();

    while Instant::now() < deadline {
        let remaining = deadline - Instant::now();
        let (len, from) = match tokio::time::timeout(remaining, socket.recv_from(&mut buf)).await {
            Ok(Ok(received)) => received,
            Ok(Err(e)) => {
                warn!("SSDP receive error: {}", e);
                continue;
            }
            Err(_) => break,
        };

        let IpAddr::V4(ip) = from.ip() else {
            continue;
        };
        let Some(response) = SsdpResponse::parse(&String::from_utf8_lossy(&buf[..len])) else {
            continue;
        };
        if !response.matches(&config.search_target) {
            continue;
        }
        let Some(location) = response.location() else {
            debug!("SSDP response from {} has no LOCATION", ip);
            continue;
        };
        if !seen.claim(ip) {
            debug!("Ignoring repeated SSDP response from {}", ip);
            continue;
        }

        debug!("SSDP responder {} at {}", ip, location);
        let http = http.clone();
        let location = location.to_string();
        fetches.push(tokio::spawn(async move {
            describe(&http, ip, &location).await
        }));
    }

    // Descriptors still pending when the window closes are dropped
    let mut devices = Vec::with_capacity(fetches.len());
    for mut fetch in fetches {
        match tokio::time::timeout_at(deadline, &mut fetch).await {
            Ok(Ok(Some(device))) => devices.push(device),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => warn!("Descriptor fetch task failed: {}", e),
            Err(_) => {
                fetch.abort();
                debug!("Descriptor not ready before the SSDP window closed");
            }
        }
    }

    info!("SSDP search found {} device(s)", devices.len());
    Ok(devices)
}

/// Fetch and parse a device descriptor; any failure drops the responder
async fn describe(http: &reqwest::Client, ip: Ipv4Addr, location: &str) -> Option<Device> {
    let body = match http.get(location).send().await {
        Ok(response) if response.status().is_success() => response.text().await.ok()?,
        Ok(response) => {
            warn!("Descriptor {} answered {}", location, response.status());
            return None;
        }
        Err(e) => {
            warn!("Failed to fetch descriptor {}: {}", location, e);
            return None;
        }
    };

    let description = match xml::parse_device_description(&body) {
        Ok(description) => description,
        Err(e) => {
            warn!("Unreadable descriptor from {}: {}", ip, e);
            return None;
        }
    };

    let mut device = Device::candidate(ip, Vendor::Roku);
    if let Some(name) = description.friendly_name {
        device.name = name;
    }
    if let Some(model) = description.model_name {
        device.model = model;
    }
    device.serial = description.serial_number;
    Some(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_shape() {
        let request = search_request(&DiscoveryConfig::default());
        assert!(request.starts_with("M-SEARCH * HTTP/1.1\r\n"));
        assert!(request.contains("HOST: 239.255.255.250:1900\r\n"));
        assert!(request.contains("MAN: \"ssdp:discover\"\r\n"));
        assert!(request.contains("ST: roku:ecp\r\n"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_parse_response_headers_case_insensitive() {
        let packet = "HTTP/1.1 200 OK\r\nCache-Control: max-age=3600\r\nst: roku:ecp\r\nLocation: http://192.168.1.134:8060/\r\nUSN: uuid:roku:ecp:P0A070000007\r\n\r\n";
        let response = SsdpResponse::parse(packet).unwrap();
        assert_eq!(response.location(), Some("http://192.168.1.134:8060/"));
        assert_eq!(response.header("usn"), Some("uuid:roku:ecp:P0A070000007"));
        assert!(response.matches("roku:ecp"));
        assert!(!response.matches("ssdp:all-other"));
    }

    #[test]
    fn test_parse_rejects_requests_and_errors() {
        assert!(SsdpResponse::parse("M-SEARCH * HTTP/1.1\r\nST: roku:ecp\r\n\r\n").is_none());
        assert!(SsdpResponse::parse("HTTP/1.1 404 Not Found\r\n\r\n").is_none());
        assert!(SsdpResponse::parse("").is_none());
    }

    #[test]
    fn test_missing_st_is_accepted() {
        let response = SsdpResponse::parse("HTTP/1.1 200 OK\r\nLOCATION: http://x/\r\n").unwrap();
        assert!(response.matches("roku:ecp"));
    }
}
