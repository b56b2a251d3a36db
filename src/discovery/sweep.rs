//! Subnet sweep: probe a handful of hosts on a /24 for a Roku ECP endpoint
//!
//! Probes run concurrently (bounded) and each is cut off by its own
//! timeout, so one silent host never stalls the rest.

use futures_util::{StreamExt, stream};
use log::{debug, info};
use std::net::Ipv4Addr;

use crate::config::DiscoveryConfig;
use crate::errors::DiscoveryError;
use crate::models::{Device, DeviceInfo, Vendor};
use crate::protocols::xml;

/// Validate an explicit `a.b.c` base
pub fn parse_base(base: &str) -> Result<[u8; 3], DiscoveryError> {
    let octets: Vec<&str> = base.trim().trim_end_matches('.').split('.').collect();
    if octets.len() != 3 {
        return Err(DiscoveryError::InvalidBase(base.to_string()));
    }

    let mut parsed = [0u8; 3];
    for (slot, octet) in parsed.iter_mut().zip(octets) {
        *slot = octet
            .parse()
            .map_err(|_| DiscoveryError::InvalidBase(base.to_string()))?;
    }
    Ok(parsed)
}

/// The /24 of `ip`, as `a.b.c`
pub fn subnet_of(ip: Ipv4Addr) -> String {
    let [a, b, c, _] = ip.octets();
    format!("{}.{}.{}", a, b, c)
}

/// Pick the sweep base: explicit, else the last used device, else the default
pub fn resolve_base(
    explicit: Option<&str>,
    last_used: Option<Ipv4Addr>,
    default_subnet: &str,
) -> Result<[u8; 3], DiscoveryError> {
    match explicit.filter(|b| !b.trim().is_empty()) {
        Some(base) => parse_base(base),
        None => match last_used {
            Some(ip) => parse_base(&subnet_of(ip)),
            None => parse_base(default_subnet),
        },
    }
}

/// Probe `.sweep_first` through `.sweep_last` of `base` and return responders in address order
pub async fn sweep(
    base: [u8; 3],
    roku_port: u16,
    config: &DiscoveryConfig,
    http: &reqwest::Client,
) -> Vec<Device> {
    let [a, b, c] = base;
    let hosts = config.sweep_first..=config.sweep_last;
    info!(
        "Sweeping {}.{}.{}.{}-{} ({} in flight)",
        a, b, c, config.sweep_first, config.sweep_last, config.sweep_concurrency
    );

    let devices: Vec<Device> = stream::iter(hosts)
        .map(|host| {
            let ip = Ipv4Addr::new(a, b, c, host);
            probe(ip, roku_port, config, http)
        })
        .buffered(config.sweep_concurrency.max(1))
        .filter_map(|found| async move { found })
        .collect()
        .await;

    info!("Sweep found {} device(s)", devices.len());
    devices
}

async fn probe(
    ip: Ipv4Addr,
    port: u16,
    config: &DiscoveryConfig,
    http: &reqwest::Client,
) -> Option<Device> {
    let url = format!("http://{}:{}/query/device-info", ip, port);
    let attempt = async {
        let response = http.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        Some(response.text().await.unwrap_or_default())
    };

    // Dropping the future on timeout aborts the request
    let body = match tokio::time::timeout(config.probe_timeout(), attempt).await {
        Ok(Some(body)) => body,
        Ok(None) => return None,
        Err(_) => {
            debug!("Probe of {} timed out", ip);
            return None;
        }
    };
    debug!("Probe of {} answered", ip);

    let mut device = Device::candidate(ip, Vendor::Roku);
    match xml::flat_fields(&body, "device-info") {
        Ok(fields) => {
            let info = DeviceInfo::new(Vendor::Roku, fields);
            device.name = info.name();
            device.model = info.model();
            device.serial = info.serial();
        }
        Err(_) => device.name = format!("Roku at {}", ip),
    }
    Some(device)
}
