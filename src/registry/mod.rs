//! Saved-device registry backed by a single JSON file
//!
//! The whole list is rewritten on every mutation. Mutations hold one async
//! mutex across read-modify-write so concurrent sessions never lose updates.

use chrono::Utc;
use log::{debug, warn};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::RegistryError;
use crate::models::{Device, SaveDeviceRequest, parse_ip};

const DEFAULT_MODEL: &str = "Unknown";

pub struct DeviceRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl DeviceRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved devices; a missing or unreadable file reads as empty
    pub async fn list(&self) -> Vec<Device> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Device with the most recent `lastUsed`
    pub async fn most_recent(&self) -> Option<Device> {
        self.list()
            .await
            .into_iter()
            .filter(|d| d.last_used.is_some())
            .max_by_key(|d| d.last_used)
    }

    /// Validate a save request and upsert it
    pub async fn save(&self, request: SaveDeviceRequest) -> Result<Device, RegistryError> {
        let ip = parse_ip(request.ip.as_deref())?;
        let vendor = request.vendor.unwrap_or_default();
        let device = Device {
            ip,
            name: non_empty(request.name).unwrap_or_else(|| vendor.fallback_device_name().to_string()),
            model: non_empty(request.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            serial: non_empty(request.serial),
            vendor,
            last_used: None,
        };
        self.upsert(device).await
    }

    /// Insert or replace the entry for `device.ip`, stamping `lastUsed`
    pub async fn upsert(&self, mut device: Device) -> Result<Device, RegistryError> {
        let _guard = self.lock.lock().await;
        let mut devices = self.read().await;

        device.last_used = Some(Utc::now());
        match devices.iter_mut().find(|d| d.ip == device.ip) {
            Some(existing) => *existing = device.clone(),
            None => devices.push(device.clone()),
        }

        self.write(&devices).await?;
        debug!("Saved device {} ({})", device.ip, device.name);
        Ok(device)
    }

    pub async fn rename(&self, ip: Ipv4Addr, name: &str) -> Result<Device, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::Invalid("Name required".to_string()));
        }

        let _guard = self.lock.lock().await;
        let mut devices = self.read().await;
        let device = devices
            .iter_mut()
            .find(|d| d.ip == ip)
            .ok_or(RegistryError::NotFound(ip))?;

        device.name = name.to_string();
        device.last_used = Some(Utc::now());
        let renamed = device.clone();

        self.write(&devices).await?;
        Ok(renamed)
    }

    /// Remove `ip`; removing an absent device succeeds
    pub async fn remove(&self, ip: Ipv4Addr) -> Result<bool, RegistryError> {
        let _guard = self.lock.lock().await;
        let mut devices = self.read().await;
        let before = devices.len();
        devices.retain(|d| d.ip != ip);

        if devices.len() == before {
            return Ok(false);
        }
        self.write(&devices).await?;
        Ok(true)
    }

    async fn read(&self) -> Vec<Device> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(
                "Ignoring unreadable saved devices file {}: {}",
                self.path.display(),
                e
            );
            Vec::new()
        })
    }

    /// Write a sibling temp file, flush it, then rename it over the registry
    async fn write(&self, devices: &[Device]) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(devices)?;

        let staging = self.staging_path();
        let mut file = tokio::fs::File::create(&staging).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "saved_devices.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vendor;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn request(ip: &str, name: Option<&str>) -> SaveDeviceRequest {
        SaveDeviceRequest {
            ip: Some(ip.to_string()),
            name: name.map(str::to_string),
            model: None,
            serial: None,
            vendor: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_ip() {
        let temp = TempDir::new().unwrap();
        let registry = DeviceRegistry::new(temp.path().join("devices.json"));

        registry.save(request("10.0.0.5", Some("X"))).await.unwrap();
        registry.save(request("10.0.0.5", Some("X"))).await.unwrap();

        let devices = registry.list().await;
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "X");
        assert!(devices[0].last_used.is_some());
    }

    #[tokio::test]
    async fn test_save_applies_defaults() {
        let temp = TempDir::new().unwrap();
        let registry = DeviceRegistry::new(temp.path().join("devices.json"));

        let device = registry.save(request("10.0.0.6", None)).await.unwrap();
        assert_eq!(device.name, "Roku Device");
        assert_eq!(device.model, "Unknown");
        assert_eq!(device.vendor, Vendor::Roku);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_ip() {
        let temp = TempDir::new().unwrap();
        let registry = DeviceRegistry::new(temp.path().join("devices.json"));

        let err = registry.save(request("10.0.0", Some("X"))).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_rename_missing_leaves_registry_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("devices.json");
        let registry = DeviceRegistry::new(&path);
        registry.save(request("10.0.0.5", Some("X"))).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = registry
            .rename(Ipv4Addr::new(10, 0, 0, 9), "Other")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_rename_and_remove() {
        let temp = TempDir::new().unwrap();
        let registry = DeviceRegistry::new(temp.path().join("devices.json"));
        let ip = Ipv4Addr::new(10, 0, 0, 5);
        registry.save(request("10.0.0.5", Some("X"))).await.unwrap();

        let renamed = registry.rename(ip, "Kitchen").await.unwrap();
        assert_eq!(renamed.name, "Kitchen");

        assert!(registry.remove(ip).await.unwrap());
        assert!(!registry.remove(ip).await.unwrap());
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("devices.json");
        std::fs::write(&path, "{ not json").unwrap();

        let registry = DeviceRegistry::new(&path);
        assert!(registry.list().await.is_empty());

        registry.save(request("10.0.0.7", None)).await.unwrap();
        assert_eq!(registry.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_most_recent_device() {
        let temp = TempDir::new().unwrap();
        let registry = DeviceRegistry::new(temp.path().join("devices.json"));
        registry.save(request("10.0.0.5", None)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        registry.save(request("10.0.1.8", None)).await.unwrap();

        let recent = registry.most_recent().await.unwrap();
        assert_eq!(recent.ip, Ipv4Addr::new(10, 0, 1, 8));
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_not_lost() {
        let temp = TempDir::new().unwrap();
        let registry = Arc::new(DeviceRegistry::new(temp.path().join("devices.json")));

        let mut handles = Vec::new();
        for host in 1..=20u8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .save(request(&format!("10.0.0.{}", host), None))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.list().await.len(), 20);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_previous_file_intact() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("devices.json");
        let registry = DeviceRegistry::new(path.clone());
        registry.save(request("10.0.0.5", Some("Den"))).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        // A directory squatting on the staging name makes the next write fail
        std::fs::create_dir(temp.path().join("devices.json.tmp")).unwrap();
        assert!(registry.save(request("10.0.0.6", Some("Office"))).await.is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        let devices = registry.list().await;
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name, "Den");
    }

    #[tokio::test]
    async fn test_write_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();
        let registry = DeviceRegistry::new(temp.path().join("devices.json"));
        registry.save(request("10.0.0.5", None)).await.unwrap();
        registry.rename("10.0.0.5".parse().unwrap(), "Kitchen").await.unwrap();

        assert!(!temp.path().join("devices.json.tmp").exists());
        assert_eq!(registry.list().await[0].name, "Kitchen");
    }
}
