//! Per-session connection state machine
//!
//! `Idle -> Connecting -> Connected -> Idle`. A connect that fails, times out
//! or is cancelled always lands back in `Idle`.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{RemoteError, ROKU_REMOTE_HINT, SAMSUNG_REMOTE_HINT};
use crate::models::{
    AppInfo, Device, DeviceInfo, KeyEvent, RemoteAction, Target, Vendor, find_app_by_name,
    parse_ip,
};
use crate::protocols::{AdapterRegistry, CommandOutcome, RemoteAdapter};
use crate::registry::DeviceRegistry;

/// The active link of a session
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub vendor: Vendor,
    pub target: Target,
    pub device: Device,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting { vendor: Vendor, target: Target },
    Connected(Connection),
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting { .. } => "connecting",
            ConnectionState::Connected(_) => "connected",
        }
    }
}

/// Puts the state back to `Idle` unless the connect completed
struct ConnectingGuard<'a> {
    state: &'a mut ConnectionState,
    completed: bool,
}

impl ConnectingGuard<'_> {
    fn complete(mut self, connection: Connection) {
        *self.state = ConnectionState::Connected(connection);
        self.completed = true;
    }
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *self.state = ConnectionState::Idle;
        }
    }
}

/// Routes abstract commands to the adapter of the connected vendor
pub struct CommandDispatcher {
    adapters: Arc<AdapterRegistry>,
    registry: Arc<DeviceRegistry>,
    connect_timeout: Duration,
    state: ConnectionState,
}

impl CommandDispatcher {
    pub fn new(
        adapters: Arc<AdapterRegistry>,
        registry: Arc<DeviceRegistry>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            adapters,
            registry,
            connect_timeout,
            state: ConnectionState::Idle,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn connection(&self) -> Option<&Connection> {
        match &self.state {
            ConnectionState::Connected(connection) => Some(connection),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection().is_some()
    }

    /// Probe the device, remember it and start routing commands to it
    pub async fn connect(
        &mut self,
        vendor: Vendor,
        ip: Option<&str>,
        token: Option<String>,
    ) -> Result<Device, RemoteError> {
        let target = Target::new(parse_ip(ip)?).with_token(token);
        let adapter = self.adapters.adapter(vendor);

        self.state = ConnectionState::Connecting {
            vendor,
            target: target.clone(),
        };
        let guard = ConnectingGuard {
            state: &mut self.state,
            completed: false,
        };

        let info = match tokio::time::timeout(self.connect_timeout, adapter.device_info(&target)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(RemoteError::unreachable(
                    target.ip,
                    "connection timed out",
                    connect_hint(vendor),
                ));
            }
        };

        let mut device = info.to_device(target.ip);
        match self.registry.upsert(device.clone()).await {
            Ok(saved) => device = saved,
            Err(e) => warn!("Connected to {} but could not save it: {}", target.ip, e),
        }

        info!("Connected to {} {} ({})", vendor, device.name, target.ip);
        guard.complete(Connection {
            vendor,
            target,
            device: device.clone(),
        });
        Ok(device)
    }

    /// Local-only; no network call
    pub fn disconnect(&mut self) -> bool {
        let was_connected = self.is_connected();
        if let ConnectionState::Connected(connection) = &self.state {
            info!("Disconnected from {}", connection.target.ip);
        }
        self.state = ConnectionState::Idle;
        was_connected
    }

    fn active(&self) -> Result<(&dyn RemoteAdapter, &Target), RemoteError> {
        let connection = self.connection().ok_or(RemoteError::NotConnected)?;
        Ok((self.adapters.adapter(connection.vendor), &connection.target))
    }

    /// Resolve `key` (action name or vendor token) and send it
    pub async fn send_key(
        &self,
        key: &str,
        event: KeyEvent,
    ) -> Result<(RemoteAction, CommandOutcome), RemoteError> {
        let (adapter, target) = self.active()?;
        let action = adapter.key_map().resolve(key)?;
        let outcome = adapter.send_key(target, action, event).await?;
        Ok((action, outcome))
    }

    pub async fn send_action(&self, action: RemoteAction) -> Result<CommandOutcome, RemoteError> {
        let (adapter, target) = self.active()?;
        adapter.send_key(target, action, KeyEvent::Press).await
    }

    pub async fn launch(&self, app_id: &str) -> Result<CommandOutcome, RemoteError> {
        let (adapter, target) = self.active()?;
        adapter.launch_app(target, app_id).await
    }

    /// Launch the first installed app whose name contains `query`
    pub async fn launch_by_name(&self, query: &str) -> Result<AppInfo, RemoteError> {
        let (adapter, target) = self.active()?;
        let apps = adapter.list_apps(target).await?;
        let app = find_app_by_name(&apps, query)
            .cloned()
            .ok_or_else(|| RemoteError::AppNotFound(query.to_string()))?;
        adapter.launch_app(target, &app.id).await?;
        Ok(app)
    }

    pub async fn search(&self, keyword: &str) -> Result<CommandOutcome, RemoteError> {
        let (adapter, target) = self.active()?;
        adapter.search(target, keyword).await
    }

    pub async fn input_text(&self, text: &str) -> Result<Vec<CommandOutcome>, RemoteError> {
        let (adapter, target) = self.active()?;
        adapter.input_text(target, text).await
    }

    pub async fn list_apps(&self) -> Result<Vec<AppInfo>, RemoteError> {
        let (adapter, target) = self.active()?;
        adapter.list_apps(target).await
    }

    pub async fn device_info(&self) -> Result<DeviceInfo, RemoteError> {
        let (adapter, target) = self.active()?;
        adapter.device_info(target).await
    }
}

fn connect_hint(vendor: Vendor) -> Option<&'static str> {
    match vendor {
        Vendor::Roku => Some(ROKU_REMOTE_HINT),
        Vendor::Samsung => Some(SAMSUNG_REMOTE_HINT),
        Vendor::GoogleTv => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProtocolConfig;
    use tempfile::TempDir;

    fn dispatcher(temp: &TempDir) -> CommandDispatcher {
        let adapters = Arc::new(AdapterRegistry::new(&ProtocolConfig::default()).unwrap());
        let registry = Arc::new(DeviceRegistry::new(temp.path().join("devices.json")));
        CommandDispatcher::new(adapters, registry, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_commands_require_connection() {
        let temp = TempDir::new().unwrap();
        let dispatcher = dispatcher(&temp);

        assert!(matches!(
            dispatcher.send_key("Up", KeyEvent::Press).await,
            Err(RemoteError::NotConnected)
        ));
        assert!(matches!(dispatcher.launch("12").await, Err(RemoteError::NotConnected)));
        assert!(matches!(dispatcher.search("x").await, Err(RemoteError::NotConnected)));
        assert!(matches!(dispatcher.input_text("x").await, Err(RemoteError::NotConnected)));
    }

    #[tokio::test]
    async fn test_invalid_ip_never_leaves_idle() {
        let temp = TempDir::new().unwrap();
        let mut dispatcher = dispatcher(&temp);

        let err = dispatcher.connect(Vendor::Roku, Some("not-an-ip"), None).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidTarget(_)));
        assert_eq!(dispatcher.state(), &ConnectionState::Idle);
    }

    #[tokio::test]
    async fn test_google_connect_returns_to_idle() {
        let temp = TempDir::new().unwrap();
        let mut dispatcher = dispatcher(&temp);

        let err = dispatcher
            .connect(Vendor::GoogleTv, Some("192.168.1.30"), None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 501);
        assert_eq!(dispatcher.state().label(), "idle");
    }

    #[test]
    fn test_disconnect_when_idle() {
        let temp = TempDir::new().unwrap();
        let mut dispatcher = dispatcher(&temp);
        assert!(!dispatcher.disconnect());
        assert_eq!(dispatcher.state(), &ConnectionState::Idle);
    }
}
