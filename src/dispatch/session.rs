//! Session table: one [`CommandDispatcher`] per client

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::dispatcher::{CommandDispatcher, ConnectionState};
use crate::errors::SessionError;
use crate::models::{Device, Vendor};
use crate::protocols::AdapterRegistry;
use crate::registry::DeviceRegistry;

pub type SessionHandle = Arc<Mutex<CommandDispatcher>>;

/// Serializable view of a session's connection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub state: &'static str,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<Vendor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

impl SessionSnapshot {
    pub fn capture(session_id: Uuid, dispatcher: &CommandDispatcher) -> Self {
        let state = dispatcher.state();
        let (vendor, ip, device) = match state {
            ConnectionState::Idle => (None, None, None),
            ConnectionState::Connecting { vendor, target } => {
                (Some(*vendor), Some(target.ip.to_string()), None)
            }
            ConnectionState::Connected(connection) => (
                Some(connection.vendor),
                Some(connection.target.ip.to_string()),
                Some(connection.device.clone()),
            ),
        };

        Self {
            session_id,
            state: state.label(),
            connected: dispatcher.is_connected(),
            vendor,
            ip,
            device,
        }
    }
}

struct SessionEntry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// Sessions share only the adapters and the registry.
///
/// Each lookup refreshes a session; sessions idle for longer than
/// `idle_timeout` are evicted, and at most `max_sessions` exist at once.
pub struct SessionTable {
    adapters: Arc<AdapterRegistry>,
    registry: Arc<DeviceRegistry>,
    connect_timeout: Duration,
    max_sessions: usize,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionTable {
    pub fn new(
        adapters: Arc<AdapterRegistry>,
        registry: Arc<DeviceRegistry>,
        connect_timeout: Duration,
        max_sessions: usize,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            adapters,
            registry,
            connect_timeout,
            max_sessions,
            idle_timeout,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session, evicting idle ones first; fails once the table is full
    pub async fn create(&self) -> Result<Uuid, SessionError> {
        let mut sessions = self.sessions.write().await;
        self.evict_idle_locked(&mut sessions);
        if sessions.len() >= self.max_sessions {
            warn!("Session limit of {} reached", self.max_sessions);
            return Err(SessionError::LimitReached(self.max_sessions));
        }

        let id = Uuid::new_v4();
        let dispatcher = CommandDispatcher::new(
            self.adapters.clone(),
            self.registry.clone(),
            self.connect_timeout,
        );
        sessions.insert(
            id,
            SessionEntry {
                handle: Arc::new(Mutex::new(dispatcher)),
                last_seen: Instant::now(),
            },
        );
        debug!("Created session {}", id);
        Ok(id)
    }

    pub async fn get(&self, id: &Uuid) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    pub async fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            debug!("Closed session {}", id);
        }
        removed
    }

    /// Drop sessions not seen within the idle timeout; returns how many went
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle_locked(&mut sessions)
    }

    fn evict_idle_locked(&self, sessions: &mut HashMap<Uuid, SessionEntry>) -> usize {
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_seen.elapsed() < self.idle_timeout;
            if !keep {
                debug!("Session {} expired", id);
            }
            keep
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Expired {} idle session(s)", evicted);
        }
        evicted
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProtocolConfig;
    use tempfile::TempDir;

    fn table(temp: &TempDir, max_sessions: usize, idle: Duration) -> SessionTable {
        SessionTable::new(
            Arc::new(AdapterRegistry::new(&ProtocolConfig::default()).unwrap()),
            Arc::new(DeviceRegistry::new(temp.path().join("devices.json"))),
            Duration::from_millis(200),
            max_sessions,
            idle,
        )
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let temp = TempDir::new().unwrap();
        let table = table(&temp, 8, Duration::from_secs(60));

        let a = table.create().await.unwrap();
        let b = table.create().await.unwrap();
        assert_ne!(a, b);
        assert_eq!(table.len().await, 2);

        let session = table.get(&a).await.unwrap();
        let snapshot = SessionSnapshot::capture(a, &*session.lock().await);
        assert_eq!(snapshot.state, "idle");
        assert!(!snapshot.connected);

        assert!(table.remove(&a).await);
        assert!(!table.remove(&a).await);
        assert!(table.get(&a).await.is_none());
        assert!(table.get(&b).await.is_some());
    }

    #[tokio::test]
    async fn test_idle_session_is_evicted() {
        let temp = TempDir::new().unwrap();
        let table = table(&temp, 8, Duration::from_millis(100));

        let stale = table.create().await.unwrap();
        let fresh = table.create().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(table.get(&fresh).await.is_some());
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(table.evict_idle().await, 1);
        assert!(table.get(&stale).await.is_none());
        assert!(table.get(&fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_session_limit_rejects_then_recovers_after_expiry() {
        let temp = TempDir::new().unwrap();
        let table = table(&temp, 2, Duration::from_millis(100));

        table.create().await.unwrap();
        table.create().await.unwrap();
        assert!(matches!(
            table.create().await,
            Err(SessionError::LimitReached(2))
        ));
        assert_eq!(table.len().await, 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(table.create().await.is_ok());
        assert_eq!(table.len().await, 1);
    }
}
