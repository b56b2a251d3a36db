//! Google TV placeholder
//!
//! The Android TV remote protocol needs certificate pairing and a TLS
//! channel, which are not supported yet. Every operation reports
//! `NotImplemented` so callers can show the official-app hint.

use async_trait::async_trait;

use super::{CommandOutcome, RemoteAdapter};
use crate::errors::RemoteError;
use crate::models::{DeviceInfo, KeyEvent, RemoteAction, Target, Vendor};

const PAIRING_MESSAGE: &str = "Google TV control requires certificate pairing, which is not supported yet";

pub struct GoogleTvAdapter;

impl GoogleTvAdapter {
    fn pairing_required(operation: &'static str) -> RemoteError {
        RemoteError::NotImplemented {
            vendor: Vendor::GoogleTv,
            operation,
            message: PAIRING_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
impl RemoteAdapter for GoogleTvAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::GoogleTv
    }

    async fn send_key(
        &self,
        _target: &Target,
        action: RemoteAction,
        _event: KeyEvent,
    ) -> Result<CommandOutcome, RemoteError> {
        // Unknown actions still fail as unsupported before the pairing check
        self.key_map().token(action)?;
        Err(Self::pairing_required("key press"))
    }

    async fn device_info(&self, _target: &Target) -> Result<DeviceInfo, RemoteError> {
        Err(Self::pairing_required("device info"))
    }

    fn not_implemented(&self, operation: &'static str) -> RemoteError {
        Self::pairing_required(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GOOGLE_TV_HINT;

    #[tokio::test]
    async fn test_every_operation_is_not_implemented() {
        let adapter = GoogleTvAdapter;
        let target = Target::new("192.168.1.20".parse().unwrap());

        let err = adapter
            .send_key(&target, RemoteAction::Home, KeyEvent::Press)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 501);
        assert_eq!(err.hint(), Some(GOOGLE_TV_HINT));

        assert!(matches!(
            adapter.launch_app(&target, "12").await,
            Err(RemoteError::NotImplemented { .. })
        ));
        assert!(matches!(
            adapter.device_info(&target).await,
            Err(RemoteError::NotImplemented { .. })
        ));
    }
}
