//! Samsung Tizen remote adapter
//!
//! Keys travel as JSON frames over a short-lived WebSocket to the TV's
//! `samsung.remote.control` channel. Every command opens its own socket,
//! sends one frame, waits a short grace period and closes again.

use async_trait::async_trait;
use futures_util::SinkExt;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{CommandOutcome, RemoteAdapter};
use crate::config::ProtocolConfig;
use crate::errors::{RemoteError, SAMSUNG_REMOTE_HINT};
use crate::models::{DeviceInfo, KeyEvent, RemoteAction, Target, Vendor};

const REMOTE_CHANNEL: &str = "/api/v2/channels/samsung.remote.control";

#[derive(Debug, Serialize)]
struct RemoteFrame<'a> {
    method: &'static str,
    params: RemoteParams<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteParams<'a> {
    cmd: &'static str,
    data_of_cmd: &'a str,
    option: &'static str,
    type_of_remote: &'static str,
}

/// Serialize the `ms.remote.control` frame for one key token
pub fn key_frame(token: &str, event: KeyEvent) -> Result<String, RemoteError> {
    let cmd = match event {
        KeyEvent::Press => "Click",
        KeyEvent::Down => "Press",
        KeyEvent::Up => "Release",
    };
    let frame = RemoteFrame {
        method: "ms.remote.control",
        params: RemoteParams {
            cmd,
            data_of_cmd: token,
            option: "false",
            type_of_remote: "SendRemoteKey",
        },
    };
    serde_json::to_string(&frame).map_err(|e| RemoteError::Protocol(e.to_string()))
}

pub struct SamsungAdapter {
    http: reqwest::Client,
    port: u16,
    connect_timeout: Duration,
    close_grace: Duration,
}

impl SamsungAdapter {
    pub fn new(http: reqwest::Client, config: &ProtocolConfig) -> Self {
        Self {
            http,
            port: config.samsung_port,
            connect_timeout: config.connect_timeout(),
            close_grace: config.samsung_close_grace(),
        }
    }

    fn channel_url(&self, target: &Target) -> String {
        match &target.token {
            Some(token) => format!(
                "ws://{}:{}{}?token={}",
                target.ip,
                self.port,
                REMOTE_CHANNEL,
                urlencoding::encode(token)
            ),
            None => format!("ws://{}:{}{}", target.ip, self.port, REMOTE_CHANNEL),
        }
    }

    fn unreachable(&self, target: &Target, reason: impl ToString) -> RemoteError {
        RemoteError::unreachable(target.ip, reason, Some(SAMSUNG_REMOTE_HINT))
    }

    /// Open the channel, send a single frame, then close after the grace period
    async fn send_frame(&self, target: &Target, frame: String) -> Result<(), RemoteError> {
        let url = self.channel_url(target);
        debug!("Samsung connect {}", url);

        let (mut socket, _) = tokio::time::timeout(self.connect_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| self.unreachable(target, "connection timed out"))?
            .map_err(|e| self.unreachable(target, e))?;

        let sent = socket.send(Message::Text(frame)).await;
        tokio::time::sleep(self.close_grace).await;
        if let Err(e) = socket.close(None).await {
            debug!("Samsung close for {} failed: {}", target.ip, e);
        }

        sent.map_err(|e| self.unreachable(target, e))
    }
}

#[async_trait]
impl RemoteAdapter for SamsungAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Samsung
    }

    async fn send_key(
        &self,
        target: &Target,
        action: RemoteAction,
        event: KeyEvent,
    ) -> Result<CommandOutcome, RemoteError> {
        let token = self.key_map().token(action)?;
        let frame = key_frame(token, event)?;
        self.send_frame(target, frame).await?;
        Ok(CommandOutcome::sent(token))
    }

    /// REST descriptor on the same port as the remote channel
    async fn device_info(&self, target: &Target) -> Result<DeviceInfo, RemoteError> {
        let url = format!("http://{}:{}/api/v2/", target.ip, self.port);
        debug!("Samsung GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable(target, e))?;
        if !response.status().is_success() {
            return Err(self.unreachable(target, format!("HTTP {}", response.status())));
        }

        let properties: Map<String, Value> = response
            .json()
            .await
            .map_err(|e| RemoteError::Protocol(format!("Bad Samsung descriptor: {}", e)))?;
        Ok(DeviceInfo::new(Vendor::Samsung, properties))
    }
}
