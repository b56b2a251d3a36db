//! Roku External Control Protocol (ECP) adapter
//!
//! ECP is plain HTTP on port 8060: commands are zero-length POSTs, queries
//! are GETs returning XML. Non-2xx answers to commands are logged and still
//! reported as sent, since the firmware decides the real effect.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::time::Duration;

use super::{CommandOutcome, RemoteAdapter, xml};
use crate::config::ProtocolConfig;
use crate::errors::{RemoteError, ROKU_REMOTE_HINT};
use crate::models::{AppIcon, AppInfo, DeviceInfo, KeyEvent, RemoteAction, Target, Vendor};

pub struct RokuAdapter {
    http: reqwest::Client,
    port: u16,
    text_delay: Duration,
}

impl RokuAdapter {
    pub fn new(http: reqwest::Client, config: &ProtocolConfig) -> Self {
        Self {
            http,
            port: config.roku_port,
            text_delay: config.text_input_delay(),
        }
    }

    fn url(&self, target: &Target, path: &str) -> String {
        format!("http://{}:{}{}", target.ip, self.port, path)
    }

    fn transport_error(&self, target: &Target, err: reqwest::Error) -> RemoteError {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        RemoteError::unreachable(target.ip, reason, Some(ROKU_REMOTE_HINT))
    }

    /// Zero-length POST; a non-2xx status is logged, never raised
    async fn post_command(&self, target: &Target, path: &str) -> Result<CommandOutcome, RemoteError> {
        let url = self.url(target, path);
        debug!("ECP POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(CONTENT_LENGTH, "0")
            .send()
            .await
            .map_err(|e| self.transport_error(target, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Roku at {} answered {} for {}", target.ip, status, path);
        }

        Ok(CommandOutcome {
            wire: path.to_string(),
            status: Some(status.as_u16()),
            accepted: status.is_success(),
        })
    }

    /// GET a query endpoint; queries must succeed to be useful
    async fn query(&self, target: &Target, path: &str) -> Result<reqwest::Response, RemoteError> {
        let url = self.url(target, path);
        debug!("ECP GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(target, e))?;

        if !response.status().is_success() {
            return Err(RemoteError::unreachable(
                target.ip,
                format!("{} answered HTTP {}", path, response.status()),
                Some(ROKU_REMOTE_HINT),
            ));
        }
        Ok(response)
    }

    async fn query_text(&self, target: &Target, path: &str) -> Result<String, RemoteError> {
        self.query(target, path)
            .await?
            .text()
            .await
            .map_err(|e| self.transport_error(target, e))
    }
}

fn key_path(event: KeyEvent, token: &str) -> String {
    let verb = match event {
        KeyEvent::Press => "keypress",
        KeyEvent::Down => "keydown",
        KeyEvent::Up => "keyup",
    };
    format!("/{}/{}", verb, token)
}

/// `/keypress/Lit_<c>` with the character percent-encoded
pub fn literal_path(ch: char) -> String {
    let mut buf = [0u8; 4];
    format!("/keypress/Lit_{}", urlencoding::encode(ch.encode_utf8(&mut buf)))
}

#[async_trait]
impl RemoteAdapter for RokuAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Roku
    }

    async fn send_key(
        &self,
        target: &Target,
        action: RemoteAction,
        event: KeyEvent,
    ) -> Result<CommandOutcome, RemoteError> {
        let token = self.key_map().token(action)?;
        self.post_command(target, &key_path(event, token)).await
    }

    async fn device_info(&self, target: &Target) -> Result<DeviceInfo, RemoteError> {
        let body = self.query_text(target, "/query/device-info").await?;
        let fields = xml::flat_fields(&body, "device-info")?;
        Ok(DeviceInfo::new(Vendor::Roku, fields))
    }

    async fn launch_app(&self, target: &Target, app_id: &str) -> Result<CommandOutcome, RemoteError> {
        let path = format!("/launch/{}", urlencoding::encode(app_id));
        self.post_command(target, &path).await
    }

    async fn search(&self, target: &Target, keyword: &str) -> Result<CommandOutcome, RemoteError> {
        let path = format!("/search/browse?keyword={}", urlencoding::encode(keyword));
        self.post_command(target, &path).await
    }

    /// One `Lit_` keypress per character, spaced by the configured delay
    async fn input_text(&self, target: &Target, text: &str) -> Result<Vec<CommandOutcome>, RemoteError> {
        let mut outcomes = Vec::with_capacity(text.chars().count());
        for (index, ch) in text.chars().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.text_delay).await;
            }
            outcomes.push(self.post_command(target, &literal_path(ch)).await?);
        }
        Ok(outcomes)
    }

    async fn list_apps(&self, target: &Target) -> Result<Vec<AppInfo>, RemoteError> {
        let body = self.query_text(target, "/query/apps").await?;
        xml::parse_apps(&body)
    }

    async fn app_icon(&self, target: &Target, app_id: &str) -> Result<AppIcon, RemoteError> {
        let path = format!("/query/icon/{}", urlencoding::encode(app_id));
        let response = self.query(target, &path).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let data = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(target, e))?;

        Ok(AppIcon { content_type, data })
    }
}
