//! API request and response bodies

use serde::{Deserialize, Serialize};

use super::action::Vendor;
use super::app::AppInfo;
use super::device::Device;

/// `?ip=&token=` query accepted by every device-facing route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetQuery {
    pub ip: Option<String>,
    pub token: Option<String>,
}

/// `GET /api/discover` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverQuery {
    pub strategy: Option<String>,
    pub base: Option<String>,
}

/// Body of `POST /api/saved-devices`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveDeviceRequest {
    pub ip: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub vendor: Option<Vendor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameDeviceRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInputRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchByNameRequest {
    pub name: String,
}

/// Body of `POST /api/sessions/:id/connect`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectRequest {
    pub ip: Option<String>,
    #[serde(default)]
    pub vendor: Vendor,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub success: bool,
    pub device: Device,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppsResponse {
    pub apps: Vec<AppInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    pub success: bool,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Vendor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchResponse {
    pub success: bool,
    pub app_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInputResponse {
    pub success: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error body shared by every route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}
