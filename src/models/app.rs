//! Installed application models

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// An application installed on a TV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Raw icon bytes with the content type the device reported
#[derive(Debug, Clone)]
pub struct AppIcon {
    pub content_type: String,
    pub data: Bytes,
}

/// Find the first app whose name contains `query`, ignoring case
pub fn find_app_by_name<'a>(apps: &'a [AppInfo], query: &str) -> Option<&'a AppInfo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    apps.iter()
        .find(|app| app.name.to_lowercase().contains(&needle))
}
