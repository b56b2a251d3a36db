//! Abstract remote actions and the vendors they are translated for

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TV vendor protocol family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Roku External Control Protocol over HTTP (port 8060)
    #[default]
    Roku,
    /// Samsung remote control channel over WebSocket (port 8001)
    Samsung,
    /// Google TV / Android TV remote protocol (certificate pairing required)
    #[serde(rename = "google", alias = "googletv")]
    GoogleTv,
}

impl Vendor {
    pub const ALL: [Vendor; 3] = [Vendor::Roku, Vendor::Samsung, Vendor::GoogleTv];

    /// Stable lowercase identifier used in URLs and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Roku => "roku",
            Vendor::Samsung => "samsung",
            Vendor::GoogleTv => "google",
        }
    }

    /// Human-readable vendor name
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Roku => "Roku",
            Vendor::Samsung => "Samsung",
            Vendor::GoogleTv => "Google TV",
        }
    }

    /// Name given to a device of this vendor when the device reports none
    pub fn fallback_device_name(&self) -> &'static str {
        match self {
            Vendor::Roku => "Roku Device",
            Vendor::Samsung => "Samsung TV",
            Vendor::GoogleTv => "Google TV",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roku" => Ok(Vendor::Roku),
            "samsung" => Ok(Vendor::Samsung),
            "google" | "googletv" | "google-tv" | "androidtv" => Ok(Vendor::GoogleTv),
            other => Err(format!("Unknown vendor: {}", other)),
        }
    }
}

/// Vendor-agnostic remote control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteAction {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Home,
    Play,
    Rev,
    Fwd,
    VolumeUp,
    VolumeDown,
    VolumeMute,
    Power,
    Info,
    Search,
    InstantReplay,
}

impl RemoteAction {
    pub const ALL: [RemoteAction; 17] = [
        RemoteAction::Up,
        RemoteAction::Down,
        RemoteAction::Left,
        RemoteAction::Right,
        RemoteAction::Select,
        RemoteAction::Back,
        RemoteAction::Home,
        RemoteAction::Play,
        RemoteAction::Rev,
        RemoteAction::Fwd,
        RemoteAction::VolumeUp,
        RemoteAction::VolumeDown,
        RemoteAction::VolumeMute,
        RemoteAction::Power,
        RemoteAction::Info,
        RemoteAction::Search,
        RemoteAction::InstantReplay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteAction::Up => "Up",
            RemoteAction::Down => "Down",
            RemoteAction::Left => "Left",
            RemoteAction::Right => "Right",
            RemoteAction::Select => "Select",
            RemoteAction::Back => "Back",
            RemoteAction::Home => "Home",
            RemoteAction::Play => "Play",
            RemoteAction::Rev => "Rev",
            RemoteAction::Fwd => "Fwd",
            RemoteAction::VolumeUp => "VolumeUp",
            RemoteAction::VolumeDown => "VolumeDown",
            RemoteAction::VolumeMute => "VolumeMute",
            RemoteAction::Power => "Power",
            RemoteAction::Info => "Info",
            RemoteAction::Search => "Search",
            RemoteAction::InstantReplay => "InstantReplay",
        }
    }
}

impl fmt::Display for RemoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemoteAction {
    type Err = String;

    /// Action names are matched case-insensitively ("volumeup" == "VolumeUp")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RemoteAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown remote action: {}", s))
    }
}

/// How a key is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyEvent {
    /// Press and release
    #[default]
    Press,
    /// Start holding
    Down,
    /// Stop holding
    Up,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip_through_from_str() {
        for action in RemoteAction::ALL {
            assert_eq!(action.as_str().parse::<RemoteAction>(), Ok(action));
        }
    }

    #[test]
    fn test_action_parse_is_case_insensitive() {
        assert_eq!("volumemute".parse::<RemoteAction>(), Ok(RemoteAction::VolumeMute));
        assert_eq!("SELECT".parse::<RemoteAction>(), Ok(RemoteAction::Select));
        assert!("Lit_a".parse::<RemoteAction>().is_err());
    }

    #[test]
    fn test_vendor_parse_aliases() {
        assert_eq!("Roku".parse::<Vendor>(), Ok(Vendor::Roku));
        assert_eq!("google-tv".parse::<Vendor>(), Ok(Vendor::GoogleTv));
        assert!("lg".parse::<Vendor>().is_err());
    }

    #[test]
    fn test_vendor_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Vendor::GoogleTv).unwrap(), "\"google\"");
        let vendor: Vendor = serde_json::from_str("\"samsung\"").unwrap();
        assert_eq!(vendor, Vendor::Samsung);
    }
}
