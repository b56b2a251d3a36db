//! Per-vendor translation of abstract actions into wire tokens

use crate::errors::RemoteError;
use crate::models::{RemoteAction, Vendor};

/// Fixed mapping from [`RemoteAction`] to a vendor's key token
#[derive(Debug)]
pub struct VendorKeyMap {
    vendor: Vendor,
    entries: &'static [(RemoteAction, &'static str)],
}

static ROKU_KEYS: VendorKeyMap = VendorKeyMap {
    vendor: Vendor::Roku,
    entries: &[
        (RemoteAction::Up, "Up"),
        (RemoteAction::Down, "Down"),
        (RemoteAction::Left, "Left"),
        (RemoteAction::Right, "Right"),
        (RemoteAction::Select, "Select"),
        (RemoteAction::Back, "Back"),
        (RemoteAction::Home, "Home"),
        (RemoteAction::Play, "Play"),
        (RemoteAction::Rev, "Rev"),
        (RemoteAction::Fwd, "Fwd"),
        (RemoteAction::VolumeUp, "VolumeUp"),
        (RemoteAction::VolumeDown, "VolumeDown"),
        (RemoteAction::VolumeMute, "VolumeMute"),
        (RemoteAction::Power, "Power"),
        (RemoteAction::Info, "Info"),
        (RemoteAction::Search, "Search"),
        (RemoteAction::InstantReplay, "InstantReplay"),
    ],
};

static SAMSUNG_KEYS: VendorKeyMap = VendorKeyMap {
    vendor: Vendor::Samsung,
    entries: &[
        (RemoteAction::Up, "KEY_UP"),
        (RemoteAction::Down, "KEY_DOWN"),
        (RemoteAction::Left, "KEY_LEFT"),
        (RemoteAction::Right, "KEY_RIGHT"),
        (RemoteAction::Select, "KEY_ENTER"),
        (RemoteAction::Back, "KEY_RETURN"),
        (RemoteAction::Home, "KEY_HOME"),
        (RemoteAction::Play, "KEY_PLAY"),
        (RemoteAction::Rev, "KEY_REWIND"),
        (RemoteAction::Fwd, "KEY_FF"),
        (RemoteAction::VolumeUp, "KEY_VOLUP"),
        (RemoteAction::VolumeDown, "KEY_VOLDOWN"),
        (RemoteAction::VolumeMute, "KEY_MUTE"),
        (RemoteAction::Power, "KEY_POWER"),
        (RemoteAction::Info, "KEY_INFO"),
        (RemoteAction::Search, "KEY_SEARCH"),
        (RemoteAction::InstantReplay, "KEY_REWIND"),
    ],
};

static GOOGLE_TV_KEYS: VendorKeyMap = VendorKeyMap {
    vendor: Vendor::GoogleTv,
    entries: &[
        (RemoteAction::Up, "DPAD_UP"),
        (RemoteAction::Down, "DPAD_DOWN"),
        (RemoteAction::Left, "DPAD_LEFT"),
        (RemoteAction::Right, "DPAD_RIGHT"),
        (RemoteAction::Select, "DPAD_CENTER"),
        (RemoteAction::Back, "BACK"),
        (RemoteAction::Home, "HOME"),
        (RemoteAction::Play, "MEDIA_PLAY_PAUSE"),
        (RemoteAction::Rev, "MEDIA_REWIND"),
        (RemoteAction::Fwd, "MEDIA_FAST_FORWARD"),
        (RemoteAction::VolumeUp, "VOLUME_UP"),
        (RemoteAction::VolumeDown, "VOLUME_DOWN"),
        (RemoteAction::VolumeMute, "VOLUME_MUTE"),
        (RemoteAction::Power, "POWER"),
        (RemoteAction::Info, "INFO"),
        (RemoteAction::Search, "SEARCH"),
        (RemoteAction::InstantReplay, "MEDIA_PREVIOUS"),
    ],
};

impl VendorKeyMap {
    pub fn for_vendor(vendor: Vendor) -> &'static VendorKeyMap {
        match vendor {
            Vendor::Roku => &ROKU_KEYS,
            Vendor::Samsung => &SAMSUNG_KEYS,
            Vendor::GoogleTv => &GOOGLE_TV_KEYS,
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Wire token for `action`, or `UnsupportedAction`
    pub fn token(&self, action: RemoteAction) -> Result<&'static str, RemoteError> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == action)
            .map(|(_, token)| *token)
            .ok_or_else(|| RemoteError::unsupported(self.vendor, action))
    }

    /// Resolve a key name from a request path.
    ///
    /// Accepts an action name ("Up") or one of this vendor's own tokens
    /// ("KEY_UP"); anything else is `UnsupportedAction`.
    pub fn resolve(&self, key: &str) -> Result<RemoteAction, RemoteError> {
        if let Ok(action) = key.parse::<RemoteAction>() {
            self.token(action)?;
            return Ok(action);
        }

        self.entries
            .iter()
            .find(|(_, token)| *token == key)
            .map(|(action, _)| *action)
            .ok_or_else(|| RemoteError::UnsupportedAction {
                vendor: self.vendor,
                action: key.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (RemoteAction, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}
