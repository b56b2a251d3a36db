//! XML helpers for device descriptors, device-info and app listings

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::RemoteError;
use crate::models::AppInfo;

/// Collect the text of every direct child of the first `<parent>` element.
///
/// Empty children map to an empty string; when a child name repeats the
/// first value wins. Nested grandchildren are ignored.
pub fn flat_fields(xml: &str, parent: &str) -> Result<Map<String, Value>, RemoteError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut fields = Map::new();
    let mut depth = 0usize;
    let mut parent_depth: Option<usize> = None;
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                match parent_depth {
                    None if name == parent => parent_depth = Some(depth),
                    Some(d) if depth == d + 1 => current = Some((name, String::new())),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                match parent_depth {
                    None if name == parent => return Ok(fields),
                    Some(d) if depth == d => {
                        fields.entry(name).or_insert(Value::String(String::new()));
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if at_field_level(parent_depth, depth) => {
                if let Some((_, text)) = current.as_mut() {
                    let value = e
                        .unescape()
                        .map_err(|e| RemoteError::Protocol(format!("Bad XML text: {}", e)))?;
                    text.push_str(&value);
                }
            }
            Ok(Event::CData(e)) if at_field_level(parent_depth, depth) => {
                if let Some((_, text)) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                if let Some(d) = parent_depth {
                    if depth == d + 1 {
                        if let Some((name, text)) = current.take() {
                            fields.entry(name).or_insert(Value::String(text));
                        }
                    } else if depth == d {
                        return Ok(fields);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(RemoteError::Protocol(format!("Error parsing XML: {}", e))),
            _ => (),
        }
        buf.clear();
    }

    if parent_depth.is_some() {
        Ok(fields)
    } else {
        Err(RemoteError::Protocol(format!(
            "Missing <{}> element in device response",
            parent
        )))
    }
}

fn at_field_level(parent_depth: Option<usize>, depth: usize) -> bool {
    parent_depth.is_some_and(|d| depth == d + 1)
}

#[derive(Debug, Deserialize)]
struct AppsDocument {
    #[serde(rename = "app", default)]
    apps: Vec<AppElement>,
}

#[derive(Debug, Deserialize)]
struct AppElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type", default)]
    kind: Option<String>,
    #[serde(rename = "@version", default)]
    version: Option<String>,
    #[serde(rename = "$text", default)]
    name: String,
}

/// Parse a Roku `/query/apps` document.
///
/// A single `<app>` and a sequence of them both come back as a list.
pub fn parse_apps(xml: &str) -> Result<Vec<AppInfo>, RemoteError> {
    let document: AppsDocument = quick_xml::de::from_str(xml)
        .map_err(|e| RemoteError::Protocol(format!("Failed to parse app list: {}", e)))?;

    Ok(document
        .apps
        .into_iter()
        .map(|app| AppInfo {
            id: app.id,
            name: app.name.trim().to_string(),
            kind: app.kind,
            version: app.version,
        })
        .collect())
}

/// Descriptor fields used for a discovered device
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceDescription {
    pub friendly_name: Option<String>,
    pub model_name: Option<String>,
    pub serial_number: Option<String>,
}

/// Parse a UPnP device descriptor (the document behind an SSDP `LOCATION`)
pub fn parse_device_description(xml: &str) -> Result<DeviceDescription, RemoteError> {
    let fields = flat_fields(xml, "device")?;
    let get = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(DeviceDescription {
        friendly_name: get("friendlyName"),
        model_name: get("modelName"),
        serial_number: get("serialNumber"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<device-info>
    <udn>29380007-0800-1025-80a4-d83154332d7e</udn>
    <serial-number>X00400ABCDEF</serial-number>
    <model-name>Roku Ultra</model-name>
    <friendly-device-name>Living Room &amp; Den</friendly-device-name>
    <user-device-location></user-device-location>
    <supports-find-remote/>
</device-info>"#;

    #[test]
    fn test_flat_fields_reads_device_info() {
        let fields = flat_fields(DEVICE_INFO, "device-info").unwrap();
        assert_eq!(fields["model-name"], "Roku Ultra");
        assert_eq!(fields["friendly-device-name"], "Living Room & Den");
        assert_eq!(fields["serial-number"], "X00400ABCDEF");
        assert_eq!(fields["user-device-location"], "");
        assert_eq!(fields["supports-find-remote"], "");
    }

    #[test]
    fn test_flat_fields_requires_parent() {
        let err = flat_fields("<other><a>1</a></other>", "device-info").unwrap_err();
        assert!(matches!(err, RemoteError::Protocol(_)));
    }

    #[test]
    fn test_flat_fields_rejects_malformed_xml() {
        assert!(flat_fields("<device-info><a>1</b></device-info>", "device-info").is_err());
    }

    #[test]
    fn test_parse_apps_single_element_becomes_list() {
        let xml = r#"<apps><app id="12" type="appl" version="4.1.218">Netflix</app></apps>"#;
        let apps = parse_apps(xml).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "12");
        assert_eq!(apps[0].name, "Netflix");
        assert_eq!(apps[0].kind.as_deref(), Some("appl"));
        assert_eq!(apps[0].version.as_deref(), Some("4.1.218"));
    }

    #[test]
    fn test_parse_apps_sequence_and_empty() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<apps>
    <app id="tvinput.hdmi1" type="tvin" version="1.0.0">HDMI 1</app>
    <app id="837" type="appl" version="2.21.73">YouTube</app>
    <app id="2213" type="appl" version="1.2.3">Roku Media Player</app>
</apps>"#;
        let apps = parse_apps(xml).unwrap();
        let ids: Vec<_> = apps.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["tvinput.hdmi1", "837", "2213"]);

        assert!(parse_apps("<apps></apps>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_device_description_uses_root_device() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" ?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
    <specVersion><major>1</major><minor>0</minor></specVersion>
    <device>
        <deviceType>urn:roku-com:device:player:1-0</deviceType>
        <friendlyName>Bedroom Roku</friendlyName>
        <manufacturer>Roku</manufacturer>
        <modelName>Roku Express</modelName>
        <serialNumber>YH00AB123456</serialNumber>
        <serviceList><service><serviceType>urn:roku-com:service:ecp:1</serviceType></service></serviceList>
    </device>
</root>"#;
        let description = parse_device_description(xml).unwrap();
        assert_eq!(description.friendly_name.as_deref(), Some("Bedroom Roku"));
        assert_eq!(description.model_name.as_deref(), Some("Roku Express"));
        assert_eq!(description.serial_number.as_deref(), Some("YH00AB123456"));
    }

    #[test]
    fn test_parse_device_description_missing_fields() {
        let description =
            parse_device_description("<root><device><friendlyName> </friendlyName></device></root>")
                .unwrap();
        assert_eq!(description, DeviceDescription::default());
    }
}
