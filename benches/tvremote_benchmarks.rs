//! Benchmarks for the parsing done on every device round trip

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tvremote::config::DiscoveryConfig;
use tvremote::discovery::ssdp::{SsdpResponse, search_request};
use tvremote::models::{AppInfo, KeyEvent, Vendor, find_app_by_name};
use tvremote::protocols::VendorKeyMap;
use tvremote::protocols::roku::literal_path;
use tvremote::protocols::samsung::key_frame;
use tvremote::protocols::xml::{flat_fields, parse_apps, parse_device_description};

const DEVICE_INFO: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<device-info>
    <udn>29380007-0800-1025-80a4-d83154332d7e</udn>
    <serial-number>X00400ABCDEF</serial-number>
    <vendor-name>Roku</vendor-name>
    <model-name>Roku Ultra</model-name>
    <model-number>4800X</model-number>
    <friendly-device-name>Living Room Roku</friendly-device-name>
    <software-version>11.5.0</software-version>
    <power-mode>PowerOn</power-mode>
    <supports-find-remote>true</supports-find-remote>
</device-info>"#;

const DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
    <specVersion><major>1</major><minor>0</minor></specVersion>
    <device>
        <deviceType>urn:roku-com:device:player:1-0</deviceType>
        <friendlyName>Bedroom Roku</friendlyName>
        <manufacturer>Roku</manufacturer>
        <modelName>Roku Express</modelName>
        <serialNumber>YH00AB123456</serialNumber>
    </device>
</root>"#;

const SSDP_REPLY: &str = "HTTP/1.1 200 OK\r\n\
Cache-Control: max-age=3600\r\n\
ST: roku:ecp\r\n\
USN: uuid:roku:ecp:YH00AB123456\r\n\
Location: http://192.168.1.20:8060/\r\n\r\n";

fn apps_document(count: usize) -> String {
    let mut xml = String::from("<apps>");
    for i in 0..count {
        xml.push_str(&format!(
            r#"<app id="{}" type="appl" version="1.0.{}">Channel {}</app>"#,
            i, i, i
        ));
    }
    xml.push_str("</apps>");
    xml
}

fn benchmark_xml_parsing(c: &mut Criterion) {
    c.bench_function("device_info_fields", |b| {
        b.iter(|| black_box(flat_fields(black_box(DEVICE_INFO), "device-info")));
    });

    c.bench_function("device_descriptor", |b| {
        b.iter(|| black_box(parse_device_description(black_box(DESCRIPTOR))));
    });

    let apps = apps_document(60);
    c.bench_function("parse_apps_60", |b| {
        b.iter(|| black_box(parse_apps(black_box(&apps))));
    });
}

fn benchmark_app_lookup(c: &mut Criterion) {
    let apps: Vec<AppInfo> = parse_apps(&apps_document(60)).unwrap();

    c.bench_function("find_app_by_name", |b| {
        b.iter(|| black_box(find_app_by_name(black_box(&apps), "channel 59")));
    });
}

fn benchmark_key_handling(c: &mut Criterion) {
    let roku = VendorKeyMap::for_vendor(Vendor::Roku);
    let samsung = VendorKeyMap::for_vendor(Vendor::Samsung);

    c.bench_function("resolve_and_map_key", |b| {
        b.iter(|| {
            let action = roku.resolve(black_box("VolumeUp")).unwrap();
            black_box(samsung.token(action))
        });
    });

    c.bench_function("literal_path", |b| {
        b.iter(|| {
            for ch in black_box("Stranger Things!").chars() {
                black_box(literal_path(ch));
            }
        });
    });

    c.bench_function("samsung_key_frame", |b| {
        b.iter(|| black_box(key_frame(black_box("KEY_HOME"), KeyEvent::Press)));
    });
}

fn benchmark_ssdp(c: &mut Criterion) {
    let config = DiscoveryConfig::default();

    c.bench_function("ssdp_search_request", |b| {
        b.iter(|| black_box(search_request(black_box(&config))));
    });

    c.bench_function("ssdp_parse_reply", |b| {
        b.iter(|| {
            let reply = SsdpResponse::parse(black_box(SSDP_REPLY));
            black_box(reply.map(|r| r.matches("roku:ecp")))
        });
    });
}

criterion_group!(
    benches,
    benchmark_xml_parsing,
    benchmark_app_lookup,
    benchmark_key_handling,
    benchmark_ssdp
);

criterion_main!(benches);
