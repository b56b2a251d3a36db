//! Roku ECP adapter tests against a mock HTTP device

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tvremote::errors::RemoteError;
use tvremote::models::{KeyEvent, RemoteAction, Target};
use tvremote::protocols::{AdapterRegistry, RemoteAdapter, VendorKeyMap};
use tvremote::Vendor;

use test_fixtures::*;

fn local_target() -> Target {
    Target::new("127.0.0.1".parse().unwrap())
}

#[tokio::test]
async fn test_every_action_sends_exactly_one_keypress() {
    let mut server = mockito::Server::new_async().await;
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();
    let roku = adapters.adapter(Vendor::Roku);

    for (action, token) in VendorKeyMap::for_vendor(Vendor::Roku).iter() {
        let mock = server
            .mock("POST", format!("/keypress/{}", token).as_str())
            .match_header("content-length", "0")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let outcome = roku
            .send_key(&local_target(), action, KeyEvent::Press)
            .await
            .unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.wire, format!("/keypress/{}", token));
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_hold_uses_keydown_and_keyup() {
    let mut server = mockito::Server::new_async().await;
    let down = server.mock("POST", "/keydown/Fwd").expect(1).create_async().await;
    let up = server.mock("POST", "/keyup/Fwd").expect(1).create_async().await;
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();
    let roku = adapters.adapter(Vendor::Roku);

    roku.send_key(&local_target(), RemoteAction::Fwd, KeyEvent::Down).await.unwrap();
    roku.send_key(&local_target(), RemoteAction::Fwd, KeyEvent::Up).await.unwrap();

    down.assert_async().await;
    up.assert_async().await;
}

#[tokio::test]
async fn test_non_2xx_is_logged_but_still_succeeds() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/keypress/Home")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();

    let outcome = adapters
        .adapter(Vendor::Roku)
        .send_key(&local_target(), RemoteAction::Home, KeyEvent::Press)
        .await
        .unwrap();
    assert!(!outcome.accepted);
    assert_eq!(outcome.status, Some(503));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_text_input_is_spaced_per_character() {
    let mut server = mockito::Server::new_async().await;
    let hits: Arc<Mutex<Vec<(String, Instant)>>> = Arc::default();

    let mut mocks = Vec::new();
    for path in ["/keypress/Lit_H", "/keypress/Lit_i", "/keypress/Lit_%21"] {
        let hits = hits.clone();
        let mock = server
            .mock("POST", path)
            .match_header("content-length", "0")
            .with_body_from_request(move |request| {
                hits.lock()
                    .unwrap()
                    .push((request.path().to_string(), Instant::now()));
                Vec::new()
            })
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();

    let outcomes = adapters
        .adapter(Vendor::Roku)
        .input_text(&local_target(), "Hi!")
        .await
        .unwrap();

    let wires: Vec<_> = outcomes.iter().map(|o| o.wire.as_str()).collect();
    assert_eq!(wires, vec!["/keypress/Lit_H", "/keypress/Lit_i", "/keypress/Lit_%21"]);

    let hits = hits.lock().unwrap().clone();
    let order: Vec<_> = hits.iter().map(|(path, _)| path.as_str()).collect();
    assert_eq!(order, wires);
    for pair in hits.windows(2) {
        let gap = pair[1].1.duration_since(pair[0].1);
        assert!(
            gap >= Duration::from_millis(50),
            "{} followed {} after only {:?}",
            pair[1].0,
            pair[0].0,
            gap
        );
    }
    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_launch_and_search_paths() {
    let mut server = mockito::Server::new_async().await;
    let launch = server.mock("POST", "/launch/12").match_header("content-length", "0").expect(1).create_async().await;
    let search = server
        .mock("POST", "/search/browse")
        .match_query(mockito::Matcher::UrlEncoded("keyword".into(), "stranger things".into()))
        .expect(1)
        .create_async()
        .await;
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();
    let roku = adapters.adapter(Vendor::Roku);

    roku.launch_app(&local_target(), "12").await.unwrap();
    roku.search(&local_target(), "stranger things").await.unwrap();

    launch.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn test_queries_parse_device_documents() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/query/device-info")
        .with_header("content-type", "text/xml")
        .with_body(ROKU_DEVICE_INFO)
        .create_async()
        .await;
    server
        .mock("GET", "/query/apps")
        .with_body(ROKU_APPS)
        .create_async()
        .await;
    server
        .mock("GET", "/query/icon/837")
        .with_header("content-type", "image/jpeg")
        .with_body([0xffu8, 0xd8, 0xff, 0xe0])
        .create_async()
        .await;
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();
    let roku = adapters.adapter(Vendor::Roku);

    let info = roku.device_info(&local_target()).await.unwrap();
    assert_eq!(info.name(), "Living Room Roku");
    assert_eq!(info.model(), "Roku Ultra");
    assert_eq!(info.serial().as_deref(), Some("X00400ABCDEF"));

    let apps = roku.list_apps(&local_target()).await.unwrap();
    assert_eq!(apps.len(), 3);
    assert_eq!(apps[1].name, "Netflix");

    let icon = roku.app_icon(&local_target(), "837").await.unwrap();
    assert_eq!(icon.content_type, "image/jpeg");
    assert_eq!(&icon.data[..], &[0xff, 0xd8, 0xff, 0xe0]);
}

#[tokio::test]
async fn test_unreachable_device_carries_hint() {
    let adapters = AdapterRegistry::new(&protocol_config(closed_port())).unwrap();

    let err = adapters
        .adapter(Vendor::Roku)
        .send_key(&local_target(), RemoteAction::Up, KeyEvent::Press)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::RemoteUnreachable { .. }));
    assert!(err.hint().unwrap().contains("Control by mobile apps"));
}

#[tokio::test]
async fn test_failed_query_is_unreachable() {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/query/apps").with_status(403).create_async().await;
    let adapters = AdapterRegistry::new(&protocol_config(port_of(&server.host_with_port()))).unwrap();

    let err = adapters
        .adapter(Vendor::Roku)
        .list_apps(&local_target())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 502);
}
