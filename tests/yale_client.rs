// Tests for `YaleClient` against a mocked Yale Sync API using wiremock.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yale_sync_bridge::{
    AlarmService, BridgeConfig, BridgeError, DeviceState, RemoteAlarmState, RemoteLockCommand,
    YaleClient,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config(server: &MockServer) -> BridgeConfig {
    BridgeConfig::builder()
        .api_url(format!("{}/yapi", server.uri()))
        .username("user@example.com")
        .password("secret")
        .client_token("Y2xpZW50")
        .door_lock_pincode(Some("123456".to_string()))
        .build()
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/yapi/o/token/"))
        .and(header("authorization", "Basic Y2xpZW50"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "refresh_token": "def456",
            "expires_in": 36000,
        })))
        .mount(server)
        .await;
}

async fn mount_panel(server: &MockServer, mac: &str, mode: &str) {
    Mock::given(method("GET"))
        .and(path("/yapi/api/panel/info/"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "mac": mac, "name": "Home" }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/yapi/api/panel/mode/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "mode": mode }]
        })))
        .mount(server)
        .await;
}

async fn mount_devices(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/yapi/api/panel/device_status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "device_id": "RF:1", "name": "Hallway", "type": "device_type.pir",
                  "status1": "device_status.pir_triggered" },
                { "device_id": "RF:2", "name": "Front Door", "type": "device_type.door_contact",
                  "status1": "device_status.dc_open" },
                { "device_id": 1234, "name": "Back Door", "type": "device_type.door_lock",
                  "status1": "device_status.lock, device_status.dc_close" },
                { "device_id": "RF:9", "name": "Keypad", "type": "device_type.keypad",
                  "status1": "" },
            ]
        })))
        .mount(server)
        .await;
}

async fn setup() -> (MockServer, YaleClient) {
    let server = MockServer::start().await;
    mount_token(&server).await;
    let client = YaleClient::new(&config(&server)).unwrap();
    client.authenticate("user@example.com", "secret").await.unwrap();
    (server, client)
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_authenticate_stores_token() {
    let (_server, client) = setup().await;
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/yapi/o/token/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let client = YaleClient::new(&config(&server)).unwrap();
    let err = client
        .authenticate("user@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Authentication { .. }));
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn test_unauthorized_drops_session() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/yapi/api/panel/info/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let err = client.refresh_session_state().await.unwrap_err();
    assert!(matches!(err, BridgeError::Api { status: 401, .. }));
    assert!(!client.is_authenticated().await);
    assert!(matches!(
        client.query_panel_state().await,
        Err(BridgeError::NotAuthenticated)
    ));
}

// ── Panel ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_panel() {
    let (server, client) = setup().await;
    mount_panel(&server, "00:11:22:33:44:55", "arm").await;

    client.refresh_session_state().await.unwrap();
    let panel = client.fetch_panel().await.unwrap().unwrap();
    assert_eq!(panel.identifier, "00:11:22:33:44:55");
    assert_eq!(panel.name, "Home");
    assert_eq!(panel.state, DeviceState::Alarm(RemoteAlarmState::Armed));
}

#[tokio::test]
async fn test_account_without_panel() {
    let (server, client) = setup().await;
    mount_panel(&server, "", "disarm").await;

    assert!(client.fetch_panel().await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_panel_mode() {
    let (server, client) = setup().await;
    mount_panel(&server, "00:11:22:33:44:55", "partial").await;

    let err = client.query_panel_state().await.unwrap_err();
    assert!(matches!(err, BridgeError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_command_panel_state() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/yapi/api/panel/mode/"))
        .and(header("authorization", "Bearer abc123"))
        .and(body_string_contains("area=1"))
        .and(body_string_contains("mode=home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": true })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .command_panel_state(RemoteAlarmState::Home)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_command_panel_state_server_error() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/yapi/api/panel/mode/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client
        .command_panel_state(RemoteAlarmState::Armed)
        .await
        .unwrap_err();
    match err {
        BridgeError::Api { status, details, .. } => {
            assert_eq!(status, 500);
            assert_eq!(details, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // A server error keeps the session
    assert!(client.is_authenticated().await);
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_groups() {
    let (server, client) = setup().await;
    mount_devices(&server).await;

    let motion = client.fetch_motion_sensors().await.unwrap();
    assert_eq!(motion.len(), 1);
    assert_eq!(motion["RF:1"].name, "Hallway");
    assert_eq!(motion["RF:1"].state, DeviceState::Status(1));

    let contacts = client.fetch_contact_sensors().await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts["RF:2"].state, DeviceState::Status(0));

    let locks = client.fetch_door_locks().await.unwrap();
    assert_eq!(locks.len(), 1);
    assert_eq!(locks["1234"].state, DeviceState::Status(0));

    let codes = client.query_door_locks().await.unwrap();
    assert_eq!(codes.get("1234"), Some(&0));
}

#[tokio::test]
async fn test_command_door_lock_reports_new_status() {
    let (server, client) = setup().await;
    mount_devices(&server).await;
    Mock::given(method("POST"))
        .and(path("/yapi/api/panel/device_control/"))
        .and(body_string_contains("device_sid=1234"))
        .and(body_string_contains("request_value=1"))
        .and(body_string_contains("pincode=123456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": true })))
        .expect(1)
        .mount(&server)
        .await;

    let code = client
        .command_door_lock("1234", RemoteLockCommand::Locked)
        .await
        .unwrap();
    assert_eq!(code, 0);
}

#[tokio::test]
async fn test_command_unknown_door_lock() {
    let (server, client) = setup().await;
    mount_devices(&server).await;
    Mock::given(method("POST"))
        .and(path("/yapi/api/panel/device_control/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": true })))
        .mount(&server)
        .await;

    let err = client
        .command_door_lock("9999", RemoteLockCommand::Unlocked)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::UnknownDevice { identifier } if identifier == "9999"));
}
