// MIT License - Copyright (c) 2026 Peter Wright
// MQTT bridge

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::{Duration, interval};
use tracing::{debug, error, info, warn};

use yale_sync_bridge::constants::DEFAULT_API_URL;
use yale_sync_bridge::{
    AccessoryIdentity, BridgeConfig, BridgeEvent, CharacteristicKind, CharacteristicValue,
    HomeModePolicy, LocalHost, YaleClient, YaleSyncPlatform, derive_identity,
};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "yale2mqtt")]
#[command(about = "Bridge between a Yale Sync alarm and MQTT")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Config {
    yale: YaleToml,
    #[serde(default)]
    bridge: BridgeToml,
    mqtt: MqttToml,
}

#[derive(Debug, Deserialize)]
struct YaleToml {
    username: String,
    password: String,
    client_token: String,
    #[serde(default = "default_api_url")]
    api_url: String,
    #[serde(default = "default_area")]
    area: u8,
    #[serde(default)]
    door_lock_pincode: Option<String>,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_area() -> u8 {
    1
}
fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
struct BridgeToml {
    #[serde(default = "default_bridge_name")]
    name: String,
    /// How the panel's "home" mode is shown: "stay" or "night"
    #[serde(default = "default_home_mode")]
    home_mode: String,
    #[serde(default = "default_refresh_interval")]
    refresh_interval_secs: u64,
    #[serde(default)]
    refresh_cached_context: bool,
    #[serde(default)]
    prune_missing: bool,
    #[serde(default = "default_cache_path")]
    cache_path: String,
}

impl Default for BridgeToml {
    fn default() -> Self {
        Self {
            name: default_bridge_name(),
            home_mode: default_home_mode(),
            refresh_interval_secs: default_refresh_interval(),
            refresh_cached_context: false,
            prune_missing: false,
            cache_path: default_cache_path(),
        }
    }
}

fn default_bridge_name() -> String {
    "Yale Sync Alarm".to_string()
}
fn default_home_mode() -> String {
    "stay".to_string()
}
fn default_refresh_interval() -> u64 {
    60
}
fn default_cache_path() -> String {
    "accessories.json".to_string()
}

#[derive(Debug, Deserialize)]
struct MqttToml {
    url: String,
    #[serde(default = "default_client_id")]
    client_id: String,
    #[serde(default = "default_subscribe_topic")]
    subscribe_topic: String,
    #[serde(default = "default_publish_topic")]
    publish_topic: String,
}

fn default_client_id() -> String {
    "yale-bridge".to_string()
}
fn default_subscribe_topic() -> String {
    "yale/cmd".to_string()
}
fn default_publish_topic() -> String {
    "yale".to_string()
}

fn build_bridge_config(config: &Config) -> Result<BridgeConfig> {
    let home_mode = HomeModePolicy::from_name(&config.bridge.home_mode)
        .with_context(|| format!("Unknown home_mode: {}", config.bridge.home_mode))?;
    if config.bridge.refresh_interval_secs == 0 {
        anyhow::bail!("refresh_interval_secs must be greater than zero");
    }
    Ok(BridgeConfig::builder()
        .name(&config.bridge.name)
        .username(&config.yale.username)
        .password(&config.yale.password)
        .api_url(&config.yale.api_url)
        .client_token(&config.yale.client_token)
        .area(config.yale.area)
        .door_lock_pincode(config.yale.door_lock_pincode.clone())
        .request_timeout_secs(config.yale.request_timeout_secs)
        .home_mode(home_mode)
        .refresh_interval_secs(config.bridge.refresh_interval_secs)
        .refresh_cached_context(config.bridge.refresh_cached_context)
        .prune_missing(config.bridge.prune_missing)
        .build())
}

// ---------------------------------------------------------------------------
// MQTT JSON types
// ---------------------------------------------------------------------------

// Published messages share the flat {now, op, ...} structure

#[derive(Serialize)]
struct MqttSnapshot {
    now: u64,
    op: String,
    state: MqttSnapshotState,
}

#[derive(Serialize)]
struct MqttSnapshotState {
    accessories: Vec<MqttAccessoryState>,
}

#[derive(Serialize)]
struct MqttAccessoryState {
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    identifier: Option<String>,
    characteristics: BTreeMap<String, CharacteristicValue>,
}

// Characteristic pushes: {now, op, accessory, characteristic, value}
#[derive(Serialize)]
struct MqttCharacteristicUpdate {
    now: u64,
    op: String,
    accessory: String,
    characteristic: String,
    value: CharacteristicValue,
}

// Accessory lifecycle: {now, op, accessory} or {now, op, accessory, name, kind}
#[derive(Serialize)]
struct MqttAccessoryEvent {
    now: u64,
    op: String,
    accessory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

// CMD_ACK response
#[derive(Serialize)]
struct MqttCmdAck {
    now: u64,
    op: String,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    src: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

// Inbound command (subscribed)
#[derive(Deserialize)]
struct MqttCommand {
    op: String,
    #[serde(default)]
    #[allow(dead_code)]
    op_id: Option<String>,
    /// Accessory identity, or the remote device identifier
    #[serde(default)]
    accessory: Option<String>,
    #[serde(default)]
    characteristic: Option<String>,
    #[serde(default)]
    value: Option<CharacteristicValue>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Accept either an accessory identity or the identifier of a remote device.
fn resolve_accessory(s: &str) -> AccessoryIdentity {
    s.parse().unwrap_or_else(|_| derive_identity(s))
}

async fn publish_json(client: &AsyncClient, topic: &str, payload: &impl Serialize, retain: bool) {
    match serde_json::to_string(payload) {
        Ok(json) => {
            if let Err(e) = client.publish(topic, QoS::AtLeastOnce, retain, json).await {
                error!("Failed to publish to {topic}: {e}");
            }
        }
        Err(e) => error!("Failed to serialize MQTT payload: {e}"),
    }
}

async fn publish_accessory_event(
    client: &AsyncClient,
    topic: &str,
    op: &str,
    identity: AccessoryIdentity,
    name: Option<String>,
    kind: Option<String>,
) {
    let msg = MqttAccessoryEvent {
        now: now_epoch_ms(),
        op: op.to_string(),
        accessory: identity.to_string(),
        name,
        kind,
    };
    publish_json(client, topic, &msg, false).await;
}

async fn publish_cmd_ack(
    client: &AsyncClient,
    topic: &str,
    success: bool,
    src: Option<serde_json::Value>,
    data: Option<serde_json::Value>,
) {
    let msg = MqttCmdAck {
        now: now_epoch_ms(),
        op: "CMD_ACK".to_string(),
        success,
        src,
        data,
    };
    publish_json(client, topic, &msg, false).await;
}

async fn build_snapshot(platform: &YaleSyncPlatform) -> MqttSnapshot {
    let mut accessories = Vec::new();
    for handle in platform.accessories().await {
        let accessory = handle.snapshot().await;
        let characteristics = accessory
            .services()
            .iter()
            .flat_map(|s| s.characteristics())
            .filter_map(|c| Some((c.kind().to_string(), c.value()?.clone())))
            .collect();
        accessories.push(MqttAccessoryState {
            id: accessory.identity().to_string(),
            name: accessory.display_name().to_string(),
            kind: accessory.device_kind().map(|k| k.to_string()),
            identifier: accessory.device().map(|d| d.identifier.clone()),
            characteristics,
        });
    }

    MqttSnapshot {
        now: now_epoch_ms(),
        op: "SNAPSHOT".to_string(),
        state: MqttSnapshotState { accessories },
    }
}

async fn publish_snapshot(client: &AsyncClient, topic: &str, platform: &YaleSyncPlatform) {
    let snapshot = build_snapshot(platform).await;
    publish_json(client, topic, &snapshot, true).await;
}

// ---------------------------------------------------------------------------
// Platform event → MQTT
// ---------------------------------------------------------------------------

async fn handle_bridge_event(
    event: BridgeEvent,
    client: &AsyncClient,
    topic: &str,
    platform: &YaleSyncPlatform,
) {
    match event {
        BridgeEvent::CharacteristicUpdated {
            identity,
            characteristic,
            value,
        } => {
            debug!("{identity} {characteristic} = {value}");
            let msg = MqttCharacteristicUpdate {
                now: now_epoch_ms(),
                op: "CHARACTERISTIC_UPDATE".to_string(),
                accessory: identity.to_string(),
                characteristic: characteristic.to_string(),
                value,
            };
            publish_json(client, topic, &msg, false).await;
        }

        BridgeEvent::AccessoryRegistered {
            identity,
            name,
            kind,
        } => {
            info!("Accessory added: {name} ({kind})");
            publish_accessory_event(
                client,
                topic,
                "ACCESSORY_ADDED",
                identity,
                Some(name),
                Some(kind.to_string()),
            )
            .await;
        }

        BridgeEvent::AccessoryRestored { name, kind, .. } => {
            debug!("Accessory restored: {name} ({kind})");
        }

        BridgeEvent::AccessoryRemoved { identity } => {
            info!("Accessory removed: {identity}");
            publish_accessory_event(client, topic, "ACCESSORY_REMOVED", identity, None, None).await;
        }

        BridgeEvent::DiscoveryComplete { .. } => {
            debug!("Discovery complete, publishing snapshot");
            publish_snapshot(client, topic, platform).await;
        }
    }
}

// ---------------------------------------------------------------------------
// MQTT command handler
// ---------------------------------------------------------------------------

/// Resolve the accessory and characteristic named by a GET/SET command.
fn command_target(cmd: &MqttCommand) -> Option<(AccessoryIdentity, CharacteristicKind)> {
    let accessory = cmd.accessory.as_deref()?;
    let characteristic = CharacteristicKind::from_name(cmd.characteristic.as_deref()?)?;
    Some((resolve_accessory(accessory), characteristic))
}

async fn handle_command(
    payload_str: &str,
    cmd: MqttCommand,
    client: &AsyncClient,
    topic: &str,
    platform: &YaleSyncPlatform,
) {
    // Parse the raw payload as a JSON value for the CMD_ACK src field
    let src_json = serde_json::from_str::<serde_json::Value>(payload_str).ok();

    match cmd.op.as_str() {
        "SNAPSHOT" => {
            debug!("Command: SNAPSHOT");
            let snapshot = build_snapshot(platform).await;
            let snapshot_value = serde_json::to_value(&snapshot).ok();
            publish_json(client, topic, &snapshot, true).await;
            publish_cmd_ack(client, topic, true, src_json, snapshot_value).await;
        }

        "PING" => {
            info!("Command: PING");
            publish_cmd_ack(client, topic, true, src_json, None).await;
        }

        "REFRESH" => {
            info!("Command: REFRESH");
            match platform.refresh().await {
                Ok(report) => {
                    let data = serde_json::json!({
                        "registered": report.registered,
                        "restored": report.restored,
                        "removed": report.removed,
                    });
                    publish_cmd_ack(client, topic, true, src_json, Some(data)).await;
                }
                Err(e) => {
                    error!("REFRESH failed: {e}");
                    publish_cmd_ack(client, topic, false, src_json, None).await;
                }
            }
        }

        "GET" => {
            let Some((identity, characteristic)) = command_target(&cmd) else {
                warn!("GET: missing or unknown accessory/characteristic");
                publish_cmd_ack(client, topic, false, src_json, None).await;
                return;
            };
            info!("Command: GET {identity} {characteristic}");
            match platform.handle_get(&identity, characteristic).await {
                Ok(value) => {
                    let data = serde_json::json!({ "value": value });
                    publish_cmd_ack(client, topic, true, src_json, Some(data)).await;
                }
                Err(e) => {
                    warn!("GET {identity} {characteristic} failed: {e}");
                    publish_cmd_ack(client, topic, false, src_json, None).await;
                }
            }
        }

        "SET" => {
            let (Some((identity, characteristic)), Some(value)) =
                (command_target(&cmd), cmd.value.clone())
            else {
                warn!("SET: missing or unknown accessory/characteristic/value");
                publish_cmd_ack(client, topic, false, src_json, None).await;
                return;
            };
            info!("Command: SET {identity} {characteristic} = {value}");
            let success = match platform.handle_set(&identity, characteristic, value).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("SET {identity} {characteristic} failed: {e}");
                    false
                }
            };
            publish_cmd_ack(client, topic, success, src_json, None).await;
        }

        other => {
            warn!("Unknown command: {other}");
            publish_cmd_ack(client, topic, false, src_json, None).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (e.g. RUST_LOG=debug or RUST_LOG=yale_sync_bridge=trace).
    // Default: info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // systemd journal already adds timestamps, so omit them when running under systemd
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        tracing_subscriber::fmt().without_time().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();

    // Load config
    let config_text =
        std::fs::read_to_string(&cli.config).context("Failed to read config file")?;
    let config: Config = toml::from_str(&config_text).context("Failed to parse config file")?;

    let mut bridge_config = build_bridge_config(&config)?;
    let mut cache_path = config.bridge.cache_path;
    let mut mqtt_client_id = config.mqtt.client_id;
    let mut publish_topic = config.mqtt.publish_topic;
    let mut subscribe_topic = config.mqtt.subscribe_topic;

    let (mut mqtt_host, mut mqtt_port) = parse_mqtt_url(&config.mqtt.url)?;

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        let refresh_interval_secs = bridge_config.refresh_interval_secs;
        info!("Starting Yale Sync platform {}", bridge_config.name);

        let host = Arc::new(LocalHost::with_cache_file(&cache_path));
        let client = Arc::new(
            YaleClient::new(&bridge_config).context("Failed to create Yale Sync client")?,
        );
        let platform = Arc::new(YaleSyncPlatform::new(
            bridge_config.clone(),
            client,
            host.clone(),
        ));

        // Subscribe before launch so discovery events are not missed
        let event_rx = platform.subscribe();

        match host.restore_cached().await {
            Ok(handles) => {
                for handle in handles {
                    platform.configure_accessory(handle).await;
                }
            }
            Err(e) => warn!("Failed to load accessory cache {cache_path}, starting empty: {e}"),
        }

        // Set up MQTT
        let mut mqtt_opts = MqttOptions::new(&mqtt_client_id, &mqtt_host, mqtt_port);
        mqtt_opts.set_keep_alive(Duration::from_secs(30));
        let (mqtt, mut eventloop) = AsyncClient::new(mqtt_opts, 256);

        // Subscribe to command topic
        mqtt.subscribe(&subscribe_topic, QoS::AtLeastOnce)
            .await
            .context("Failed to subscribe to MQTT topic")?;
        info!("MQTT: subscribed to {subscribe_topic}");

        // Task 1: Platform event listener
        let platform_events = Arc::clone(&platform);
        let client_events = mqtt.clone();
        let topic_events = publish_topic.clone();
        let event_handle = tokio::spawn(async move {
            let mut rx = event_rx;
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        handle_bridge_event(event, &client_events, &topic_events, &platform_events)
                            .await;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Event receiver lagged, missed {n} events");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        info!("Event channel closed");
                        break;
                    }
                }
            }
        });

        // Task 2: MQTT event loop (receives messages, dispatches commands)
        let platform_cmds = Arc::clone(&platform);
        let client_cmds = mqtt.clone();
        let topic_cmds = publish_topic.clone();
        let sub_topic = subscribe_topic.clone();
        let mqtt_handle = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        // rumqttc does not resubscribe on reconnect
                        info!("MQTT: connected, subscribing to {sub_topic}");
                        if let Err(e) =
                            client_cmds.subscribe(&sub_topic, QoS::AtLeastOnce).await
                        {
                            error!("Failed to subscribe to {sub_topic}: {e}");
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(msg))) => {
                        if msg.topic == sub_topic {
                            let payload = String::from_utf8_lossy(&msg.payload).into_owned();
                            match serde_json::from_str::<MqttCommand>(&payload) {
                                Ok(cmd) => {
                                    if cmd.op == "SNAPSHOT" {
                                        debug!("MQTT command received: {payload}");
                                    } else {
                                        info!("MQTT command received: {payload}");
                                    }
                                    // Remote calls can be slow; keep polling the event loop
                                    let platform = Arc::clone(&platform_cmds);
                                    let client = client_cmds.clone();
                                    let topic = topic_cmds.clone();
                                    tokio::spawn(async move {
                                        handle_command(&payload, cmd, &client, &topic, &platform)
                                            .await;
                                    });
                                }
                                Err(e) => {
                                    warn!("Failed to parse MQTT command: {e}");
                                }
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("MQTT event loop error: {e}");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        // Cached accessories are restored; run discovery
        match platform.did_finish_launching().await {
            Ok(report) => {
                if !report.failed_groups.is_empty() {
                    warn!("Device groups failed to load: {:?}", report.failed_groups);
                }
            }
            Err(e) => error!("Discovery failed: {e}"),
        }

        // Task 3: Refresh timer, pulls remote state and publishes a snapshot
        let platform_refresh = Arc::clone(&platform);
        let client_refresh = mqtt.clone();
        let topic_refresh = publish_topic.clone();
        let refresh_handle = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(refresh_interval_secs));
            // Skip the first immediate tick (discovery just ran)
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = platform_refresh.refresh().await {
                    warn!("Refresh failed: {e}");
                }
                publish_snapshot(&client_refresh, &topic_refresh, &platform_refresh).await;
            }
        });

        // Wait for a signal
        info!("MQTT bridge running. Send SIGHUP to restart, SIGINT/SIGTERM to stop.");
        let restart = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down...");
                false
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                false
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, reloading config and restarting...");
                true
            }
        };

        // Abort tasks
        event_handle.abort();
        mqtt_handle.abort();
        refresh_handle.abort();

        // Keep the last known characteristic values for the next start
        if let Err(e) = host.persist().await {
            warn!("Failed to persist accessory cache: {e}");
        }

        if !restart {
            break;
        }

        // Reload config from disk; keep previous config on failure
        info!("Reloading config from {}", cli.config);
        match std::fs::read_to_string(&cli.config)
            .context("Failed to read config file")
            .and_then(|text| {
                toml::from_str::<Config>(&text).context("Failed to parse config file")
            }) {
            Ok(new_config) => match build_bridge_config(&new_config) {
                Ok(new_bridge_config) => match parse_mqtt_url(&new_config.mqtt.url) {
                    Ok((new_host, new_port)) => {
                        bridge_config = new_bridge_config;
                        cache_path = new_config.bridge.cache_path;
                        mqtt_host = new_host;
                        mqtt_port = new_port;
                        mqtt_client_id = new_config.mqtt.client_id;
                        publish_topic = new_config.mqtt.publish_topic;
                        subscribe_topic = new_config.mqtt.subscribe_topic;
                        info!("Config reloaded successfully");
                    }
                    Err(e) => warn!("Invalid MQTT URL in new config, keeping previous: {e}"),
                },
                Err(e) => warn!("Invalid bridge config in new config, keeping previous: {e}"),
            },
            Err(e) => warn!("Failed to reload config, keeping previous: {e}"),
        }

        info!("Restarting...");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Parse an MQTT URL like "mqtt://host:port" into (host, port).
fn parse_mqtt_url(url: &str) -> Result<(String, u16)> {
    let stripped = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port_str) = stripped
        .rsplit_once(':')
        .context("MQTT URL must be in format mqtt://host:port")?;

    let port: u16 = port_str.parse().context("Invalid MQTT port number")?;

    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [yale]
        username = "user@example.com"
        password = "secret"
        client_token = "abc"

        [bridge]
        home_mode = "night"

        [mqtt]
        url = "mqtt://localhost:1883"
    "#;

    #[test]
    fn test_config_defaults() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let bridge = build_bridge_config(&config).unwrap();
        assert_eq!(bridge.home_mode, HomeModePolicy::NightArm);
        assert_eq!(bridge.area, 1);
        assert_eq!(bridge.api_url, DEFAULT_API_URL);
        assert_eq!(config.bridge.cache_path, "accessories.json");
        assert_eq!(config.mqtt.subscribe_topic, "yale/cmd");
    }

    #[test]
    fn test_unknown_home_mode_rejected() {
        let text = SAMPLE.replace("\"night\"", "\"away\"");
        let config: Config = toml::from_str(&text).unwrap();
        assert!(build_bridge_config(&config).is_err());
    }

    #[test]
    fn test_parse_mqtt_url() {
        assert_eq!(
            parse_mqtt_url("mqtt://broker.lan:1883").unwrap(),
            ("broker.lan".to_string(), 1883)
        );
        assert!(parse_mqtt_url("mqtt://broker.lan").is_err());
    }

    #[test]
    fn test_resolve_accessory() {
        let identity = derive_identity("P1");
        assert_eq!(resolve_accessory(&identity.to_string()), identity);
        assert_eq!(resolve_accessory("P1"), identity);
    }

    #[test]
    fn test_command_target() {
        let cmd: MqttCommand = serde_json::from_str(
            r#"{"op":"SET","accessory":"P1","characteristic":"SecuritySystemTargetState","value":1}"#,
        )
        .unwrap();
        let (identity, characteristic) = command_target(&cmd).unwrap();
        assert_eq!(identity, derive_identity("P1"));
        assert_eq!(characteristic, CharacteristicKind::SecuritySystemTargetState);
        assert_eq!(cmd.value, Some(CharacteristicValue::Int(1)));
    }
}
