// MIT License - Copyright (c) 2026 Peter Wright
// Yale Sync alarm bridge
//
//! # yale-sync-bridge
//!
//! Exposes a Yale Sync alarm (panel, motion sensors, contact sensors and
//! door locks) as accessories of a home-automation host.
//!
//! The library reconciles remote devices with the accessories the host has
//! persisted, binds get/set handlers per device type, and translates states
//! between the Yale vocabulary (`arm`/`home`/`disarm`, lock status codes) and
//! the host's characteristic values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use yale_sync_bridge::{BridgeConfig, CharacteristicKind, LocalHost, YaleClient, YaleSyncPlatform};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BridgeConfig::builder()
//!         .username("user@example.com")
//!         .password("secret")
//!         .client_token("token")
//!         .build();
//!
//!     let host = Arc::new(LocalHost::with_cache_file("accessories.json"));
//!     let client = Arc::new(YaleClient::new(&config)?);
//!     let platform = YaleSyncPlatform::new(config, client, host.clone());
//!
//!     let mut events = platform.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     for handle in host.restore_cached().await? {
//!         platform.configure_accessory(handle).await;
//!     }
//!     platform.did_finish_launching().await?;
//!
//!     for accessory in platform.accessories().await {
//!         let value = platform
//!             .handle_get(&accessory.identity(), CharacteristicKind::Name)
//!             .await;
//!         println!("{}: {:?}", accessory.identity(), value);
//!     }
//!     Ok(())
//! }
//! ```

pub mod binder;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod devices;
pub mod error;
pub mod event;
pub mod handler;
pub mod hap;
pub mod host;
pub mod identity;
pub mod platform;
pub mod reconcile;
pub mod remote;
pub mod translate;
pub mod yale;

// Re-exports for convenience
pub use catalog::{DeviceCatalog, fetch_catalog};
pub use config::{BridgeConfig, BridgeConfigBuilder, HomeModePolicy};
pub use devices::{DeviceKind, DeviceRecord, DeviceState, RemoteAlarmState, RemoteLockCommand};
pub use error::{BridgeError, Result};
pub use event::{BridgeEvent, EventReceiver};
pub use hap::{
    AccessoryHandle, CharacteristicKind, CharacteristicValue, HostPlatform, PlatformAccessory,
};
pub use host::LocalHost;
pub use identity::{AccessoryIdentity, derive_identity};
pub use platform::{DiscoveryReport, YaleSyncPlatform};
pub use reconcile::{KnownAccessories, Reconciled, reconcile};
pub use remote::{AlarmService, RemoteDevice, RemoteDeviceMap};
pub use yale::YaleClient;
