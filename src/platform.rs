// MIT License - Copyright (c) 2026 Peter Wright
// Yale Sync platform

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::binder::bind;
use crate::catalog::{DeviceCatalog, fetch_catalog};
use crate::config::BridgeConfig;
use crate::constants::{PLATFORM_NAME, PLUGIN_NAME};
use crate::devices::{DeviceKind, DeviceRecord};
use crate::error::{BridgeError, Result};
use crate::event::{BridgeEvent, EventReceiver, EventSender, event_channel};
use crate::handler::AccessoryHandler;
use crate::hap::{
    AccessoryHandle, CharacteristicKind, CharacteristicValue, Direction, HostPlatform,
};
use crate::identity::AccessoryIdentity;
use crate::reconcile::{KnownAccessories, Reconciled, reconcile, stale_accessories};
use crate::remote::AlarmService;

/// Summary of one discovery or refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Accessories created and registered with the host
    pub registered: usize,
    /// Known accessories matched to a reported device
    pub restored: usize,
    /// Accessories unregistered because their device is gone
    pub removed: usize,
    /// Device groups that failed to load
    pub failed_groups: BTreeSet<DeviceKind>,
}

/// The platform connecting a Yale Sync account to an accessory host.
///
/// Lifecycle, as driven by the host:
///
/// 1. [`configure_accessory`](Self::configure_accessory) once per cached accessory;
/// 2. [`did_finish_launching`](Self::did_finish_launching) once, which runs discovery;
/// 3. [`handle_get`](Self::handle_get) / [`handle_set`](Self::handle_set) for
///    host characteristic calls, and [`refresh`](Self::refresh) periodically.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use yale_sync_bridge::{BridgeConfig, LocalHost, YaleClient, YaleSyncPlatform};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = BridgeConfig::builder()
///         .username("user@example.com")
///         .password("secret")
///         .client_token("token")
///         .build();
///
///     let host = Arc::new(LocalHost::with_cache_file("accessories.json"));
///     let client = Arc::new(YaleClient::new(&config)?);
///     let platform = YaleSyncPlatform::new(config, client, host.clone());
///
///     for handle in host.restore_cached().await? {
///         platform.configure_accessory(handle).await;
///     }
///     let report = platform.did_finish_launching().await?;
///     println!("{} new, {} restored", report.registered, report.restored);
///     Ok(())
/// }
/// ```
pub struct YaleSyncPlatform {
    config: BridgeConfig,
    service: Arc<dyn AlarmService>,
    host: Arc<dyn HostPlatform>,
    known: RwLock<KnownAccessories>,
    handlers: RwLock<BTreeMap<AccessoryIdentity, AccessoryHandler>>,
    event_tx: EventSender,
    launched: AtomicBool,
    discovered: AtomicBool,
    authenticated: AtomicBool,
    sync_lock: Mutex<()>,
}

impl YaleSyncPlatform {
    pub fn new(
        config: BridgeConfig,
        service: Arc<dyn AlarmService>,
        host: Arc<dyn HostPlatform>,
    ) -> Self {
        let (event_tx, _) = event_channel(256);
        debug!("Finished initializing platform: {}", config.name);
        Self {
            config,
            service,
            host,
            known: RwLock::new(KnownAccessories::new()),
            handlers: RwLock::new(BTreeMap::new()),
            event_tx,
            launched: AtomicBool::new(false),
            discovered: AtomicBool::new(false),
            authenticated: AtomicBool::new(false),
            sync_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Subscribe to platform events.
    pub fn subscribe(&self) -> EventReceiver {
        self.event_tx.subscribe()
    }

    /// Restore hook: called by the host once per cached accessory, before
    /// launch completes.
    pub async fn configure_accessory(&self, handle: AccessoryHandle) {
        let name = handle.read().await.display_name().to_string();
        info!("Loading accessory from cache: {}", name);
        self.known.write().await.restore(handle);
    }

    /// Startup-complete signal. Runs discovery; a second signal is ignored.
    pub async fn did_finish_launching(&self) -> Result<DiscoveryReport> {
        if self.launched.swap(true, Ordering::SeqCst) {
            warn!("didFinishLaunching received twice, ignoring");
            return Ok(DiscoveryReport::default());
        }
        debug!("Executed didFinishLaunching callback");
        self.discover_devices().await
    }

    pub fn is_launched(&self) -> bool {
        self.launched.load(Ordering::SeqCst)
    }

    /// Fetch every device group and reconcile each device into an accessory.
    ///
    /// Refuses to run before launch, and runs once per launch; later passes go
    /// through [`refresh`](Self::refresh).
    pub async fn discover_devices(&self) -> Result<DiscoveryReport> {
        if !self.is_launched() {
            return Err(BridgeError::NotLaunched);
        }
        if self.discovered.swap(true, Ordering::SeqCst) {
            debug!("Discovery already ran for this launch");
            return Ok(DiscoveryReport::default());
        }
        self.sync().await
    }

    /// Re-read remote state, push changed values, and pick up devices that
    /// appeared since discovery.
    pub async fn refresh(&self) -> Result<DiscoveryReport> {
        if !self.is_launched() {
            return Err(BridgeError::NotLaunched);
        }
        self.sync().await
    }

    async fn sync(&self) -> Result<DiscoveryReport> {
        let _guard = self.sync_lock.lock().await;

        if !self.ensure_session().await {
            return Ok(DiscoveryReport::default());
        }

        let catalog = fetch_catalog(self.service.as_ref()).await;
        let mut report = DiscoveryReport {
            failed_groups: catalog.failed_groups.clone(),
            ..Default::default()
        };
        let mut attached = Vec::new();

        for device in catalog.devices() {
            let outcome = {
                let mut known = self.known.write().await;
                reconcile(
                    device,
                    &mut known,
                    self.host.as_ref(),
                    self.config.refresh_cached_context,
                )
                .await
            };
            match outcome {
                Ok(outcome) => {
                    if self.attach(&outcome, device).await {
                        attached.push(outcome.handle().clone());
                        if outcome.is_new() {
                            report.registered += 1;
                        } else {
                            report.restored += 1;
                        }
                    }
                }
                Err(e) => error!("Failed to register accessory {}: {}", device.name, e),
            }
        }

        // Services and seeded values exist only once bound
        if !attached.is_empty()
            && let Err(e) = self.host.update_platform_accessories(&attached).await
        {
            warn!("Failed to update bound accessories: {}", e);
        }

        if self.config.prune_missing {
            report.removed = self.prune(&catalog).await;
        }

        info!(
            "Discovery complete: {} new, {} restored, {} removed",
            report.registered, report.restored, report.removed
        );
        let _ = self.event_tx.send(BridgeEvent::DiscoveryComplete {
            registered: report.registered,
            restored: report.restored,
            removed: report.removed,
        });
        Ok(report)
    }

    /// Authenticate if needed and refresh the session state. Returns false
    /// when there is no usable session this cycle.
    async fn ensure_session(&self) -> bool {
        if !self.authenticated.load(Ordering::SeqCst) {
            match self
                .service
                .authenticate(&self.config.username, &self.config.password)
                .await
            {
                Ok(()) => {
                    info!("Authenticated with Yale Sync as {}", self.config.username);
                    self.authenticated.store(true, Ordering::SeqCst);
                }
                Err(e) => {
                    error!("Yale Sync authentication failed: {}", e);
                    return false;
                }
            }
        }

        if let Err(e) = self.service.refresh_session_state().await {
            warn!("Failed to refresh Yale Sync state: {}", e);
            if e.is_session_expired() {
                self.authenticated.store(false, Ordering::SeqCst);
                return false;
            }
        }
        true
    }

    /// Bind a reconciled accessory the first time it is seen this run, then
    /// apply the device's fresh state. Returns true on first attach.
    async fn attach(&self, outcome: &Reconciled, device: &DeviceRecord) -> bool {
        let handle = outcome.handle();
        let identity = handle.identity();

        let existing = self.handlers.read().await.get(&identity).cloned();
        if let Some(handler) = existing {
            handler.apply_remote_state(device.state).await;
            return false;
        }

        bind(handle, device.kind).await;
        let handler = AccessoryHandler::new(
            self.service.clone(),
            handle.clone(),
            device.kind,
            device.identifier.clone(),
            self.config.home_mode,
            self.event_tx.clone(),
        );
        handler.seed_from_snapshot().await;
        handler.apply_remote_state(device.state).await;
        self.handlers.write().await.insert(identity, handler);

        let event = if outcome.is_new() {
            BridgeEvent::AccessoryRegistered {
                identity,
                name: device.name.clone(),
                kind: device.kind,
            }
        } else {
            BridgeEvent::AccessoryRestored {
                identity,
                name: device.name.clone(),
                kind: device.kind,
            }
        };
        let _ = self.event_tx.send(event);
        true
    }

    async fn prune(&self, catalog: &DeviceCatalog) -> usize {
        let stale = {
            let known = self.known.read().await;
            stale_accessories(&known, catalog, self.host.as_ref()).await
        };
        if stale.is_empty() {
            return 0;
        }

        for handle in &stale {
            let name = handle.read().await.display_name().to_string();
            info!("Removing existing accessory from cache: {}", name);
        }
        if let Err(e) = self
            .host
            .unregister_platform_accessories(PLUGIN_NAME, PLATFORM_NAME, &stale)
            .await
        {
            error!("Failed to unregister stale accessories: {}", e);
            return 0;
        }

        let mut known = self.known.write().await;
        let mut handlers = self.handlers.write().await;
        for handle in &stale {
            let identity = handle.identity();
            known.remove(&identity);
            handlers.remove(&identity);
            let _ = self.event_tx.send(BridgeEvent::AccessoryRemoved { identity });
        }
        stale.len()
    }

    /// Host read of a characteristic.
    ///
    /// Characteristics without a getter (accessory information, or accessories
    /// whose device was not reported this run) answer from the cache.
    pub async fn handle_get(
        &self,
        identity: &AccessoryIdentity,
        characteristic: CharacteristicKind,
    ) -> Result<CharacteristicValue> {
        if let Some(handler) = self.handler(identity).await {
            let bound = handler
                .handle()
                .read()
                .await
                .has_handler(characteristic, Direction::Get);
            if bound {
                return handler.handle_get(characteristic).await;
            }
        }

        let handle = self
            .accessory(identity)
            .await
            .ok_or(BridgeError::UnknownAccessory { identity: *identity })?;
        let accessory = handle.read().await;
        accessory
            .characteristic_value(characteristic)
            .cloned()
            .ok_or(BridgeError::HandlerNotBound {
                characteristic,
                direction: Direction::Get.as_str(),
            })
    }

    /// Host write of a characteristic.
    pub async fn handle_set(
        &self,
        identity: &AccessoryIdentity,
        characteristic: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<()> {
        let handler = self
            .handler(identity)
            .await
            .ok_or(BridgeError::UnknownAccessory { identity: *identity })?;
        handler.handle_set(characteristic, value).await
    }

    pub async fn handler(&self, identity: &AccessoryIdentity) -> Option<AccessoryHandler> {
        self.handlers.read().await.get(identity).cloned()
    }

    pub async fn accessory(&self, identity: &AccessoryIdentity) -> Option<AccessoryHandle> {
        self.known.read().await.find(identity).cloned()
    }

    /// Every known accessory, restored or created, ordered by identity.
    pub async fn accessories(&self) -> Vec<AccessoryHandle> {
        self.known.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::devices::{RemoteAlarmState, RemoteLockCommand};
    use crate::host::LocalHost;
    use crate::identity::derive_identity;
    use crate::remote::{RemoteDevice, RemoteDeviceMap};

    struct NoDevices;

    #[async_trait]
    impl AlarmService for NoDevices {
        async fn authenticate(&self, _username: &str, _password: &str) -> Result<()> {
            Ok(())
        }
        async fn refresh_session_state(&self) -> Result<()> {
            Ok(())
        }
        async fn fetch_panel(&self) -> Result<Option<RemoteDevice>> {
            Ok(None)
        }
        async fn fetch_motion_sensors(&self) -> Result<RemoteDeviceMap> {
            Ok(RemoteDeviceMap::new())
        }
        async fn fetch_contact_sensors(&self) -> Result<RemoteDeviceMap> {
            Ok(RemoteDeviceMap::new())
        }
        async fn fetch_door_locks(&self) -> Result<RemoteDeviceMap> {
            Ok(RemoteDeviceMap::new())
        }
        async fn query_panel_state(&self) -> Result<RemoteAlarmState> {
            Err(BridgeError::NotAuthenticated)
        }
        async fn command_panel_state(&self, _state: RemoteAlarmState) -> Result<()> {
            Err(BridgeError::NotAuthenticated)
        }
        async fn query_door_locks(&self) -> Result<BTreeMap<String, i64>> {
            Ok(BTreeMap::new())
        }
        async fn command_door_lock(&self, identifier: &str, _command: RemoteLockCommand) -> Result<i64> {
            Err(BridgeError::UnknownDevice {
                identifier: identifier.to_string(),
            })
        }
    }

    fn platform() -> YaleSyncPlatform {
        YaleSyncPlatform::new(
            BridgeConfig::default(),
            Arc::new(NoDevices),
            Arc::new(LocalHost::in_memory()),
        )
    }

    #[tokio::test]
    async fn test_discovery_before_launch_is_refused() {
        let platform = platform();
        assert!(matches!(
            platform.discover_devices().await,
            Err(BridgeError::NotLaunched)
        ));
        assert!(matches!(platform.refresh().await, Err(BridgeError::NotLaunched)));
    }

    #[tokio::test]
    async fn test_discovery_runs_once_per_launch() {
        let platform = platform();
        let mut events = platform.subscribe();

        platform.did_finish_launching().await.unwrap();
        platform.discover_devices().await.unwrap();
        platform.did_finish_launching().await.unwrap();

        let mut completions = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, BridgeEvent::DiscoveryComplete { .. }) {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[tokio::test]
    async fn test_unknown_accessory() {
        let platform = platform();
        let err = platform
            .handle_set(
                &derive_identity("nope"),
                CharacteristicKind::LockTargetState,
                CharacteristicValue::Int(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownAccessory { .. }));
    }
}
