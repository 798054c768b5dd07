// MIT License - Copyright (c) 2026 Peter Wright
// Identity and reconciliation engine

use std::collections::btree_map::{BTreeMap, Values};
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::catalog::DeviceCatalog;
use crate::constants::{PLATFORM_NAME, PLUGIN_NAME};
use crate::devices::DeviceRecord;
use crate::error::Result;
use crate::hap::{AccessoryHandle, HostPlatform, PlatformAccessory};
use crate::identity::AccessoryIdentity;

/// Accessories the platform knows about, keyed by identity.
///
/// Filled from the host's restore hook before discovery and extended by
/// [`reconcile`] as new accessories are registered.
#[derive(Debug, Clone, Default)]
pub struct KnownAccessories {
    accessories: BTreeMap<AccessoryIdentity, AccessoryHandle>,
}

impl KnownAccessories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accessory handed back by the host. A second restore of the same
    /// identity replaces the first.
    pub fn restore(&mut self, handle: AccessoryHandle) {
        self.accessories.insert(handle.identity(), handle);
    }

    pub fn find(&self, identity: &AccessoryIdentity) -> Option<&AccessoryHandle> {
        self.accessories.get(identity)
    }

    pub fn contains(&self, identity: &AccessoryIdentity) -> bool {
        self.accessories.contains_key(identity)
    }

    fn insert(&mut self, handle: AccessoryHandle) {
        self.accessories.insert(handle.identity(), handle);
    }

    pub fn remove(&mut self, identity: &AccessoryIdentity) -> Option<AccessoryHandle> {
        self.accessories.remove(identity)
    }

    pub fn iter(&self) -> Values<'_, AccessoryIdentity, AccessoryHandle> {
        self.accessories.values()
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }
}

/// Outcome of reconciling one device.
#[derive(Debug, Clone)]
pub enum Reconciled {
    /// No accessory existed; one was created and registered
    Created(AccessoryHandle),
    /// An accessory with the device's identity was already known
    Restored(AccessoryHandle),
}

impl Reconciled {
    pub fn handle(&self) -> &AccessoryHandle {
        match self {
            Reconciled::Created(handle) | Reconciled::Restored(handle) => handle,
        }
    }

    pub fn into_handle(self) -> AccessoryHandle {
        match self {
            Reconciled::Created(handle) | Reconciled::Restored(handle) => handle,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Reconciled::Created(_))
    }
}

/// Match `device` against the known accessories, creating and registering a
/// new accessory when none matches.
///
/// A restored accessory keeps its cached device snapshot unless
/// `refresh_context` is set, in which case the snapshot is replaced and the
/// host is asked to persist the change. A new accessory is only added to
/// `known` once the host accepted its registration, so a failed registration
/// is retried on the next discovery.
pub async fn reconcile(
    device: &DeviceRecord,
    known: &mut KnownAccessories,
    host: &dyn HostPlatform,
    refresh_context: bool,
) -> Result<Reconciled> {
    let identity = host.generate_identity(&device.identifier);

    if let Some(handle) = known.find(&identity) {
        info!("Restoring existing accessory from cache: {}", device.name);
        if refresh_context {
            handle.write().await.context.device = Some(device.clone());
            if let Err(e) = host
                .update_platform_accessories(std::slice::from_ref(handle))
                .await
            {
                warn!("Failed to persist refreshed context of {}: {}", device.name, e);
            }
        }
        return Ok(Reconciled::Restored(handle.clone()));
    }

    info!("Adding new accessory: {} ({})", device.name, device.kind);
    let mut accessory = PlatformAccessory::new(device.name.clone(), identity);
    accessory.context.device = Some(device.clone());
    let handle = AccessoryHandle::new(accessory);

    host.register_platform_accessories(PLUGIN_NAME, PLATFORM_NAME, std::slice::from_ref(&handle))
        .await?;
    known.insert(handle.clone());

    Ok(Reconciled::Created(handle))
}

/// Known accessories whose device the catalog no longer reports.
///
/// Accessories of a group that failed to load this cycle, and accessories
/// without a device snapshot, are never considered stale.
pub async fn stale_accessories(
    known: &KnownAccessories,
    catalog: &DeviceCatalog,
    host: &dyn HostPlatform,
) -> Vec<AccessoryHandle> {
    let reported: HashSet<AccessoryIdentity> = catalog
        .devices()
        .map(|d| host.generate_identity(&d.identifier))
        .collect();

    let mut stale = Vec::new();
    for handle in known.iter() {
        if reported.contains(&handle.identity()) {
            continue;
        }
        let accessory = handle.read().await;
        let Some(device) = accessory.device() else {
            debug!(
                "Keeping accessory {} without device snapshot",
                accessory.display_name()
            );
            continue;
        };
        if catalog.group_failed(device.kind) {
            debug!(
                "Keeping accessory {}: {} group failed to load",
                accessory.display_name(),
                device.kind
            );
            continue;
        }
        stale.push(handle.clone());
    }
    stale
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::devices::{DeviceKind, DeviceState, RemoteAlarmState};
    use crate::error::BridgeError;
    use crate::identity::derive_identity;

    #[derive(Default)]
    struct RecordingHost {
        registered: Mutex<Vec<AccessoryIdentity>>,
        updated: Mutex<Vec<AccessoryIdentity>>,
        fail_register: bool,
        fail_update: bool,
    }

    #[async_trait]
    impl HostPlatform for RecordingHost {
        async fn register_platform_accessories(
            &self,
            plugin: &str,
            platform: &str,
            accessories: &[AccessoryHandle],
        ) -> Result<()> {
            assert_eq!(plugin, PLUGIN_NAME);
            assert_eq!(platform, PLATFORM_NAME);
            if self.fail_register {
                return Err(BridgeError::Io(std::io::Error::other("disk full")));
            }
            let mut registered = self.registered.lock().unwrap();
            registered.extend(accessories.iter().map(|a| a.identity()));
            Ok(())
        }

        async fn update_platform_accessories(&self, accessories: &[AccessoryHandle]) -> Result<()> {
            if self.fail_update {
                return Err(BridgeError::Io(std::io::Error::other("read-only cache")));
            }
            let mut updated = self.updated.lock().unwrap();
            updated.extend(accessories.iter().map(|a| a.identity()));
            Ok(())
        }

        async fn unregister_platform_accessories(
            &self,
            _plugin: &str,
            _platform: &str,
            _accessories: &[AccessoryHandle],
        ) -> Result<()> {
            Ok(())
        }
    }

    fn panel(state: RemoteAlarmState) -> DeviceRecord {
        DeviceRecord::new("P1", "Main Panel", DeviceKind::Panel, DeviceState::Alarm(state))
    }

    #[tokio::test]
    async fn test_new_device_is_created_and_registered() {
        let host = RecordingHost::default();
        let mut known = KnownAccessories::new();

        let outcome = reconcile(&panel(RemoteAlarmState::Armed), &mut known, &host, false)
            .await
            .unwrap();

        assert!(outcome.is_new());
        assert_eq!(outcome.handle().identity(), derive_identity("P1"));
        assert_eq!(known.len(), 1);
        assert_eq!(*host.registered.lock().unwrap(), vec![derive_identity("P1")]);

        let accessory = outcome.handle().read().await;
        assert_eq!(accessory.display_name(), "Main Panel");
        assert_eq!(accessory.device(), Some(&panel(RemoteAlarmState::Armed)));
    }

    #[tokio::test]
    async fn test_reconcile_twice_returns_same_handle() {
        let host = RecordingHost::default();
        let mut known = KnownAccessories::new();
        let device = panel(RemoteAlarmState::Armed);

        let first = reconcile(&device, &mut known, &host, false).await.unwrap();
        let second = reconcile(&device, &mut known, &host, false).await.unwrap();

        assert!(!second.is_new());
        assert!(first.handle().ptr_eq(second.handle()));
        assert_eq!(known.len(), 1);
        assert_eq!(host.registered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restored_keeps_snapshot_unless_refreshing() {
        let host = RecordingHost::default();
        let mut known = KnownAccessories::new();
        reconcile(&panel(RemoteAlarmState::Armed), &mut known, &host, false)
            .await
            .unwrap();

        let outcome = reconcile(&panel(RemoteAlarmState::Home), &mut known, &host, false)
            .await
            .unwrap();
        assert_eq!(
            outcome.handle().read().await.device().map(|d| d.state),
            Some(DeviceState::Alarm(RemoteAlarmState::Armed))
        );
        assert!(host.updated.lock().unwrap().is_empty());

        let outcome = reconcile(&panel(RemoteAlarmState::Home), &mut known, &host, true)
            .await
            .unwrap();
        assert_eq!(
            outcome.handle().read().await.device().map(|d| d.state),
            Some(DeviceState::Alarm(RemoteAlarmState::Home))
        );
        assert_eq!(*host.updated.lock().unwrap(), vec![derive_identity("P1")]);
    }

    #[tokio::test]
    async fn test_failed_context_update_still_restores() {
        let host = RecordingHost {
            fail_update: true,
            ..Default::default()
        };
        let mut known = KnownAccessories::new();
        let first = reconcile(&panel(RemoteAlarmState::Armed), &mut known, &host, true)
            .await
            .unwrap();

        let outcome = reconcile(&panel(RemoteAlarmState::Home), &mut known, &host, true)
            .await
            .unwrap();
        assert!(!outcome.is_new());
        assert!(outcome.handle().ptr_eq(first.handle()));
        assert_eq!(
            outcome.handle().read().await.device().map(|d| d.state),
            Some(DeviceState::Alarm(RemoteAlarmState::Home))
        );
    }

    #[tokio::test]
    async fn test_failed_registration_is_not_remembered() {
        let host = RecordingHost {
            fail_register: true,
            ..Default::default()
        };
        let mut known = KnownAccessories::new();

        let result = reconcile(&panel(RemoteAlarmState::Armed), &mut known, &host, false).await;
        assert!(result.is_err());
        assert!(known.is_empty());
    }

    #[tokio::test]
    async fn test_stale_accessories() {
        let host = RecordingHost::default();
        let mut known = KnownAccessories::new();

        let lock = DeviceRecord::new("L1", "Front Door", DeviceKind::DoorLock, DeviceState::Status(0));
        let contact =
            DeviceRecord::new("C1", "Back Door", DeviceKind::ContactSensor, DeviceState::Status(1));
        for device in [panel(RemoteAlarmState::Armed), lock.clone(), contact] {
            reconcile(&device, &mut known, &host, false).await.unwrap();
        }
        // Restored without a snapshot
        known.restore(AccessoryHandle::new(PlatformAccessory::new(
            "Orphan",
            derive_identity("X9"),
        )));

        let mut catalog = DeviceCatalog::default();
        catalog.panel = Some(panel(RemoteAlarmState::Armed));
        catalog.failed_groups.insert(DeviceKind::ContactSensor);

        let stale = stale_accessories(&known, &catalog, &host).await;
        let ids: Vec<AccessoryIdentity> = stale.iter().map(|h| h.identity()).collect();
        assert_eq!(ids, vec![derive_identity("L1")]);

        catalog.door_locks.insert("L1".to_string(), lock);
        assert!(stale_accessories(&known, &catalog, &host).await.is_empty());
    }
}
