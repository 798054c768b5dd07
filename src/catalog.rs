// MIT License - Copyright (c) 2026 Peter Wright
// Device catalog fetcher

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, error, warn};

use crate::devices::{DeviceKind, DeviceRecord, DeviceState};
use crate::error::Result;
use crate::remote::{AlarmService, RemoteDevice, RemoteDeviceMap};

/// Everything the remote reported in one fetch cycle, normalized into
/// device records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceCatalog {
    pub panel: Option<DeviceRecord>,
    pub motion_sensors: BTreeMap<String, DeviceRecord>,
    pub contact_sensors: BTreeMap<String, DeviceRecord>,
    pub door_locks: BTreeMap<String, DeviceRecord>,
    /// Groups whose fetch failed this cycle and were treated as empty
    pub failed_groups: BTreeSet<DeviceKind>,
}

impl DeviceCatalog {
    /// All devices, panel first, then motion sensors, contact sensors and locks.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.panel
            .iter()
            .chain(self.motion_sensors.values())
            .chain(self.contact_sensors.values())
            .chain(self.door_locks.values())
    }

    pub fn len(&self) -> usize {
        self.devices().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, kind: DeviceKind) -> usize {
        match kind {
            DeviceKind::Panel => usize::from(self.panel.is_some()),
            DeviceKind::MotionSensor => self.motion_sensors.len(),
            DeviceKind::ContactSensor => self.contact_sensors.len(),
            DeviceKind::DoorLock => self.door_locks.len(),
        }
    }

    pub fn group_failed(&self, kind: DeviceKind) -> bool {
        self.failed_groups.contains(&kind)
    }

    pub fn get(&self, identifier: &str) -> Option<&DeviceRecord> {
        self.devices().find(|d| d.identifier == identifier)
    }
}

/// Fetch all device groups from the remote.
///
/// Groups are fetched concurrently and independently: a failing group is
/// logged, recorded in `failed_groups` and treated as empty, without affecting
/// the others.
pub async fn fetch_catalog(service: &dyn AlarmService) -> DeviceCatalog {
    debug!("Fetching device catalog");

    let (panel, motion, contact, locks) = tokio::join!(
        service.fetch_panel(),
        service.fetch_motion_sensors(),
        service.fetch_contact_sensors(),
        service.fetch_door_locks(),
    );

    let mut catalog = DeviceCatalog::default();
    let mut seen = HashSet::new();

    match panel {
        Ok(Some(device)) => {
            catalog.panel = normalize(device, DeviceKind::Panel, &mut seen);
        }
        Ok(None) => {
            error!("Error getting Yale panel: none reported");
            catalog.failed_groups.insert(DeviceKind::Panel);
        }
        Err(e) => {
            error!("Error getting Yale panel: {}", e);
            catalog.failed_groups.insert(DeviceKind::Panel);
        }
    }

    catalog.motion_sensors =
        normalize_group(DeviceKind::MotionSensor, motion, &mut seen, &mut catalog.failed_groups);
    catalog.contact_sensors =
        normalize_group(DeviceKind::ContactSensor, contact, &mut seen, &mut catalog.failed_groups);
    catalog.door_locks =
        normalize_group(DeviceKind::DoorLock, locks, &mut seen, &mut catalog.failed_groups);

    debug!(
        "Catalog: panel={} motion={} contact={} locks={} failed={:?}",
        catalog.panel.is_some(),
        catalog.motion_sensors.len(),
        catalog.contact_sensors.len(),
        catalog.door_locks.len(),
        catalog.failed_groups
    );
    catalog
}

fn normalize_group(
    kind: DeviceKind,
    result: Result<RemoteDeviceMap>,
    seen: &mut HashSet<String>,
    failed: &mut BTreeSet<DeviceKind>,
) -> BTreeMap<String, DeviceRecord> {
    let devices = match result {
        Ok(devices) => devices,
        Err(e) => {
            error!("Error getting Yale {} devices: {}", kind, e);
            failed.insert(kind);
            return BTreeMap::new();
        }
    };

    devices
        .into_values()
        .filter_map(|device| normalize(device, kind, seen))
        .map(|record| (record.identifier.clone(), record))
        .collect()
}

/// Turn a remote device into a record of `kind`, rejecting devices that
/// cannot be given a stable identity or whose state does not fit the kind.
fn normalize(
    device: RemoteDevice,
    kind: DeviceKind,
    seen: &mut HashSet<String>,
) -> Option<DeviceRecord> {
    if device.identifier.trim().is_empty() {
        warn!("Skipping {} '{}' without identifier", kind, device.name);
        return None;
    }

    let state_fits = match (kind, device.state) {
        (DeviceKind::Panel, DeviceState::Alarm(_)) => true,
        (DeviceKind::Panel, DeviceState::Status(_)) => false,
        (
            DeviceKind::MotionSensor | DeviceKind::ContactSensor | DeviceKind::DoorLock,
            DeviceState::Status(_),
        ) => true,
        (
            DeviceKind::MotionSensor | DeviceKind::ContactSensor | DeviceKind::DoorLock,
            DeviceState::Alarm(_),
        ) => false,
    };
    if !state_fits {
        warn!(
            "Skipping {} {}: state {:?} does not fit the device kind",
            kind, device.identifier, device.state
        );
        return None;
    }

    if !seen.insert(device.identifier.clone()) {
        warn!(
            "Skipping {} {}: identifier already reported by another group",
            kind, device.identifier
        );
        return None;
    }

    Some(device.into_record(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::RemoteAlarmState;

    fn sensor(id: &str, code: i64) -> RemoteDevice {
        RemoteDevice::new(id, format!("Sensor {id}"), DeviceState::Status(code))
    }

    #[test]
    fn test_normalize_assigns_kind() {
        let mut seen = HashSet::new();
        let record = normalize(sensor("RF:1", 1), DeviceKind::MotionSensor, &mut seen).unwrap();
        assert_eq!(record.kind, DeviceKind::MotionSensor);
        assert_eq!(record.identifier, "RF:1");
        assert_eq!(record.state, DeviceState::Status(1));
    }

    #[test]
    fn test_normalize_rejects_bad_devices() {
        let mut seen = HashSet::new();
        assert!(normalize(sensor("  ", 0), DeviceKind::ContactSensor, &mut seen).is_none());
        assert!(normalize(sensor("RF:2", 0), DeviceKind::Panel, &mut seen).is_none());

        let panel = RemoteDevice::new("P1", "Panel", DeviceState::Alarm(RemoteAlarmState::Armed));
        assert!(normalize(panel, DeviceKind::DoorLock, &mut seen).is_none());
    }

    #[test]
    fn test_normalize_rejects_duplicate_identifier() {
        let mut seen = HashSet::new();
        assert!(normalize(sensor("RF:3", 0), DeviceKind::MotionSensor, &mut seen).is_some());
        assert!(normalize(sensor("RF:3", 0), DeviceKind::ContactSensor, &mut seen).is_none());
    }

    #[test]
    fn test_failed_group_is_empty_and_recorded() {
        let mut seen = HashSet::new();
        let mut failed = BTreeSet::new();
        let group = normalize_group(
            DeviceKind::ContactSensor,
            Err(crate::error::BridgeError::NotAuthenticated),
            &mut seen,
            &mut failed,
        );
        assert!(group.is_empty());
        assert!(failed.contains(&DeviceKind::ContactSensor));
    }

    #[test]
    fn test_group_keys_are_identifiers() {
        let mut seen = HashSet::new();
        let mut failed = BTreeSet::new();
        let mut remote = RemoteDeviceMap::new();
        // Map key differs from the device's own identifier
        remote.insert("0".to_string(), sensor("RF:9", 1));
        let group = normalize_group(DeviceKind::DoorLock, Ok(remote), &mut seen, &mut failed);
        assert!(group.contains_key("RF:9"));
        assert!(failed.is_empty());
    }

    #[test]
    fn test_catalog_iteration_order() {
        let mut catalog = DeviceCatalog::default();
        catalog.panel = Some(DeviceRecord::new(
            "P1",
            "Panel",
            DeviceKind::Panel,
            DeviceState::Alarm(RemoteAlarmState::Home),
        ));
        catalog
            .door_locks
            .insert("L1".to_string(), sensor("L1", 0).into_record(DeviceKind::DoorLock));
        catalog
            .motion_sensors
            .insert("M1".to_string(), sensor("M1", 0).into_record(DeviceKind::MotionSensor));

        let ids: Vec<&str> = catalog.devices().map(|d| d.identifier.as_str()).collect();
        assert_eq!(ids, vec!["P1", "M1", "L1"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.count(DeviceKind::Panel), 1);
        assert_eq!(catalog.count(DeviceKind::ContactSensor), 0);
        assert!(catalog.get("L1").is_some());
        assert!(catalog.get("X").is_none());
    }
}
