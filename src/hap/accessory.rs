// MIT License - Copyright (c) 2026 Peter Wright
// Host-persisted accessory records

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::devices::{DeviceKind, DeviceRecord};
use crate::hap::characteristic::{CharacteristicKind, CharacteristicValue, Direction};
use crate::hap::service::{Service, ServiceKind};
use crate::identity::AccessoryIdentity;

/// Free-form storage the host persists alongside an accessory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessoryContext {
    /// Snapshot of the device record the accessory was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceRecord>,
}

/// One accessory as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAccessory {
    identity: AccessoryIdentity,
    display_name: String,
    #[serde(default)]
    pub context: AccessoryContext,
    #[serde(default)]
    services: Vec<Service>,
}

impl PlatformAccessory {
    /// A fresh accessory. Like every host accessory it starts with an
    /// accessory-information service.
    pub fn new(display_name: impl Into<String>, identity: AccessoryIdentity) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            context: AccessoryContext::default(),
            services: vec![Service::new(ServiceKind::AccessoryInformation)],
        }
    }

    pub fn identity(&self) -> AccessoryIdentity {
        self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn device(&self) -> Option<&DeviceRecord> {
        self.context.device.as_ref()
    }

    pub fn device_kind(&self) -> Option<DeviceKind> {
        self.context.device.as_ref().map(|d| d.kind)
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn get_service(&self, kind: ServiceKind) -> Option<&Service> {
        self.services.iter().find(|s| s.kind() == kind)
    }

    pub fn get_service_mut(&mut self, kind: ServiceKind) -> Option<&mut Service> {
        self.services.iter_mut().find(|s| s.kind() == kind)
    }

    /// Add a new service of `kind`. Prefer [`Self::get_or_add_service`] when the
    /// accessory may already carry one.
    pub fn add_service(&mut self, kind: ServiceKind) -> &mut Service {
        self.services.push(Service::new(kind));
        let last = self.services.len() - 1;
        &mut self.services[last]
    }

    pub fn get_or_add_service(&mut self, kind: ServiceKind) -> &mut Service {
        match self.services.iter().position(|s| s.kind() == kind) {
            Some(idx) => &mut self.services[idx],
            None => self.add_service(kind),
        }
    }

    /// Cached value of a characteristic, searched across all services.
    pub fn characteristic_value(&self, kind: CharacteristicKind) -> Option<&CharacteristicValue> {
        self.services
            .iter()
            .find_map(|s| s.characteristic(kind))
            .and_then(|c| c.value())
    }

    /// Every `(characteristic, direction)` pair with a registered handler.
    pub fn bound_handlers(&self) -> Vec<(CharacteristicKind, Direction)> {
        let mut bound = Vec::new();
        for service in &self.services {
            for c in service.characteristics() {
                for direction in [Direction::Get, Direction::Set] {
                    if c.has_handler(direction) {
                        bound.push((c.kind(), direction));
                    }
                }
            }
        }
        bound
    }

    pub fn has_handler(&self, kind: CharacteristicKind, direction: Direction) -> bool {
        self.services
            .iter()
            .filter_map(|s| s.characteristic(kind))
            .any(|c| c.has_handler(direction))
    }
}

/// Shared handle to an accessory.
///
/// Every component working on the same accessory (reconciliation, binder,
/// handlers, host persistence) holds a clone of the same handle.
#[derive(Debug, Clone)]
pub struct AccessoryHandle {
    identity: AccessoryIdentity,
    inner: Arc<RwLock<PlatformAccessory>>,
}

impl AccessoryHandle {
    pub fn new(accessory: PlatformAccessory) -> Self {
        Self {
            identity: accessory.identity(),
            inner: Arc::new(RwLock::new(accessory)),
        }
    }

    pub fn identity(&self) -> AccessoryIdentity {
        self.identity
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, PlatformAccessory> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, PlatformAccessory> {
        self.inner.write().await
    }

    /// Clone of the current accessory state.
    pub async fn snapshot(&self) -> PlatformAccessory {
        self.inner.read().await.clone()
    }

    /// Whether both handles point at the same accessory record.
    pub fn ptr_eq(&self, other: &AccessoryHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{DeviceState, RemoteAlarmState};
    use crate::identity::derive_identity;

    fn panel_accessory() -> PlatformAccessory {
        let mut accessory = PlatformAccessory::new("Main Panel", derive_identity("P1"));
        accessory.context.device = Some(DeviceRecord::new(
            "P1",
            "Main Panel",
            DeviceKind::Panel,
            DeviceState::Alarm(RemoteAlarmState::Disarmed),
        ));
        accessory
    }

    #[test]
    fn test_new_accessory_has_information_service() {
        let accessory = PlatformAccessory::new("Hall", derive_identity("RF:1"));
        assert_eq!(accessory.services().len(), 1);
        assert!(accessory.get_service(ServiceKind::AccessoryInformation).is_some());
        assert!(accessory.device().is_none());
    }

    #[test]
    fn test_get_or_add_service_reuses() {
        let mut accessory = panel_accessory();
        accessory.get_or_add_service(ServiceKind::SecuritySystem);
        accessory.get_or_add_service(ServiceKind::SecuritySystem);
        assert_eq!(accessory.services().len(), 2);
    }

    #[test]
    fn test_bound_handlers() {
        let mut accessory = panel_accessory();
        let service = accessory.get_or_add_service(ServiceKind::SecuritySystem);
        service
            .characteristic_mut(CharacteristicKind::SecuritySystemCurrentState)
            .on_get();
        service
            .characteristic_mut(CharacteristicKind::SecuritySystemTargetState)
            .on_set();

        assert_eq!(
            accessory.bound_handlers(),
            vec![
                (CharacteristicKind::SecuritySystemCurrentState, Direction::Get),
                (CharacteristicKind::SecuritySystemTargetState, Direction::Set),
            ]
        );
        assert!(accessory.has_handler(CharacteristicKind::SecuritySystemTargetState, Direction::Set));
        assert!(!accessory.has_handler(CharacteristicKind::SecuritySystemTargetState, Direction::Get));
    }

    #[test]
    fn test_accessory_json_roundtrip_keeps_context() {
        let accessory = panel_accessory();
        let json = serde_json::to_value(&accessory).unwrap();
        assert_eq!(json["displayName"], "Main Panel");
        assert_eq!(json["context"]["device"]["type"], "panel");

        let restored: PlatformAccessory = serde_json::from_value(json).unwrap();
        assert_eq!(restored, accessory);
    }

    #[tokio::test]
    async fn test_handle_shares_state() {
        let handle = AccessoryHandle::new(panel_accessory());
        let other = handle.clone();
        other.write().await.context.device = None;
        assert!(handle.read().await.device().is_none());
        assert!(handle.ptr_eq(&other));
        assert!(!handle.ptr_eq(&AccessoryHandle::new(panel_accessory())));
        assert_eq!(handle.identity(), derive_identity("P1"));
    }
}
