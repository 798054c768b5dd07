// MIT License - Copyright (c) 2026 Peter Wright
// Host services

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::devices::DeviceKind;
use crate::hap::characteristic::{Characteristic, CharacteristicKind, CharacteristicValue};

/// Named groups of characteristics an accessory can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    AccessoryInformation,
    SecuritySystem,
    MotionSensor,
    ContactSensor,
    LockMechanism,
}

impl ServiceKind {
    /// The primary service representing a device of the given kind.
    pub fn for_device(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Panel => Self::SecuritySystem,
            DeviceKind::MotionSensor => Self::MotionSensor,
            DeviceKind::ContactSensor => Self::ContactSensor,
            DeviceKind::DoorLock => Self::LockMechanism,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    kind: ServiceKind,
    #[serde(default)]
    characteristics: Vec<Characteristic>,
}

impl Service {
    pub fn new(kind: ServiceKind) -> Self {
        Self {
            kind,
            characteristics: Vec::new(),
        }
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    pub fn characteristic(&self, kind: CharacteristicKind) -> Option<&Characteristic> {
        self.characteristics.iter().find(|c| c.kind() == kind)
    }

    /// Get a characteristic, adding it first if the service does not have it yet.
    pub fn characteristic_mut(&mut self, kind: CharacteristicKind) -> &mut Characteristic {
        match self.characteristics.iter().position(|c| c.kind() == kind) {
            Some(idx) => &mut self.characteristics[idx],
            None => {
                self.characteristics.push(Characteristic::new(kind));
                let last = self.characteristics.len() - 1;
                &mut self.characteristics[last]
            }
        }
    }

    pub fn set_characteristic(
        &mut self,
        kind: CharacteristicKind,
        value: impl Into<CharacteristicValue>,
    ) -> &mut Self {
        self.characteristic_mut(kind).set_value(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characteristic_get_or_add() {
        let mut service = Service::new(ServiceKind::AccessoryInformation);
        service
            .set_characteristic(CharacteristicKind::Manufacturer, "Yale")
            .set_characteristic(CharacteristicKind::Model, "panel");
        service.set_characteristic(CharacteristicKind::Manufacturer, "Yale");

        assert_eq!(service.characteristics().len(), 2);
        assert_eq!(
            service
                .characteristic(CharacteristicKind::Model)
                .and_then(|c| c.value())
                .and_then(|v| v.as_text()),
            Some("panel")
        );
    }

    #[test]
    fn test_service_for_device() {
        assert_eq!(ServiceKind::for_device(DeviceKind::Panel), ServiceKind::SecuritySystem);
        assert_eq!(ServiceKind::for_device(DeviceKind::DoorLock), ServiceKind::LockMechanism);
        assert_eq!(ServiceKind::for_device(DeviceKind::MotionSensor), ServiceKind::MotionSensor);
        assert_eq!(ServiceKind::for_device(DeviceKind::ContactSensor), ServiceKind::ContactSensor);
    }
}
