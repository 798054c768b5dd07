// MIT License - Copyright (c) 2026 Peter Wright
// Capability binder

use tracing::debug;

use crate::constants::MANUFACTURER;
use crate::devices::DeviceKind;
use crate::hap::{AccessoryHandle, CharacteristicKind, Direction, ServiceKind};

/// Characteristic and direction pairs bound for each device kind.
pub fn capabilities(kind: DeviceKind) -> &'static [(CharacteristicKind, Direction)] {
    match kind {
        DeviceKind::Panel => &[
            (CharacteristicKind::SecuritySystemCurrentState, Direction::Get),
            (CharacteristicKind::SecuritySystemTargetState, Direction::Set),
        ],
        DeviceKind::MotionSensor => &[(CharacteristicKind::MotionDetected, Direction::Get)],
        DeviceKind::ContactSensor => &[(CharacteristicKind::ContactSensorState, Direction::Get)],
        DeviceKind::DoorLock => &[
            (CharacteristicKind::LockCurrentState, Direction::Get),
            (CharacteristicKind::LockTargetState, Direction::Set),
        ],
    }
}

/// Attach services and handlers to an accessory representing a `kind` device.
///
/// Safe to call again on the same accessory: existing services and
/// characteristics are reused and handler registration is idempotent.
pub async fn bind(handle: &AccessoryHandle, kind: DeviceKind) {
    let mut accessory = handle.write().await;
    let identity = accessory.identity();
    let name = accessory
        .device()
        .map(|d| d.name.clone())
        .unwrap_or_else(|| accessory.display_name().to_string());

    accessory
        .get_or_add_service(ServiceKind::AccessoryInformation)
        .set_characteristic(CharacteristicKind::Manufacturer, MANUFACTURER)
        .set_characteristic(CharacteristicKind::Model, kind.as_str())
        .set_characteristic(CharacteristicKind::SerialNumber, identity.to_string());

    let service = accessory.get_or_add_service(ServiceKind::for_device(kind));
    service.set_characteristic(CharacteristicKind::Name, format!("{} {}", name, kind));

    for (characteristic, direction) in capabilities(kind) {
        let c = service.characteristic_mut(*characteristic);
        match direction {
            Direction::Get => c.on_get(),
            Direction::Set => c.on_set(),
        };
    }

    debug!("Bound {} as {} ({})", name, kind, identity);
}
