// MIT License - Copyright (c) 2026 Peter Wright
// Host accessory model

pub mod accessory;
pub mod api;
pub mod characteristic;
pub mod service;

pub use accessory::{AccessoryContext, AccessoryHandle, PlatformAccessory};
pub use api::HostPlatform;
pub use characteristic::{
    Characteristic, CharacteristicKind, CharacteristicValue, ContactSensorState, Direction,
    HandlerFlags, LockCurrentState, LockTargetState, SecuritySystemCurrentState,
    SecuritySystemTargetState,
};
pub use service::{Service, ServiceKind};
