// MIT License - Copyright (c) 2026 Peter Wright
// Per-accessory characteristic handlers

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::HomeModePolicy;
use crate::devices::{DeviceKind, DeviceState, SensorKind};
use crate::error::{BridgeError, Result};
use crate::event::{BridgeEvent, EventSender};
use crate::hap::{
    AccessoryHandle, CharacteristicKind, CharacteristicValue, ContactSensorState, Direction,
    LockCurrentState, LockTargetState, SecuritySystemCurrentState, SecuritySystemTargetState,
    ServiceKind,
};
use crate::identity::AccessoryIdentity;
use crate::remote::{AlarmService, RemoteDeviceMap};
use crate::translate;

/// Routes host get/set calls on one accessory to the remote service.
///
/// Every call translates between the host and remote vocabularies. Remote
/// failures never reach the host: a failed read answers with the last known
/// value and a failed command is logged and leaves the state as it was.
#[derive(Clone)]
pub struct AccessoryHandler {
    service: Arc<dyn AlarmService>,
    handle: AccessoryHandle,
    kind: DeviceKind,
    identifier: String,
    policy: HomeModePolicy,
    events: EventSender,
}

impl AccessoryHandler {
    pub fn new(
        service: Arc<dyn AlarmService>,
        handle: AccessoryHandle,
        kind: DeviceKind,
        identifier: impl Into<String>,
        policy: HomeModePolicy,
        events: EventSender,
    ) -> Self {
        Self {
            service,
            handle,
            kind,
            identifier: identifier.into(),
            policy,
            events,
        }
    }

    pub fn identity(&self) -> AccessoryIdentity {
        self.handle.identity()
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn handle(&self) -> &AccessoryHandle {
        &self.handle
    }

    /// Fill the state characteristics from the cached device snapshot, so a
    /// freshly bound accessory has values before the first remote read.
    pub async fn seed_from_snapshot(&self) {
        let mut accessory = self.handle.write().await;
        let Some(state) = accessory.device().map(|d| d.state) else {
            return;
        };
        let service = accessory.get_or_add_service(ServiceKind::for_device(self.kind));
        for characteristic in state_characteristics(self.kind) {
            if let Some(value) = host_value(self.kind, *characteristic, state, self.policy) {
                service.characteristic_mut(*characteristic).set_value(value);
            }
        }
    }

    /// Answer a host read of `characteristic`.
    ///
    /// Awaits the remote and returns its translated value. If the remote call
    /// fails, the last cached value is returned instead, then the value derived
    /// from the device snapshot, then the characteristic's default.
    pub async fn handle_get(&self, characteristic: CharacteristicKind) -> Result<CharacteristicValue> {
        self.ensure_bound(characteristic, Direction::Get).await?;

        match self.fetch_live(characteristic).await {
            Ok(value) => {
                debug!(
                    "Get {} on {}: {}",
                    characteristic, self.identifier, value
                );
                self.push(characteristic, value.clone(), false).await;
                Ok(value)
            }
            Err(e) => {
                warn!(
                    "Failed to read {} for {}, using cached value: {}",
                    characteristic, self.identifier, e
                );
                Ok(self.cached_value(characteristic).await)
            }
        }
    }

    /// Apply a host write of `characteristic`.
    ///
    /// Sends the translated command to the remote; once the remote accepts it,
    /// the resulting current state is pushed to the host. A rejected command is
    /// logged and nothing is pushed.
    pub async fn handle_set(
        &self,
        characteristic: CharacteristicKind,
        value: CharacteristicValue,
    ) -> Result<()> {
        self.ensure_bound(characteristic, Direction::Set).await?;
        let raw = value.as_u8().ok_or_else(|| BridgeError::InvalidValue {
            characteristic,
            value: value.to_string(),
        })?;

        match characteristic {
            CharacteristicKind::SecuritySystemTargetState => {
                let target = translate::host_target_value_to_remote_alarm(raw);
                info!("Setting panel state: {} ({})", target, raw);
                match self.service.command_panel_state(target).await {
                    Ok(()) => {
                        let current = translate::remote_alarm_to_host_current(target, self.policy);
                        let shown = translate::remote_alarm_to_host_target(target, self.policy);
                        self.push(CharacteristicKind::SecuritySystemTargetState, shown.into(), false)
                            .await;
                        self.push(CharacteristicKind::SecuritySystemCurrentState, current.into(), true)
                            .await;
                    }
                    Err(e) => error!("Failed to set panel state to {}: {}", target, e),
                }
            }
            CharacteristicKind::LockTargetState => {
                let command = translate::host_target_value_to_remote_lock(raw);
                info!("Setting lock state of {}: {} ({})", self.identifier, command, raw);
                match self.service.command_door_lock(&self.identifier, command).await {
                    Ok(code) => {
                        let current = translate::remote_lock_status_to_host_current(code);
                        let target = LockTargetState::from_value(raw).unwrap_or(LockTargetState::Unsecured);
                        self.push(CharacteristicKind::LockTargetState, target.into(), false)
                            .await;
                        self.push(CharacteristicKind::LockCurrentState, current.into(), true)
                            .await;
                    }
                    Err(e) => error!("Failed to set {} to {}: {}", self.identifier, command, e),
                }
            }
            other => {
                return Err(BridgeError::HandlerNotBound {
                    characteristic: other,
                    direction: Direction::Set.as_str(),
                });
            }
        }
        Ok(())
    }

    /// Push a freshly fetched remote state to every state characteristic,
    /// broadcasting the ones that changed.
    pub async fn apply_remote_state(&self, state: DeviceState) {
        for characteristic in state_characteristics(self.kind) {
            if let Some(value) = host_value(self.kind, *characteristic, state, self.policy) {
                self.push(*characteristic, value, false).await;
            }
        }
    }

    async fn ensure_bound(&self, characteristic: CharacteristicKind, direction: Direction) -> Result<()> {
        if self.handle.read().await.has_handler(characteristic, direction) {
            Ok(())
        } else {
            Err(BridgeError::HandlerNotBound {
                characteristic,
                direction: direction.as_str(),
            })
        }
    }

    async fn fetch_live(&self, characteristic: CharacteristicKind) -> Result<CharacteristicValue> {
        let state = match self.kind {
            DeviceKind::Panel => DeviceState::Alarm(self.service.query_panel_state().await?),
            DeviceKind::MotionSensor => {
                self.status_in(self.service.fetch_motion_sensors().await?)?
            }
            DeviceKind::ContactSensor => {
                self.status_in(self.service.fetch_contact_sensors().await?)?
            }
            DeviceKind::DoorLock => {
                let locks = self.service.query_door_locks().await?;
                let code = locks.get(&self.identifier).copied().ok_or_else(|| {
                    BridgeError::UnknownDevice {
                        identifier: self.identifier.clone(),
                    }
                })?;
                DeviceState::Status(code)
            }
        };
        host_value(self.kind, characteristic, state, self.policy).ok_or_else(|| {
            BridgeError::InvalidResponse {
                details: format!("state {:?} does not fit {}", state, self.kind),
            }
        })
    }

    fn status_in(&self, devices: RemoteDeviceMap) -> Result<DeviceState> {
        devices
            .into_values()
            .find(|d| d.identifier == self.identifier)
            .map(|d| d.state)
            .ok_or_else(|| BridgeError::UnknownDevice {
                identifier: self.identifier.clone(),
            })
    }

    async fn cached_value(&self, characteristic: CharacteristicKind) -> CharacteristicValue {
        let accessory = self.handle.read().await;
        if let Some(value) = accessory.characteristic_value(characteristic) {
            return value.clone();
        }
        accessory
            .device()
            .and_then(|d| host_value(self.kind, characteristic, d.state, self.policy))
            .unwrap_or_else(|| default_value(characteristic))
    }

    /// Store `value` on the accessory and broadcast it when it changed, or
    /// unconditionally when `always` is set.
    async fn push(&self, characteristic: CharacteristicKind, value: CharacteristicValue, always: bool) {
        let changed = {
            let mut accessory = self.handle.write().await;
            accessory
                .get_or_add_service(ServiceKind::for_device(self.kind))
                .characteristic_mut(characteristic)
                .update_value(value.clone())
        };
        if changed || always {
            let _ = self.events.send(BridgeEvent::CharacteristicUpdated {
                identity: self.identity(),
                characteristic,
                value,
            });
        }
    }
}

/// Characteristics that carry remote state for a device kind.
pub fn state_characteristics(kind: DeviceKind) -> &'static [CharacteristicKind] {
    match kind {
        DeviceKind::Panel => &[
            CharacteristicKind::SecuritySystemCurrentState,
            CharacteristicKind::SecuritySystemTargetState,
        ],
        DeviceKind::MotionSensor => &[CharacteristicKind::MotionDetected],
        DeviceKind::ContactSensor => &[CharacteristicKind::ContactSensorState],
        DeviceKind::DoorLock => &[
            CharacteristicKind::LockCurrentState,
            CharacteristicKind::LockTargetState,
        ],
    }
}

/// Host value of `characteristic` for a remote `state`, if the pair makes sense.
pub fn host_value(
    kind: DeviceKind,
    characteristic: CharacteristicKind,
    state: DeviceState,
    policy: HomeModePolicy,
) -> Option<CharacteristicValue> {
    use CharacteristicKind as C;

    let value = match (kind, characteristic, state) {
        (DeviceKind::Panel, C::SecuritySystemCurrentState, DeviceState::Alarm(s)) => {
            translate::remote_alarm_to_host_current(s, policy).into()
        }
        (DeviceKind::Panel, C::SecuritySystemTargetState, DeviceState::Alarm(s)) => {
            translate::remote_alarm_to_host_target(s, policy).into()
        }
        (DeviceKind::MotionSensor, C::MotionDetected, DeviceState::Status(code)) => {
            let detected =
                translate::remote_sensor_status_to_host_detected(SensorKind::Motion, code);
            CharacteristicValue::Bool(detected)
        }
        (DeviceKind::ContactSensor, C::ContactSensorState, DeviceState::Status(code)) => {
            let detected =
                translate::remote_sensor_status_to_host_detected(SensorKind::Contact, code);
            translate::contact_sensor_state(detected).into()
        }
        (DeviceKind::DoorLock, C::LockCurrentState, DeviceState::Status(code)) => {
            translate::remote_lock_status_to_host_current(code).into()
        }
        (DeviceKind::DoorLock, C::LockTargetState, DeviceState::Status(code)) => {
            translate::remote_lock_status_to_host_target(code).into()
        }
        _ => return None,
    };
    Some(value)
}

/// Value answered when neither the remote nor any cache knows better.
pub fn default_value(characteristic: CharacteristicKind) -> CharacteristicValue {
    match characteristic {
        CharacteristicKind::SecuritySystemCurrentState => SecuritySystemCurrentState::Disarmed.into(),
        CharacteristicKind::SecuritySystemTargetState => SecuritySystemTargetState::Disarm.into(),
        CharacteristicKind::LockCurrentState => LockCurrentState::Unknown.into(),
        CharacteristicKind::LockTargetState => LockTargetState::Unsecured.into(),
        CharacteristicKind::MotionDetected => CharacteristicValue::Bool(false),
        CharacteristicKind::ContactSensorState => ContactSensorState::ContactDetected.into(),
        CharacteristicKind::Manufacturer
        | CharacteristicKind::Model
        | CharacteristicKind::SerialNumber
        | CharacteristicKind::Name => CharacteristicValue::Text(String::new()),
    }
}
