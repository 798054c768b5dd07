// MIT License - Copyright (c) 2026 Peter Wright
// Normalized remote devices

pub mod lock;
pub mod panel;

pub use lock::RemoteLockCommand;
pub use panel::RemoteAlarmState;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of remote device kinds the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceKind {
    Panel,
    MotionSensor,
    ContactSensor,
    DoorLock,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 4] = [
        DeviceKind::Panel,
        DeviceKind::MotionSensor,
        DeviceKind::ContactSensor,
        DeviceKind::DoorLock,
    ];

    /// The type string used for model names and display names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Panel => "panel",
            Self::MotionSensor => "motionSensor",
            Self::ContactSensor => "contactSensor",
            Self::DoorLock => "doorLock",
        }
    }

}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensors share a numeric status space but read it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Motion,
    Contact,
}

/// Raw remote state of a device. Panels report an arm state, every other
/// kind reports a numeric status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceState {
    Alarm(RemoteAlarmState),
    Status(i64),
}

impl DeviceState {
    pub fn alarm_state(&self) -> Option<RemoteAlarmState> {
        match self {
            Self::Alarm(state) => Some(*state),
            Self::Status(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::Status(code) => Some(*code),
            Self::Alarm(_) => None,
        }
    }
}

/// Normalized, transient view of one remote device.
///
/// Built fresh on every catalog fetch. The only place a record outlives its
/// fetch cycle is the `context.device` snapshot of an accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub identifier: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub state: DeviceState,
}

impl DeviceRecord {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        kind: DeviceKind,
        state: DeviceState,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_type_strings() {
        assert_eq!(DeviceKind::MotionSensor.to_string(), "motionSensor");
        assert_eq!(DeviceKind::DoorLock.as_str(), "doorLock");
    }

    #[test]
    fn test_record_json_shape() {
        let panel = DeviceRecord::new(
            "P1",
            "Main Panel",
            DeviceKind::Panel,
            DeviceState::Alarm(RemoteAlarmState::Armed),
        );
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "identifier": "P1",
                "name": "Main Panel",
                "type": "panel",
                "state": "Armed",
            })
        );

        let sensor: DeviceRecord = serde_json::from_value(serde_json::json!({
            "identifier": "RF:0011",
            "name": "Hallway",
            "type": "motionSensor",
            "state": 1,
        }))
        .unwrap();
        assert_eq!(sensor.kind, DeviceKind::MotionSensor);
        assert_eq!(sensor.state.status_code(), Some(1));
        assert_eq!(sensor.state.alarm_state(), None);
    }
}
