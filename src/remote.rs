// MIT License - Copyright (c) 2026 Peter Wright
// Remote alarm-service collaborator

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::devices::{DeviceKind, DeviceRecord, DeviceState, RemoteAlarmState, RemoteLockCommand};
use crate::error::Result;

/// A device as reported by the remote service, before the catalog assigns it
/// a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDevice {
    pub identifier: String,
    pub name: String,
    pub state: DeviceState,
}

impl RemoteDevice {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>, state: DeviceState) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            state,
        }
    }

    pub fn into_record(self, kind: DeviceKind) -> DeviceRecord {
        DeviceRecord::new(self.identifier, self.name, kind, self.state)
    }
}

/// Devices of one group, keyed by remote identifier.
pub type RemoteDeviceMap = BTreeMap<String, RemoteDevice>;

/// What the bridge needs from the remote alarm service.
///
/// A single session is shared by every handler; implementations must tolerate
/// overlapping calls.
#[async_trait]
pub trait AlarmService: Send + Sync {
    /// Establish a session.
    async fn authenticate(&self, username: &str, password: &str) -> Result<()>;

    /// Refresh cached remote state before discovery.
    async fn refresh_session_state(&self) -> Result<()>;

    /// The panel, if the account has one.
    async fn fetch_panel(&self) -> Result<Option<RemoteDevice>>;

    async fn fetch_motion_sensors(&self) -> Result<RemoteDeviceMap>;

    async fn fetch_contact_sensors(&self) -> Result<RemoteDeviceMap>;

    async fn fetch_door_locks(&self) -> Result<RemoteDeviceMap>;

    /// Current arm state, read live from the remote.
    async fn query_panel_state(&self) -> Result<RemoteAlarmState>;

    async fn command_panel_state(&self, state: RemoteAlarmState) -> Result<()>;

    /// Current lock status codes, read live from the remote.
    async fn query_door_locks(&self) -> Result<BTreeMap<String, i64>>;

    /// Send a lock command and return the lock's resulting status code.
    async fn command_door_lock(&self, identifier: &str, command: RemoteLockCommand) -> Result<i64>;
}
