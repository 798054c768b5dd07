// MIT License - Copyright (c) 2026 Peter Wright
// Bridge events

use crate::devices::DeviceKind;
use crate::hap::{CharacteristicKind, CharacteristicValue};
use crate::identity::AccessoryIdentity;

/// All events that can be emitted by the platform.
///
/// Users subscribe via `platform.subscribe()` to receive a
/// `tokio::sync::broadcast::Receiver<BridgeEvent>`.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// A new accessory was created and registered with the host
    AccessoryRegistered {
        identity: AccessoryIdentity,
        name: String,
        kind: DeviceKind,
    },
    /// A cached accessory was matched to a reported device and bound again
    AccessoryRestored {
        identity: AccessoryIdentity,
        name: String,
        kind: DeviceKind,
    },
    /// An accessory was unregistered because its device is gone
    AccessoryRemoved { identity: AccessoryIdentity },
    /// A characteristic value changed, either from a command or a refresh
    CharacteristicUpdated {
        identity: AccessoryIdentity,
        characteristic: CharacteristicKind,
        value: CharacteristicValue,
    },
    /// A discovery pass finished
    DiscoveryComplete {
        registered: usize,
        restored: usize,
        removed: usize,
    },
}

/// Type alias for the broadcast sender.
pub type EventSender = tokio::sync::broadcast::Sender<BridgeEvent>;

/// Type alias for the broadcast receiver.
pub type EventReceiver = tokio::sync::broadcast::Receiver<BridgeEvent>;

/// Create a new event channel with the given capacity.
pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    tokio::sync::broadcast::channel(capacity)
}
