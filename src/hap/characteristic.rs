// MIT License - Copyright (c) 2026 Peter Wright
// Host characteristics and their value vocabularies

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Characteristics the bridge reads or writes on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacteristicKind {
    Manufacturer,
    Model,
    SerialNumber,
    Name,
    SecuritySystemCurrentState,
    SecuritySystemTargetState,
    MotionDetected,
    ContactSensorState,
    LockCurrentState,
    LockTargetState,
}

impl CharacteristicKind {
    pub const ALL: [CharacteristicKind; 10] = [
        CharacteristicKind::Manufacturer,
        CharacteristicKind::Model,
        CharacteristicKind::SerialNumber,
        CharacteristicKind::Name,
        CharacteristicKind::SecuritySystemCurrentState,
        CharacteristicKind::SecuritySystemTargetState,
        CharacteristicKind::MotionDetected,
        CharacteristicKind::ContactSensorState,
        CharacteristicKind::LockCurrentState,
        CharacteristicKind::LockTargetState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturer => "Manufacturer",
            Self::Model => "Model",
            Self::SerialNumber => "SerialNumber",
            Self::Name => "Name",
            Self::SecuritySystemCurrentState => "SecuritySystemCurrentState",
            Self::SecuritySystemTargetState => "SecuritySystemTargetState",
            Self::MotionDetected => "MotionDetected",
            Self::ContactSensorState => "ContactSensorState",
            Self::LockCurrentState => "LockCurrentState",
            Self::LockTargetState => "LockTargetState",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A characteristic value as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(u8),
    Text(String),
}

impl CharacteristicValue {
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(v) => Some(*v != 0),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(v: u8) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

bitflags! {
    /// Handlers registered on a characteristic.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HandlerFlags: u8 {
        /// Host reads are routed to the bridge
        const GET = 0b01;
        /// Host writes are routed to the bridge
        const SET = 0b10;
    }
}

/// Direction of a host-initiated characteristic call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Get,
    Set,
}

impl Direction {
    pub fn flag(&self) -> HandlerFlags {
        match self {
            Self::Get => HandlerFlags::GET,
            Self::Set => HandlerFlags::SET,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

/// A single typed value on a service, with its registered handlers.
///
/// Handlers are runtime registrations and are never persisted; a cached
/// accessory comes back with its last values but without handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    kind: CharacteristicKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<CharacteristicValue>,
    #[serde(skip, default = "HandlerFlags::empty")]
    handlers: HandlerFlags,
}

impl Characteristic {
    pub fn new(kind: CharacteristicKind) -> Self {
        Self {
            kind,
            value: None,
            handlers: HandlerFlags::empty(),
        }
    }

    pub fn kind(&self) -> CharacteristicKind {
        self.kind
    }

    pub fn value(&self) -> Option<&CharacteristicValue> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: impl Into<CharacteristicValue>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// Push a value out-of-band. Returns true if the cached value changed.
    pub fn update_value(&mut self, value: impl Into<CharacteristicValue>) -> bool {
        let value = value.into();
        let changed = self.value.as_ref() != Some(&value);
        self.value = Some(value);
        changed
    }

    /// Register a getter. Registering twice is a no-op.
    pub fn on_get(&mut self) -> &mut Self {
        self.handlers.insert(HandlerFlags::GET);
        self
    }

    /// Register a setter. Registering twice is a no-op.
    pub fn on_set(&mut self) -> &mut Self {
        self.handlers.insert(HandlerFlags::SET);
        self
    }

    pub fn has_handler(&self, direction: Direction) -> bool {
        self.handlers.contains(direction.flag())
    }
}

/// Current state of a security system as shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecuritySystemCurrentState {
    StayArm,
    AwayArm,
    NightArm,
    Disarmed,
    AlarmTriggered,
}

impl SecuritySystemCurrentState {
    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::StayArm),
            1 => Some(Self::AwayArm),
            2 => Some(Self::NightArm),
            3 => Some(Self::Disarmed),
            4 => Some(Self::AlarmTriggered),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::StayArm => 0,
            Self::AwayArm => 1,
            Self::NightArm => 2,
            Self::Disarmed => 3,
            Self::AlarmTriggered => 4,
        }
    }
}

/// Target state of a security system as requested by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecuritySystemTargetState {
    StayArm,
    AwayArm,
    NightArm,
    Disarm,
}

impl SecuritySystemTargetState {
    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::StayArm),
            1 => Some(Self::AwayArm),
            2 => Some(Self::NightArm),
            3 => Some(Self::Disarm),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::StayArm => 0,
            Self::AwayArm => 1,
            Self::NightArm => 2,
            Self::Disarm => 3,
        }
    }
}

/// Current state of a lock mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockCurrentState {
    Unsecured,
    Secured,
    Jammed,
    Unknown,
}

impl LockCurrentState {
    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unsecured),
            1 => Some(Self::Secured),
            2 => Some(Self::Jammed),
            3 => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::Unsecured => 0,
            Self::Secured => 1,
            Self::Jammed => 2,
            Self::Unknown => 3,
        }
    }
}

/// Target state of a lock mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTargetState {
    Unsecured,
    Secured,
}

impl LockTargetState {
    pub fn from_value(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Unsecured),
            1 => Some(Self::Secured),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        match self {
            Self::Unsecured => 0,
            Self::Secured => 1,
        }
    }
}

/// State of a contact sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactSensorState {
    ContactDetected,
    ContactNotDetected,
}

impl ContactSensorState {
    pub fn value(&self) -> u8 {
        match self {
            Self::ContactDetected => 0,
            Self::ContactNotDetected => 1,
        }
    }
}

impl From<SecuritySystemCurrentState> for CharacteristicValue {
    fn from(state: SecuritySystemCurrentState) -> Self {
        Self::Int(state.value())
    }
}

impl From<SecuritySystemTargetState> for CharacteristicValue {
    fn from(state: SecuritySystemTargetState) -> Self {
        Self::Int(state.value())
    }
}

impl From<LockCurrentState> for CharacteristicValue {
    fn from(state: LockCurrentState) -> Self {
        Self::Int(state.value())
    }
}

impl From<LockTargetState> for CharacteristicValue {
    fn from(state: LockTargetState) -> Self {
        Self::Int(state.value())
    }
}

impl From<ContactSensorState> for CharacteristicValue {
    fn from(state: ContactSensorState) -> Self {
        Self::Int(state.value())
    }
}
