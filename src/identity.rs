// MIT License - Copyright (c) 2026 Peter Wright
// Accessory identity derivation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable matching key of an accessory.
///
/// A name-based (v5, SHA-1) UUID over the remote identifier: the same
/// identifier always yields the same identity, across runs and hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessoryIdentity(Uuid);

impl AccessoryIdentity {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccessoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for AccessoryIdentity {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Derive the identity of the accessory representing remote device `identifier`.
pub fn derive_identity(identifier: &str) -> AccessoryIdentity {
    AccessoryIdentity(Uuid::new_v5(&Uuid::NAMESPACE_OID, identifier.as_bytes()))
}
