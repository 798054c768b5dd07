// MIT License - Copyright (c) 2026 Peter Wright
// Remote door lock commands

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{LOCK_REQUEST_LOCK, LOCK_REQUEST_UNLOCK, STATUS_CODE_SECURED};

/// Command sent to a remote door lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteLockCommand {
    Locked,
    Unlocked,
}

impl RemoteLockCommand {
    /// `request_value` for the device control endpoint.
    pub fn request_value(&self) -> &'static str {
        match self {
            Self::Locked => LOCK_REQUEST_LOCK,
            Self::Unlocked => LOCK_REQUEST_UNLOCK,
        }
    }
}

impl fmt::Display for RemoteLockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("locked"),
            Self::Unlocked => f.write_str("unlocked"),
        }
    }
}

/// Whether a lock status code is in the secured class.
pub fn is_secured_status(code: i64) -> bool {
    code == STATUS_CODE_SECURED
}
