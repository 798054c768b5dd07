// MIT License - Copyright (c) 2026 Peter Wright
// Remote panel arm states

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MODE_ARM, MODE_DISARM, MODE_HOME};

/// Arm state of the remote panel.
///
/// The remote has a single partial-arm mode (`Home`); there is no separate
/// night mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteAlarmState {
    /// Fully armed (away)
    Armed,
    /// Disarmed
    Disarmed,
    /// Partially armed (home)
    Home,
}

impl RemoteAlarmState {
    /// Parse a panel mode as reported by the API ("arm", "home", "disarm").
    pub fn from_mode(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            MODE_ARM => Some(Self::Armed),
            MODE_HOME => Some(Self::Home),
            MODE_DISARM => Some(Self::Disarmed),
            _ => None,
        }
    }

    /// The mode string sent to the API to enter this state.
    pub fn as_mode(&self) -> &'static str {
        match self {
            Self::Armed => MODE_ARM,
            Self::Home => MODE_HOME,
            Self::Disarmed => MODE_DISARM,
        }
    }
}

impl fmt::Display for RemoteAlarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Armed => "Armed",
            Self::Disarmed => "Disarmed",
            Self::Home => "Home",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mode() {
        assert_eq!(RemoteAlarmState::from_mode("arm"), Some(RemoteAlarmState::Armed));
        assert_eq!(RemoteAlarmState::from_mode("HOME"), Some(RemoteAlarmState::Home));
        assert_eq!(RemoteAlarmState::from_mode("disarm"), Some(RemoteAlarmState::Disarmed));
        assert_eq!(RemoteAlarmState::from_mode("night"), None);
        assert_eq!(RemoteAlarmState::from_mode(""), None);
    }

    #[test]
    fn test_mode_strings() {
        for state in [RemoteAlarmState::Armed, RemoteAlarmState::Home, RemoteAlarmState::Disarmed] {
            assert_eq!(RemoteAlarmState::from_mode(state.as_mode()), Some(state));
        }
    }
}
