// MIT License - Copyright (c) 2026 Peter Wright
// Yale Sync API payloads

use serde::Deserialize;

use crate::constants::{
    DEVICE_TYPE_CONTACT, DEVICE_TYPE_LOCK, DEVICE_TYPE_PIR, STATUS_CODE_CONTACT_CLOSED,
    STATUS_CODE_CONTACT_OPEN, STATUS_CODE_MOTION, STATUS_CODE_NO_MOTION, STATUS_CODE_SECURED,
    STATUS_CODE_UNSECURED, STATUS_CONTACT_OPEN, STATUS_LOCKED, STATUS_PIR_TRIGGERED,
};
use crate::devices::DeviceKind;

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Every API response wraps its payload in `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelInfo {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelMode {
    pub mode: String,
}

/// One entry of `device_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatus {
    #[serde(deserialize_with = "string_or_number")]
    pub device_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub status1: String,
}

impl DeviceStatus {
    /// Device kind for a reported type; keypads, sirens etc. have none.
    pub fn kind(&self) -> Option<DeviceKind> {
        match self.device_type.as_str() {
            DEVICE_TYPE_PIR => Some(DeviceKind::MotionSensor),
            DEVICE_TYPE_CONTACT => Some(DeviceKind::ContactSensor),
            DEVICE_TYPE_LOCK => Some(DeviceKind::DoorLock),
            _ => None,
        }
    }

    /// Numeric status code for the device's kind.
    pub fn status_code(&self) -> Option<i64> {
        let status = self.status1.as_str();
        let code = match self.kind()? {
            DeviceKind::ContactSensor if status.contains(STATUS_CONTACT_OPEN) => {
                STATUS_CODE_CONTACT_OPEN
            }
            DeviceKind::ContactSensor => STATUS_CODE_CONTACT_CLOSED,
            DeviceKind::MotionSensor if status.contains(STATUS_PIR_TRIGGERED) => STATUS_CODE_MOTION,
            DeviceKind::MotionSensor => STATUS_CODE_NO_MOTION,
            DeviceKind::DoorLock if is_locked(status) => STATUS_CODE_SECURED,
            DeviceKind::DoorLock => STATUS_CODE_UNSECURED,
            DeviceKind::Panel => return None,
        };
        Some(code)
    }
}

// `status1` may list several flags, e.g. "device_status.lock, device_status.dc_close"
fn is_locked(status: &str) -> bool {
    status
        .split(|c: char| c == ',' || c.is_whitespace())
        .any(|flag| flag == STATUS_LOCKED)
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(device_type: &str, status1: &str) -> DeviceStatus {
        DeviceStatus {
            device_id: "RF:1".to_string(),
            name: "Device".to_string(),
            device_type: device_type.to_string(),
            status1: status1.to_string(),
        }
    }

    #[test]
    fn test_contact_normalization() {
        assert_eq!(status(DEVICE_TYPE_CONTACT, "device_status.dc_open").status_code(), Some(0));
        assert_eq!(status(DEVICE_TYPE_CONTACT, "device_status.dc_close").status_code(), Some(1));
        assert_eq!(status(DEVICE_TYPE_CONTACT, "").status_code(), Some(1));
    }

    #[test]
    fn test_pir_normalization() {
        assert_eq!(status(DEVICE_TYPE_PIR, "device_status.pir_triggered").status_code(), Some(1));
        assert_eq!(status(DEVICE_TYPE_PIR, "").status_code(), Some(0));
    }

    #[test]
    fn test_lock_normalization() {
        assert_eq!(status(DEVICE_TYPE_LOCK, "device_status.lock").status_code(), Some(0));
        assert_eq!(
            status(DEVICE_TYPE_LOCK, "device_status.lock, device_status.dc_close").status_code(),
            Some(0)
        );
        assert_eq!(status(DEVICE_TYPE_LOCK, "device_status.unlock").status_code(), Some(1));
    }

    #[test]
    fn test_unknown_type() {
        let keypad = status("device_type.keypad", "");
        assert_eq!(keypad.kind(), None);
        assert_eq!(keypad.status_code(), None);
    }

    #[test]
    fn test_numeric_device_id() {
        let status: DeviceStatus = serde_json::from_value(serde_json::json!({
            "device_id": 1234,
            "name": "Hall",
            "type": "device_type.pir",
            "status1": "",
        }))
        .unwrap();
        assert_eq!(status.device_id, "1234");
    }
}
