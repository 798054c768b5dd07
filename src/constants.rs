// MIT License - Copyright (c) 2026 Peter Wright
// Platform identifiers and Yale Sync API vocabulary

/// Name the platform registers under with the host.
pub const PLATFORM_NAME: &str = "YaleSyncAlarm";

/// Plugin identifier the platform registers under with the host.
pub const PLUGIN_NAME: &str = "yale2mqtt";

/// Manufacturer reported on every accessory.
pub const MANUFACTURER: &str = "Yale";

/// Default base URL of the Yale Sync mobile API.
pub const DEFAULT_API_URL: &str = "https://mob.yalehomesystem.co.uk/yapi/";

/// API endpoints, relative to the base URL.
pub const TOKEN_PATH: &str = "o/token/";
pub const PANEL_INFO_PATH: &str = "api/panel/info/";
pub const PANEL_MODE_PATH: &str = "api/panel/mode/";
pub const DEVICE_STATUS_PATH: &str = "api/panel/device_status/";
pub const DEVICE_CONTROL_PATH: &str = "api/panel/device_control/";

/// Panel modes as spoken by the API.
pub const MODE_ARM: &str = "arm";
pub const MODE_HOME: &str = "home";
pub const MODE_DISARM: &str = "disarm";

/// Device type strings reported by `device_status`.
pub const DEVICE_TYPE_PIR: &str = "device_type.pir";
pub const DEVICE_TYPE_CONTACT: &str = "device_type.door_contact";
pub const DEVICE_TYPE_LOCK: &str = "device_type.door_lock";

/// Device status strings reported in `status1`.
pub const STATUS_CONTACT_OPEN: &str = "device_status.dc_open";
pub const STATUS_PIR_TRIGGERED: &str = "device_status.pir_triggered";
pub const STATUS_LOCKED: &str = "device_status.lock";

/// `request_value` for `device_control` on a door lock.
pub const LOCK_REQUEST_LOCK: &str = "1";
pub const LOCK_REQUEST_UNLOCK: &str = "2";

/// Numeric status codes after normalization.
///
/// Locks: `0` is the secured class. Contact sensors: `0` means the contact is
/// open. Motion sensors: `1` means motion was detected.
pub const STATUS_CODE_SECURED: i64 = 0;
pub const STATUS_CODE_UNSECURED: i64 = 1;
pub const STATUS_CODE_CONTACT_OPEN: i64 = 0;
pub const STATUS_CODE_CONTACT_CLOSED: i64 = 1;
pub const STATUS_CODE_MOTION: i64 = 1;
pub const STATUS_CODE_NO_MOTION: i64 = 0;
