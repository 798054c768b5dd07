// MIT License - Copyright (c) 2026 Peter Wright
// Bridge configuration

use crate::constants::DEFAULT_API_URL;

/// How the remote `Home` arm state is presented to the host.
///
/// The remote panel has a single partial-arm mode; the host distinguishes
/// "stay" from "night". One canonical mapping is picked here and used for
/// every translation towards the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeModePolicy {
    /// `Home` is shown as STAY_ARM
    #[default]
    StayArm,
    /// `Home` is shown as NIGHT_ARM
    NightArm,
}

impl HomeModePolicy {
    /// Parse a policy name from configuration ("stay" or "night").
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stay" | "stay_arm" => Some(Self::StayArm),
            "night" | "night_arm" => Some(Self::NightArm),
            _ => None,
        }
    }
}

/// Configuration for the Yale Sync platform.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Display name of the platform instance
    pub name: String,
    /// Yale account user name
    pub username: String,
    /// Yale account password
    pub password: String,
    /// Base URL of the Yale Sync API
    pub api_url: String,
    /// Basic-auth token identifying the API client on token requests
    pub client_token: String,
    /// Panel area addressed by mode and device commands (default: 1)
    pub area: u8,
    /// PIN code sent with door lock commands, when the lock needs one
    pub door_lock_pincode: Option<String>,
    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,
    /// Host presentation of the remote `Home` mode
    pub home_mode: HomeModePolicy,
    /// Interval between pull refreshes of remote state, in seconds (default: 60)
    pub refresh_interval_secs: u64,
    /// Overwrite the cached device snapshot of restored accessories on discovery
    pub refresh_cached_context: bool,
    /// Unregister accessories whose device is no longer reported by the remote
    pub prune_missing: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            name: "Yale Sync Alarm".to_string(),
            username: String::new(),
            password: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            client_token: String::new(),
            area: 1,
            door_lock_pincode: None,
            request_timeout_secs: 10,
            home_mode: HomeModePolicy::StayArm,
            refresh_interval_secs: 60,
            refresh_cached_context: false,
            prune_missing: false,
        }
    }
}

impl BridgeConfig {
    /// Create a new config builder starting from defaults.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }
}

/// Builder for BridgeConfig.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn client_token(mut self, token: impl Into<String>) -> Self {
        self.config.client_token = token.into();
        self
    }

    pub fn area(mut self, area: u8) -> Self {
        self.config.area = area;
        self
    }

    pub fn door_lock_pincode(mut self, pincode: Option<String>) -> Self {
        self.config.door_lock_pincode = pincode;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn home_mode(mut self, policy: HomeModePolicy) -> Self {
        self.config.home_mode = policy;
        self
    }

    pub fn refresh_interval_secs(mut self, secs: u64) -> Self {
        self.config.refresh_interval_secs = secs;
        self
    }

    pub fn refresh_cached_context(mut self, refresh: bool) -> Self {
        self.config.refresh_cached_context = refresh;
        self
    }

    pub fn prune_missing(mut self, prune: bool) -> Self {
        self.config.prune_missing = prune;
        self
    }

    pub fn build(self) -> BridgeConfig {
        self.config
    }
}
