// MIT License - Copyright (c) 2026 Peter Wright
// Yale Sync HTTP client

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::config::BridgeConfig;
use crate::constants::{
    DEVICE_CONTROL_PATH, DEVICE_STATUS_PATH, PANEL_INFO_PATH, PANEL_MODE_PATH, TOKEN_PATH,
};
use crate::devices::{DeviceKind, DeviceState, RemoteAlarmState, RemoteLockCommand};
use crate::error::{BridgeError, Result};
use crate::remote::{AlarmService, RemoteDevice, RemoteDeviceMap};
use crate::yale::model::{DeviceStatus, Envelope, PanelInfo, PanelMode, TokenResponse};

/// Client for the Yale Sync mobile API.
///
/// Holds a single access token shared by all callers. A 401 from any call
/// drops the token, so the next call fails with
/// [`BridgeError::NotAuthenticated`] until [`authenticate`](AlarmService::authenticate)
/// runs again.
pub struct YaleClient {
    http: reqwest::Client,
    base_url: Url,
    client_token: String,
    area: u8,
    door_lock_pincode: Option<String>,
    access_token: RwLock<Option<String>>,
    panel_info: RwLock<Option<PanelInfo>>,
}

impl YaleClient {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let base = if config.api_url.ends_with('/') {
            config.api_url.clone()
        } else {
            format!("{}/", config.api_url)
        };

        Ok(Self {
            http,
            base_url: Url::parse(&base)?,
            client_token: config.client_token.clone(),
            area: config.area,
            door_lock_pincode: config.door_lock_pincode.clone(),
            access_token: RwLock::new(None),
            panel_info: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn is_authenticated(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    async fn token(&self) -> Result<String> {
        self.access_token
            .read()
            .await
            .clone()
            .ok_or(BridgeError::NotAuthenticated)
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        action: &str,
    ) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Yale Sync rejected the session during {}", action);
            *self.access_token.write().await = None;
        }

        Err(BridgeError::Api {
            action: action.to_string(),
            status: status.as_u16(),
            details: body.trim().to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint_url(path)?;
        let action = format!("GET {path}");
        debug!("{}", action);
        let response = self.http.get(url).bearer_auth(self.token().await?).send().await?;
        let response = self.check_status(response, &action).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<()> {
        let url = self.endpoint_url(path)?;
        let action = format!("POST {path}");
        debug!("{}", action);
        let response = self
            .http
            .post(url)
            .bearer_auth(self.token().await?)
            .form(form)
            .send()
            .await?;
        self.check_status(response, &action).await?;
        Ok(())
    }

    async fn panel_info(&self) -> Result<PanelInfo> {
        if let Some(info) = self.panel_info.read().await.clone() {
            return Ok(info);
        }
        let info: PanelInfo = self.get(PANEL_INFO_PATH).await?;
        *self.panel_info.write().await = Some(info.clone());
        Ok(info)
    }

    async fn device_status(&self) -> Result<Vec<DeviceStatus>> {
        self.get(DEVICE_STATUS_PATH).await
    }

    async fn devices_of(&self, kind: DeviceKind) -> Result<RemoteDeviceMap> {
        let devices = self
            .device_status()
            .await?
            .into_iter()
            .filter(|d| d.kind() == Some(kind))
            .filter_map(|d| {
                let code = d.status_code()?;
                Some((
                    d.device_id.clone(),
                    RemoteDevice::new(d.device_id, d.name, DeviceState::Status(code)),
                ))
            })
            .collect();
        Ok(devices)
    }
}

#[async_trait]
impl AlarmService for YaleClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoint_url(TOKEN_PATH)?;
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Basic {}", self.client_token))
            .form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Authentication {
                reason: format!("{status} {}", body.trim()),
            });
        }

        let token: TokenResponse = response.json().await?;
        if token.access_token.is_empty() {
            return Err(BridgeError::Authentication {
                reason: "empty access token".to_string(),
            });
        }
        debug!("Received access token (expires in {:?}s)", token.expires_in);
        *self.access_token.write().await = Some(token.access_token);
        Ok(())
    }

    async fn refresh_session_state(&self) -> Result<()> {
        let info: PanelInfo = self.get(PANEL_INFO_PATH).await?;
        debug!("Yale panel: {} ({})", info.name, info.mac);
        *self.panel_info.write().await = Some(info);
        Ok(())
    }

    async fn fetch_panel(&self) -> Result<Option<RemoteDevice>> {
        let info = self.panel_info().await?;
        if info.mac.is_empty() {
            return Ok(None);
        }
        let state = self.query_panel_state().await?;
        let name = if info.name.is_empty() {
            "Panel".to_string()
        } else {
            info.name
        };
        Ok(Some(RemoteDevice::new(info.mac, name, DeviceState::Alarm(state))))
    }

    async fn fetch_motion_sensors(&self) -> Result<RemoteDeviceMap> {
        self.devices_of(DeviceKind::MotionSensor).await
    }

    async fn fetch_contact_sensors(&self) -> Result<RemoteDeviceMap> {
        self.devices_of(DeviceKind::ContactSensor).await
    }

    async fn fetch_door_locks(&self) -> Result<RemoteDeviceMap> {
        self.devices_of(DeviceKind::DoorLock).await
    }

    async fn query_panel_state(&self) -> Result<RemoteAlarmState> {
        let modes: Vec<PanelMode> = self.get(PANEL_MODE_PATH).await?;
        let mode = modes.first().ok_or_else(|| BridgeError::InvalidResponse {
            details: "panel mode list is empty".to_string(),
        })?;
        RemoteAlarmState::from_mode(&mode.mode).ok_or_else(|| BridgeError::InvalidResponse {
            details: format!("unknown panel mode '{}'", mode.mode),
        })
    }

    async fn command_panel_state(&self, state: RemoteAlarmState) -> Result<()> {
        self.post_form(
            PANEL_MODE_PATH,
            &[
                ("area", self.area.to_string()),
                ("mode", state.as_mode().to_string()),
            ],
        )
        .await
    }

    async fn query_door_locks(&self) -> Result<BTreeMap<String, i64>> {
        Ok(self
            .fetch_door_locks()
            .await?
            .into_iter()
            .filter_map(|(id, device)| device.state.status_code().map(|code| (id, code)))
            .collect())
    }

    async fn command_door_lock(&self, identifier: &str, command: RemoteLockCommand) -> Result<i64> {
        let mut form = vec![
            ("area", self.area.to_string()),
            ("device_sid", identifier.to_string()),
            ("request_value", command.request_value().to_string()),
        ];
        if let Some(pincode) = &self.door_lock_pincode {
            form.push(("pincode", pincode.clone()));
        }
        self.post_form(DEVICE_CONTROL_PATH, &form).await?;

        self.query_door_locks()
            .await?
            .get(identifier)
            .copied()
            .ok_or_else(|| BridgeError::UnknownDevice {
                identifier: identifier.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let config = BridgeConfig::builder()
            .api_url("https://example.com/yapi")
            .build();
        let client = YaleClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "https://example.com/yapi/");
        assert_eq!(
            client.endpoint_url("/api/panel/mode/").unwrap().as_str(),
            "https://example.com/yapi/api/panel/mode/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = BridgeConfig::builder().api_url("not a url").build();
        assert!(matches!(YaleClient::new(&config), Err(BridgeError::Url(_))));
    }

    #[tokio::test]
    async fn test_calls_before_authentication_fail() {
        let client = YaleClient::new(&BridgeConfig::default()).unwrap();
        assert!(!client.is_authenticated().await);
        assert!(matches!(
            client.query_panel_state().await,
            Err(BridgeError::NotAuthenticated)
        ));
    }
}
