// MIT License - Copyright (c) 2026 Peter Wright
// State translation between the remote and host vocabularies
//
//! The remote panel knows three arm states, the host four. The mapping is
//! therefore kept as separate one-directional functions rather than a single
//! table: towards the remote, STAY_ARM and NIGHT_ARM both collapse onto
//! `Home`; towards the host, `Home` is shown according to [`HomeModePolicy`].
//!
//! None of these functions can fail. Values outside a known vocabulary fall
//! through to a documented default, since the host cannot represent a missing
//! characteristic value.

use crate::config::HomeModePolicy;
use crate::constants::STATUS_CODE_MOTION;
use crate::devices::lock::is_secured_status;
use crate::devices::{RemoteAlarmState, RemoteLockCommand, SensorKind};
use crate::hap::{
    ContactSensorState, LockCurrentState, LockTargetState, SecuritySystemCurrentState,
    SecuritySystemTargetState,
};

/// Remote arm state to the host current-state value.
pub fn remote_alarm_to_host_current(
    state: RemoteAlarmState,
    policy: HomeModePolicy,
) -> SecuritySystemCurrentState {
    match state {
        RemoteAlarmState::Armed => SecuritySystemCurrentState::AwayArm,
        RemoteAlarmState::Disarmed => SecuritySystemCurrentState::Disarmed,
        RemoteAlarmState::Home => match policy {
            HomeModePolicy::StayArm => SecuritySystemCurrentState::StayArm,
            HomeModePolicy::NightArm => SecuritySystemCurrentState::NightArm,
        },
    }
}

/// Remote arm state to the host target-state value, used to keep the target
/// characteristic in step with what the panel reports.
pub fn remote_alarm_to_host_target(
    state: RemoteAlarmState,
    policy: HomeModePolicy,
) -> SecuritySystemTargetState {
    match state {
        RemoteAlarmState::Armed => SecuritySystemTargetState::AwayArm,
        RemoteAlarmState::Disarmed => SecuritySystemTargetState::Disarm,
        RemoteAlarmState::Home => match policy {
            HomeModePolicy::StayArm => SecuritySystemTargetState::StayArm,
            HomeModePolicy::NightArm => SecuritySystemTargetState::NightArm,
        },
    }
}

/// Host target state to the remote command. STAY_ARM and NIGHT_ARM are both `Home`.
pub fn host_target_to_remote_alarm(target: SecuritySystemTargetState) -> RemoteAlarmState {
    match target {
        SecuritySystemTargetState::AwayArm => RemoteAlarmState::Armed,
        SecuritySystemTargetState::Disarm => RemoteAlarmState::Disarmed,
        SecuritySystemTargetState::StayArm | SecuritySystemTargetState::NightArm => {
            RemoteAlarmState::Home
        }
    }
}

/// Raw host target value to the remote command. Unrecognized values map to `Home`.
pub fn host_target_value_to_remote_alarm(value: u8) -> RemoteAlarmState {
    SecuritySystemTargetState::from_value(value)
        .map(host_target_to_remote_alarm)
        .unwrap_or(RemoteAlarmState::Home)
}

/// Host lock target to the remote lock command.
pub fn host_target_to_remote_lock(target: LockTargetState) -> RemoteLockCommand {
    match target {
        LockTargetState::Secured => RemoteLockCommand::Locked,
        LockTargetState::Unsecured => RemoteLockCommand::Unlocked,
    }
}

/// Raw host lock target value to the remote command. Unrecognized values map to `unlocked`.
pub fn host_target_value_to_remote_lock(value: u8) -> RemoteLockCommand {
    LockTargetState::from_value(value)
        .map(host_target_to_remote_lock)
        .unwrap_or(RemoteLockCommand::Unlocked)
}

/// Remote lock status code to the host current-state value: `0` is secured,
/// anything else unsecured.
pub fn remote_lock_status_to_host_current(code: i64) -> LockCurrentState {
    if is_secured_status(code) {
        LockCurrentState::Secured
    } else {
        LockCurrentState::Unsecured
    }
}

pub fn remote_lock_status_to_host_target(code: i64) -> LockTargetState {
    if is_secured_status(code) {
        LockTargetState::Secured
    } else {
        LockTargetState::Unsecured
    }
}

/// Remote lock command to the host current state it should result in.
pub fn remote_lock_command_to_host_current(command: RemoteLockCommand) -> LockCurrentState {
    match command {
        RemoteLockCommand::Locked => LockCurrentState::Secured,
        RemoteLockCommand::Unlocked => LockCurrentState::Unsecured,
    }
}

/// Whether a sensor status code means "detected".
///
/// Contact sensors: `0` is not detected, anything else detected.
/// Motion sensors: only `1` is detected.
pub fn remote_sensor_status_to_host_detected(sensor: SensorKind, code: i64) -> bool {
    match sensor {
        SensorKind::Contact => code != 0,
        SensorKind::Motion => code == STATUS_CODE_MOTION,
    }
}

pub fn contact_sensor_state(detected: bool) -> ContactSensorState {
    if detected {
        ContactSensorState::ContactDetected
    } else {
        ContactSensorState::ContactNotDetected
    }
}
