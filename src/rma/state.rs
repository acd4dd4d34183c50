use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Identifier for each step of the repair flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardState {
    Onboarding,
    Diagnostics,
    SelectComponents,
    ChooseWipeDevice,
    WaitForManualWpDisable,
    WaitForManualWpEnable,
    RepairComplete,
    Reboot,
    CriticalError,
}

impl WizardState {
    pub const ALL: [WizardState; 9] = [
        WizardState::Onboarding,
        WizardState::Diagnostics,
        WizardState::SelectComponents,
        WizardState::ChooseWipeDevice,
        WizardState::WaitForManualWpDisable,
        WizardState::WaitForManualWpEnable,
        WizardState::RepairComplete,
        WizardState::Reboot,
        WizardState::CriticalError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardState::Onboarding => "onboarding",
            WizardState::Diagnostics => "diagnostics",
            WizardState::SelectComponents => "select-components",
            WizardState::ChooseWipeDevice => "choose-wipe-device",
            WizardState::WaitForManualWpDisable => "wait-for-manual-wp-disable",
            WizardState::WaitForManualWpEnable => "wait-for-manual-wp-enable",
            WizardState::RepairComplete => "repair-complete",
            WizardState::Reboot => "reboot",
            WizardState::CriticalError => "critical-error",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            WizardState::Onboarding => "Welcome",
            WizardState::Diagnostics => "Diagnostics",
            WizardState::SelectComponents => "Components",
            WizardState::ChooseWipeDevice => "Wipe",
            WizardState::WaitForManualWpDisable => "WP Disable",
            WizardState::WaitForManualWpEnable => "WP Enable",
            WizardState::RepairComplete => "Complete",
            WizardState::Reboot => "Reboot",
            WizardState::CriticalError => "Error",
        }
    }
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| format!("unknown wizard state '{s}'"))
    }
}

/// Error code attached to every device response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    #[default]
    Ok,
    ExpectReboot,
    ExpectShutdown,
    WpEnabled,
    RequestInvalid,
    TransitionFailed,
    CriticalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Ok => "ok",
            ErrorCode::ExpectReboot => "expect-reboot",
            ErrorCode::ExpectShutdown => "expect-shutdown",
            ErrorCode::WpEnabled => "wp-enabled",
            ErrorCode::RequestInvalid => "request-invalid",
            ErrorCode::TransitionFailed => "transition-failed",
            ErrorCode::CriticalError => "critical-error",
        }
    }

    /// Codes announcing that the device is about to power cycle
    pub fn is_power_cycle(&self) -> bool {
        matches!(self, ErrorCode::ExpectReboot | ErrorCode::ExpectShutdown)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            ErrorCode::Ok,
            ErrorCode::ExpectReboot,
            ErrorCode::ExpectShutdown,
            ErrorCode::WpEnabled,
            ErrorCode::RequestInvalid,
            ErrorCode::TransitionFailed,
            ErrorCode::CriticalError,
        ]
        .into_iter()
        .find(|code| code.as_str() == s)
        .ok_or_else(|| format!("unknown error code '{s}'"))
    }
}

/// Response to a device request: the state the device moved to and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateResult {
    pub state: WizardState,
    pub error: ErrorCode,
}

impl StateResult {
    pub fn ok(state: WizardState) -> Self {
        Self {
            state,
            error: ErrorCode::Ok,
        }
    }

    pub fn with_error(state: WizardState, error: ErrorCode) -> Self {
        Self { state, error }
    }
}
