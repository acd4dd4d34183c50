use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::fake::FakeDeviceService;
use super::state::{ErrorCode, StateResult, WizardState};
use crate::error::Result;

const SYSTEM_CONFIG_PATH: &str = "/etc/rma-wizard/wizard.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub general: GeneralConfig,
    pub simulation: SimulationConfig,
}

impl WizardConfig {
    /// Per-user config if present, otherwise the system-wide one
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("rma-wizard").join("wizard.toml"))
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: WizardConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Fake backend scripted from the `[simulation]` section
    pub fn build_service(&self) -> FakeDeviceService {
        let service = FakeDeviceService::new();
        service.set_states(self.simulation.scripted_states());
        service
    }

    /// State the wizard mounts first. Falls back to the first scripted state.
    pub fn initial_state(&self) -> WizardState {
        self.general
            .initial_state
            .or_else(|| self.simulation.states.first().map(|step| step.state))
            .unwrap_or(WizardState::Onboarding)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Overrides the first scripted state
    pub initial_state: Option<WizardState>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Device Repair".to_string(),
            initial_state: None,
        }
    }
}

/// One response the fake backend hands out, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScriptedStep {
    pub state: WizardState,
    #[serde(default)]
    pub error: ErrorCode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub states: Vec<ScriptedStep>,
    /// Components offered on the component selection page
    pub components: Vec<String>,
    /// Report write protection disabled this long after the disable page mounts.
    /// Zero leaves it to the user.
    pub auto_wp_disable_ms: u64,
    /// Same for write protection coming back on the enable page
    pub auto_wp_enable_ms: u64,
}

impl SimulationConfig {
    pub fn scripted_states(&self) -> Vec<StateResult> {
        self.states
            .iter()
            .map(|step| StateResult::with_error(step.state, step.error))
            .collect()
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let states = [
            WizardState::Onboarding,
            WizardState::Diagnostics,
            WizardState::SelectComponents,
            WizardState::WaitForManualWpDisable,
            WizardState::ChooseWipeDevice,
            WizardState::WaitForManualWpEnable,
            WizardState::RepairComplete,
        ];
        Self {
            states: states
                .into_iter()
                .map(|state| ScriptedStep {
                    state,
                    error: ErrorCode::Ok,
                })
                .collect(),
            components: ["Battery", "Camera", "Keyboard", "Touchpad", "Display"]
                .into_iter()
                .map(String::from)
                .collect(),
            auto_wp_disable_ms: 0,
            auto_wp_enable_ms: 0,
        }
    }
}
