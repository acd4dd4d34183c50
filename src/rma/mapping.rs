use std::fmt;
use tracing::warn;

use super::pages::{
    StepPage, choose_wipe_device, critical_error, diagnostics, manual_wp_disable,
    manual_wp_enable, onboarding, reboot, repair_complete, select_components,
};
use super::state::{ErrorCode, WizardState};
use crate::error::{Result, WizardError};

/// Initial attribute a page may need before it can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAttribute {
    ErrorCode,
    Components,
}

impl fmt::Display for PageAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageAttribute::ErrorCode => "error-code",
            PageAttribute::Components => "components",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAttributes {
    pub error_code: Option<ErrorCode>,
    pub components: Vec<String>,
}

impl PageAttributes {
    pub fn has(&self, attribute: PageAttribute) -> bool {
        match attribute {
            PageAttribute::ErrorCode => self.error_code.is_some(),
            PageAttribute::Components => !self.components.is_empty(),
        }
    }
}

pub type PageConstructor = fn(&PageAttributes) -> Box<dyn StepPage>;

/// How to build the page for one wizard state
#[derive(Clone, Copy)]
pub struct PageDescriptor {
    pub state: WizardState,
    pub tag: &'static str,
    pub requires: &'static [PageAttribute],
    pub construct: PageConstructor,
}

impl fmt::Debug for PageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDescriptor")
            .field("state", &self.state)
            .field("tag", &self.tag)
            .field("requires", &self.requires)
            .finish()
    }
}

const STANDARD_PAGES: [PageDescriptor; 9] = [
    PageDescriptor {
        state: WizardState::Onboarding,
        tag: onboarding::TAG,
        requires: &[],
        construct: onboarding::build,
    },
    PageDescriptor {
        state: WizardState::Diagnostics,
        tag: diagnostics::TAG,
        requires: &[],
        construct: diagnostics::build,
    },
    PageDescriptor {
        state: WizardState::SelectComponents,
        tag: select_components::TAG,
        requires: &[PageAttribute::Components],
        construct: select_components::build,
    },
    PageDescriptor {
        state: WizardState::ChooseWipeDevice,
        tag: choose_wipe_device::TAG,
        requires: &[],
        construct: choose_wipe_device::build,
    },
    PageDescriptor {
        state: WizardState::WaitForManualWpDisable,
        tag: manual_wp_disable::TAG,
        requires: &[],
        construct: manual_wp_disable::build,
    },
    PageDescriptor {
        state: WizardState::WaitForManualWpEnable,
        tag: manual_wp_enable::TAG,
        requires: &[],
        construct: manual_wp_enable::build,
    },
    PageDescriptor {
        state: WizardState::RepairComplete,
        tag: repair_complete::TAG,
        requires: &[],
        construct: repair_complete::build,
    },
    PageDescriptor {
        state: WizardState::Reboot,
        tag: reboot::TAG,
        requires: &[PageAttribute::ErrorCode],
        construct: reboot::build,
    },
    PageDescriptor {
        state: WizardState::CriticalError,
        tag: critical_error::TAG,
        requires: &[],
        construct: critical_error::build,
    },
];

/// Table from wizard state to page descriptor. Read-only once built.
#[derive(Debug, Clone)]
pub struct StateComponentMapping {
    entries: Vec<PageDescriptor>,
}

impl Default for StateComponentMapping {
    fn default() -> Self {
        Self::standard()
    }
}

impl StateComponentMapping {
    /// One entry for every wizard state
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_PAGES.to_vec(),
        }
    }

    pub fn from_descriptors(entries: Vec<PageDescriptor>) -> Self {
        Self { entries }
    }

    pub fn descriptors(&self) -> &[PageDescriptor] {
        &self.entries
    }

    pub fn lookup(&self, state: WizardState) -> Result<&PageDescriptor> {
        self.entries
            .iter()
            .find(|descriptor| descriptor.state == state)
            .ok_or(WizardError::UnknownState(state))
    }

    /// Construct the page for `state`. A page missing one of its attributes
    /// falls back to its own default for it; only an absent state is an error.
    pub fn build(&self, state: WizardState, attributes: &PageAttributes) -> Result<Box<dyn StepPage>> {
        let descriptor = self.lookup(state)?;
        for missing in descriptor.requires.iter().filter(|a| !attributes.has(**a)) {
            warn!("{} page built without {}, using its default", state, missing);
        }
        Ok((descriptor.construct)(attributes))
    }
}
