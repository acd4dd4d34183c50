use super::{ControlNode, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::rma::mapping::PageAttributes;
use crate::rma::observer::{HardwareObservation, ObservationKind};
use crate::rma::service::DeviceRequest;
use crate::rma::state::WizardState;

pub const TAG: &str = "onboarding-wait-for-manual-wp-disable-page";

/// Waits for the technician to remove write protection by hand.
/// "next" stays locked until the device reports write protection off.
pub struct ManualWpDisablePage {
    frame: PageFrame,
    write_protect_enabled: bool,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(ManualWpDisablePage::new())
}

impl ManualWpDisablePage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group(
                "manual-wp-disable",
                vec![ControlNode::button("next", "nextButtonLabel").locked()],
            )),
            write_protect_enabled: true,
        }
    }
}

impl Default for ManualWpDisablePage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for ManualWpDisablePage {
    fn state(&self) -> WizardState {
        WizardState::WaitForManualWpDisable
    }

    fn tag(&self) -> &'static str {
        TAG
    }

    fn frame(&self) -> &PageFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut PageFrame {
        &mut self.frame
    }

    fn render(&self) -> PageView {
        let status = if self.write_protect_enabled {
            "wpStatusEnabled"
        } else {
            "wpStatusDisabled"
        };
        PageView::new(TAG, Text::new("manuallyDisableWpTitleText"))
            .message(Text::new("manuallyDisableWpInstructionsText"))
            .status(Text::new(status))
            .failure(self.frame.failure.clone())
    }

    fn observed_kinds(&self) -> &'static [ObservationKind] {
        &[ObservationKind::WriteProtectChanged]
    }

    fn on_observation(&mut self, observation: &HardwareObservation) {
        if let HardwareObservation::WriteProtectChanged { enabled } = *observation {
            self.write_protect_enabled = enabled;
            if let Some(next) = self.frame.controls.find_mut("next") {
                next.set_locked(enabled);
            }
        }
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        if matches!(input, PageInput::Click(id) if id == "next") && !self.write_protect_enabled {
            self.frame.issue(DeviceRequest::WriteProtectManuallyDisabled, ctx);
        }
    }
}
