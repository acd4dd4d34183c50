use super::{ControlNode, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::rma::mapping::PageAttributes;
use crate::rma::service::DeviceRequest;
use crate::rma::state::WizardState;

pub const TAG: &str = "onboarding-landing-page";

/// Landing page; "get started" begins the repair on the device
pub struct OnboardingPage {
    frame: PageFrame,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(OnboardingPage::new())
}

impl OnboardingPage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group(
                "landing",
                vec![ControlNode::button("get-started", "getStartedButtonLabel")],
            )),
        }
    }
}

impl Default for OnboardingPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for OnboardingPage {
    fn state(&self) -> WizardState {
        WizardState::Onboarding
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
        PageView::new(TAG, Text::new("welcomeTitleText"))
            .message(Text::new("beginRmaWarningText"))
            .failure(self.frame.failure.clone())
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        if let PageInput::Click(id) = input {
            if id == "get-started" {
                self.frame.issue(DeviceRequest::BeginRma, ctx);
            }
        }
    }
}
