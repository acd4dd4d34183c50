use super::{ControlNode, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::error::Result;
use crate::rma::mapping::PageAttributes;
use crate::rma::service::{DeviceRequest, RequestAction};
use crate::rma::state::{StateResult, WizardState};

pub const TAG: &str = "onboarding-diagnostics-page";

pub struct DiagnosticsPage {
    frame: PageFrame,
    launched: bool,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(DiagnosticsPage::new())
}

impl DiagnosticsPage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group(
                "diagnostics",
                vec![
                    ControlNode::button("launch-diagnostics", "launchDiagnosticsButtonLabel"),
                    ControlNode::button("next", "nextButtonLabel"),
                ],
            )),
            launched: false,
        }
    }
}

impl Default for DiagnosticsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for DiagnosticsPage {
    fn state(&self) -> WizardState {
        WizardState::Diagnostics
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
        let view = PageView::new(TAG, Text::new("diagnosticsTitleText"))
            .message(Text::new("diagnosticsDescriptionText"));
        let view = if self.launched {
            view.status(Text::new("diagnosticsLaunchedText"))
        } else {
            view
        };
        view.failure(self.frame.failure.clone())
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        let PageInput::Click(id) = input else {
            return;
        };
        match id.as_str() {
            "launch-diagnostics" => {
                self.frame.issue(DeviceRequest::LaunchDiagnostics, ctx);
            }
            "next" => {
                self.frame.issue(DeviceRequest::CompleteDiagnostics, ctx);
            }
            _ => {}
        }
    }

    fn on_response(&mut self, action: RequestAction, result: Result<StateResult>, ctx: &mut PageContext) {
        if action == RequestAction::LaunchDiagnostics && result.is_ok() {
            self.launched = true;
        }
        let own_state = self.state();
        self.frame.route_result(own_state, action, result, ctx);
    }
}
