use super::{ControlNode, Outcome, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::error::Result;
use crate::rma::mapping::PageAttributes;
use crate::rma::service::{DeviceRequest, RequestAction};
use crate::rma::state::{StateResult, WizardState};

pub const TAG: &str = "wrapup-repair-complete-page";

const DIALOG: &str = "reboot-dialog";

/// Final page. Rebooting goes through a confirmation dialog.
pub struct RepairCompletePage {
    frame: PageFrame,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(RepairCompletePage::new())
}

impl RepairCompletePage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group(
                "repair-complete",
                vec![
                    ControlNode::button("finish", "repairCompleteRebootButtonLabel"),
                    ControlNode::dialog(
                        DIALOG,
                        "rebootDialogTitle",
                        vec![
                            ControlNode::button("confirm-reboot", "rebootDialogConfirmLabel"),
                            ControlNode::button("cancel-reboot", "rebootDialogCancelLabel"),
                        ],
                    ),
                ],
            )),
        }
    }

    pub fn dialog_open(&self) -> bool {
        self.frame.controls.find(DIALOG).is_some_and(|dialog| dialog.open)
    }

    /// Both dialog buttons stay locked while the reboot request is in flight
    fn set_dialog_locked(&mut self, locked: bool) {
        for id in ["confirm-reboot", "cancel-reboot"] {
            if let Some(control) = self.frame.controls.find_mut(id) {
                control.set_locked(locked);
            }
        }
    }
}

impl Default for RepairCompletePage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for RepairCompletePage {
    fn state(&self) -> WizardState {
        WizardState::RepairComplete
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
        PageView::new(TAG, Text::new("repairCompletedTitleText"))
            .message(Text::new("repairCompletedDescriptionText"))
            .failure(self.frame.failure.clone())
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        let PageInput::Click(id) = input else {
            return;
        };
        match id.as_str() {
            "finish" => self.frame.controls.open_dialog(DIALOG, true),
            "cancel-reboot" => self.frame.controls.open_dialog(DIALOG, false),
            "confirm-reboot" => {
                if self.frame.requests.is_outstanding(RequestAction::EndRmaAndReboot) {
                    return;
                }
                self.frame.hold_disable(ctx);
                self.set_dialog_locked(true);
                self.frame.issue(DeviceRequest::EndRmaAndReboot, ctx);
            }
            _ => {}
        }
    }

    fn on_response(&mut self, action: RequestAction, result: Result<StateResult>, ctx: &mut PageContext) {
        if action != RequestAction::EndRmaAndReboot {
            let own_state = self.state();
            self.frame.route_result(own_state, action, result, ctx);
            return;
        }
        if !self.frame.route_finish(action, result, Outcome::Reboot, ctx) {
            self.set_dialog_locked(false);
            self.frame.controls.open_dialog(DIALOG, false);
        }
    }
}
