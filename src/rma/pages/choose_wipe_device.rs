use super::{ControlNode, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::rma::mapping::PageAttributes;
use crate::rma::service::DeviceRequest;
use crate::rma::state::WizardState;

pub const TAG: &str = "reimaging-device-select-page";

const CHOICE: &str = "wipe-choice";
pub const WIPE_DEVICE: &str = "wipe-device";
pub const PRESERVE_DATA: &str = "preserve-data";

/// Choose between wiping the device and keeping user data.
/// Selecting an option only records it; the request goes out on "next".
pub struct ChooseWipeDevicePage {
    frame: PageFrame,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(ChooseWipeDevicePage::new())
}

impl ChooseWipeDevicePage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group(
                "choose-wipe-device",
                vec![
                    ControlNode::radio_group(
                        CHOICE,
                        vec![
                            ControlNode::radio(WIPE_DEVICE, "wipeDeviceRemoveDataLabel"),
                            ControlNode::radio(PRESERVE_DATA, "wipeDevicePreserveDataLabel"),
                        ],
                    ),
                    ControlNode::button("next", "nextButtonLabel").locked(),
                ],
            )),
        }
    }

    pub fn choice(&self) -> Option<&str> {
        self.frame.controls.checked_radio(CHOICE)
    }
}

impl Default for ChooseWipeDevicePage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for ChooseWipeDevicePage {
    fn state(&self) -> WizardState {
        WizardState::ChooseWipeDevice
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
        PageView::new(TAG, Text::new("chooseWipeDeviceTitleText"))
            .message(Text::new("chooseWipeDeviceDescriptionText"))
            .failure(self.frame.failure.clone())
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        match input {
            PageInput::Select(id) => {
                if self.frame.controls.select_radio(id) {
                    if let Some(next) = self.frame.controls.find_mut("next") {
                        next.set_locked(false);
                    }
                }
            }
            PageInput::Click(id) if id == "next" => {
                let Some(choice) = self.choice() else {
                    return;
                };
                let wipe = choice == WIPE_DEVICE;
                self.frame.issue(DeviceRequest::SetWipeDevice { wipe }, ctx);
            }
            _ => {}
        }
    }
}
