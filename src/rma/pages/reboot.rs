use super::{ControlNode, PageFrame, PageView, StepPage, Text};
use crate::rma::mapping::PageAttributes;
use crate::rma::state::{ErrorCode, WizardState};

pub const TAG: &str = "reboot-page";

/// Seconds shown before the device power cycles
pub const REBOOT_DELAY_SECS: u32 = 3;

/// Shown while the device is about to reboot or shut down. Has no controls.
pub struct RebootPage {
    frame: PageFrame,
    error_code: ErrorCode,
}

pub fn build(attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(RebootPage::new(
        attributes.error_code.unwrap_or(ErrorCode::ExpectReboot),
    ))
}

impl RebootPage {
    pub fn new(error_code: ErrorCode) -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group("reboot", Vec::new())),
            error_code,
        }
    }
}

impl StepPage for RebootPage {
    fn state(&self) -> WizardState {
        WizardState::Reboot
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
        let (title, message) = match self.error_code {
            ErrorCode::ExpectShutdown => ("shutdownPageTitle", "shutdownPageMessage"),
            _ => ("rebootPageTitle", "rebootPageMessage"),
        };
        PageView::new(TAG, Text::new(title))
            .message(Text::new(message).with_arg(REBOOT_DELAY_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_reboot_renders_reboot_text_with_delay() {
        let view = RebootPage::new("expect-reboot".parse().unwrap()).render();
        assert_eq!(view.title, Text::new("rebootPageTitle"));
        assert_eq!(view.message, Some(Text::new("rebootPageMessage").with_arg(3)));
    }

    #[test]
    fn expect_shutdown_renders_shutdown_text_with_delay() {
        let view = RebootPage::new("expect-shutdown".parse().unwrap()).render();
        assert_eq!(view.title, Text::new("shutdownPageTitle"));
        assert_eq!(view.message, Some(Text::new("shutdownPageMessage").with_arg(3)));
    }
}
