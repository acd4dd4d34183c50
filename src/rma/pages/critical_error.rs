use super::{ControlNode, Outcome, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::error::Result;
use crate::rma::mapping::PageAttributes;
use crate::rma::service::{DeviceRequest, RequestAction};
use crate::rma::state::{StateResult, WizardState};

pub const TAG: &str = "critical-error-page";

const RECOVERY_DIALOG: &str = "recovery-dialog";
pub const EXIT_TO_LOGIN: &str = "exit-to-login";
pub const REBOOT: &str = "reboot";

const RECOVERY_ACTIONS: [RequestAction; 2] = [
    RequestAction::CriticalErrorExitToLogin,
    RequestAction::CriticalErrorReboot,
];

/// Unrecoverable failure. The only way out is exiting to login or rebooting;
/// both live in an always-open recovery dialog so they outlast the global
/// disable the wizard applies on entry.
pub struct CriticalErrorPage {
    frame: PageFrame,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(CriticalErrorPage::new())
}

impl CriticalErrorPage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group(
                "critical-error",
                vec![
                    ControlNode::dialog(
                        RECOVERY_DIALOG,
                        "criticalErrorRecoveryTitle",
                        vec![
                            ControlNode::button(EXIT_TO_LOGIN, "criticalErrorExitButtonLabel"),
                            ControlNode::button(REBOOT, "criticalErrorRebootButtonLabel"),
                        ],
                    )
                    .opened(),
                ],
            )),
        }
    }

    /// Either recovery action settles the page, so they are exclusive
    fn recovery_in_flight(&self) -> bool {
        RECOVERY_ACTIONS
            .iter()
            .any(|action| self.frame.requests.is_outstanding(*action))
    }

    fn lock_recovery(&mut self, locked: bool) {
        for id in [EXIT_TO_LOGIN, REBOOT] {
            if let Some(control) = self.frame.controls.find_mut(id) {
                control.set_locked(locked);
            }
        }
    }

    fn start(&mut self, request: DeviceRequest, ctx: &mut PageContext) {
        if self.recovery_in_flight() {
            return;
        }
        self.frame.hold_disable(ctx);
        self.lock_recovery(true);
        self.frame.issue(request, ctx);
    }
}

impl Default for CriticalErrorPage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for CriticalErrorPage {
    fn state(&self) -> WizardState {
        WizardState::CriticalError
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
        PageView::new(TAG, Text::new("criticalErrorTitleText"))
            .message(Text::new("criticalErrorMessageText"))
            .failure(self.frame.failure.clone())
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        let PageInput::Click(id) = input else {
            return;
        };
        match id.as_str() {
            EXIT_TO_LOGIN => self.start(DeviceRequest::CriticalErrorExitToLogin, ctx),
            REBOOT => self.start(DeviceRequest::CriticalErrorReboot, ctx),
            _ => {}
        }
    }

    fn on_response(&mut self, action: RequestAction, result: Result<StateResult>, ctx: &mut PageContext) {
        let outcome = match action {
            RequestAction::CriticalErrorExitToLogin => Outcome::ExitToLogin,
            RequestAction::CriticalErrorReboot => Outcome::Reboot,
            _ => {
                let own_state = self.state();
                self.frame.route_result(own_state, action, result, ctx);
                return;
            }
        };
        if !self.frame.route_finish(action, result, outcome, ctx) && !self.recovery_in_flight() {
            self.lock_recovery(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rma::pages::PageEffect;

    #[test]
    fn recovery_actions_stay_enabled_when_page_is_disabled() {
        let mut page = CriticalErrorPage::new();
        page.on_all_buttons_disabled_changed(true);
        assert!(page.controls().is_actionable(EXIT_TO_LOGIN));
        assert!(page.controls().is_actionable(REBOOT));
    }

    #[test]
    fn clicking_reboot_requests_disable_first() {
        let mut page = CriticalErrorPage::new();
        let mut ctx = PageContext::new();
        page.on_input(&PageInput::click(REBOOT), &mut ctx);

        assert_eq!(
            ctx.effects(),
            &[
                PageEffect::Disable(true),
                PageEffect::Request(DeviceRequest::CriticalErrorReboot)
            ]
        );
        assert!(page.controls().find(REBOOT).unwrap().is_disabled());
        assert!(page.controls().find(EXIT_TO_LOGIN).unwrap().is_disabled());
    }

    #[test]
    fn second_recovery_action_is_dropped_while_first_is_in_flight() {
        let mut page = CriticalErrorPage::new();
        let mut ctx = PageContext::new();
        page.on_input(&PageInput::click(EXIT_TO_LOGIN), &mut ctx);
        page.on_input(&PageInput::click(REBOOT), &mut ctx);

        assert_eq!(
            ctx.effects(),
            &[
                PageEffect::Disable(true),
                PageEffect::Request(DeviceRequest::CriticalErrorExitToLogin)
            ]
        );
        assert!(!page.frame().requests.is_outstanding(RequestAction::CriticalErrorReboot));
    }

    #[test]
    fn failed_exit_unlocks_and_releases_disable() {
        let mut page = CriticalErrorPage::new();
        let mut ctx = PageContext::new();
        page.on_input(&PageInput::click(EXIT_TO_LOGIN), &mut ctx);

        let mut ctx = PageContext::new();
        page.on_response(
            RequestAction::CriticalErrorExitToLogin,
            Err(crate::error::WizardError::HardwareRequest {
                action: RequestAction::CriticalErrorExitToLogin,
                message: "busy".to_string(),
            }),
            &mut ctx,
        );
        assert_eq!(ctx.effects(), &[PageEffect::Disable(false)]);
        assert!(!page.controls().find(EXIT_TO_LOGIN).unwrap().is_disabled());
        assert!(!page.controls().find(REBOOT).unwrap().is_disabled());
        assert!(page.render().failure.is_some());
    }
}
