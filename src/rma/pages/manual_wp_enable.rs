use tracing::{debug, info};

use super::{ControlNode, PageContext, PageFrame, PageView, StepPage, Text};
use crate::error::Result;
use crate::rma::mapping::PageAttributes;
use crate::rma::observer::{HardwareObservation, ObservationKind};
use crate::rma::service::{DeviceRequest, RequestAction};
use crate::rma::state::{StateResult, WizardState};

pub const TAG: &str = "wrapup-wait-for-manual-wp-enable-page";

/// Waits for write protection to be restored, then moves on by itself.
///
/// The first observation reporting write protection on fires one
/// `WriteProtectManuallyEnabled` request. Repeated "on" observations are
/// ignored until an "off" observation or a rejected request re-arms the page.
pub struct ManualWpEnablePage {
    frame: PageFrame,
    write_protect_enabled: bool,
    fired: bool,
}

pub fn build(_attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(ManualWpEnablePage::new())
}

impl ManualWpEnablePage {
    pub fn new() -> Self {
        Self {
            frame: PageFrame::new(ControlNode::group("manual-wp-enable", Vec::new())),
            write_protect_enabled: false,
            fired: false,
        }
    }
}

impl Default for ManualWpEnablePage {
    fn default() -> Self {
        Self::new()
    }
}

impl StepPage for ManualWpEnablePage {
    fn state(&self) -> WizardState {
        WizardState::WaitForManualWpEnable
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
        PageView::new(TAG, Text::new("manuallyEnableWpTitleText"))
            .message(Text::new("manuallyEnableWpInstructionsText"))
            .status(Text::new(status))
            .failure(self.frame.failure.clone())
    }

    fn observed_kinds(&self) -> &'static [ObservationKind] {
        &[ObservationKind::WriteProtectChanged]
    }

    fn on_observation(&mut self, observation: &HardwareObservation) {
        if let HardwareObservation::WriteProtectChanged { enabled } = *observation {
            self.write_protect_enabled = enabled;
            if !enabled {
                self.fired = false;
            }
        }
    }

    fn try_auto_transition(&mut self, ctx: &mut PageContext) {
        if !self.write_protect_enabled {
            return;
        }
        if self.fired {
            debug!("Write protection already reported enabled");
            return;
        }
        self.fired = true;
        info!("Write protection enabled, continuing");
        self.frame.issue(DeviceRequest::WriteProtectManuallyEnabled, ctx);
    }

    fn on_response(&mut self, action: RequestAction, result: Result<StateResult>, ctx: &mut PageContext) {
        let own_state = self.state();
        self.frame.route_result(own_state, action, result, ctx);
        if self.frame.failure.is_some() {
            self.fired = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rma::pages::PageEffect;

    fn observe(page: &mut ManualWpEnablePage, enabled: bool, ctx: &mut PageContext) {
        page.on_observation(&HardwareObservation::WriteProtectChanged { enabled });
        page.try_auto_transition(ctx);
    }

    #[test]
    fn repeated_enabled_observations_fire_once() {
        let mut page = ManualWpEnablePage::new();
        let mut ctx = PageContext::new();
        observe(&mut page, true, &mut ctx);
        observe(&mut page, true, &mut ctx);

        assert_eq!(
            ctx.effects(),
            &[PageEffect::Request(DeviceRequest::WriteProtectManuallyEnabled)]
        );
    }

    #[test]
    fn disabled_observation_rearms_after_settled_request() {
        let mut page = ManualWpEnablePage::new();
        let mut ctx = PageContext::new();
        observe(&mut page, false, &mut ctx);
        assert!(ctx.effects().is_empty());

        observe(&mut page, true, &mut ctx);
        page.frame_mut()
            .requests
            .settle(RequestAction::WriteProtectManuallyEnabled);
        observe(&mut page, false, &mut ctx);
        observe(&mut page, true, &mut ctx);
        assert_eq!(ctx.effects().len(), 2);
    }

    #[test]
    fn rejected_request_rearms_next_enabled_observation() {
        let mut page = ManualWpEnablePage::new();
        let mut ctx = PageContext::new();
        observe(&mut page, true, &mut ctx);

        page.on_response(
            RequestAction::WriteProtectManuallyEnabled,
            Err(crate::error::WizardError::HardwareRequest {
                action: RequestAction::WriteProtectManuallyEnabled,
                message: "not ready".to_string(),
            }),
            &mut ctx,
        );
        assert!(page.render().failure.is_some());

        observe(&mut page, true, &mut ctx);
        let requests = ctx
            .effects()
            .iter()
            .filter(|effect| matches!(effect, PageEffect::Request(_)))
            .count();
        assert_eq!(requests, 2);
    }
}
