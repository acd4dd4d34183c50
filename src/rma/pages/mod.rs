pub mod choose_wipe_device;
pub mod controls;
pub mod critical_error;
pub mod diagnostics;
pub mod manual_wp_disable;
pub mod manual_wp_enable;
pub mod onboarding;
pub mod reboot;
pub mod repair_complete;
pub mod select_components;
pub mod view;

pub use controls::{ControlHost, ControlKind, ControlNode};
pub use view::{PageView, Text};

use std::collections::HashSet;
use tracing::{debug, warn};

use super::observer::{HardwareObservation, ObservationKind};
use super::service::{DeviceRequest, RequestAction};
use super::state::{ErrorCode, StateResult, WizardState};
use crate::error::{Result, WizardError};

/// User interaction aimed at one control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageInput {
    Click(String),
    Select(String),
    Toggle(String),
}

impl PageInput {
    pub fn click(id: &str) -> Self {
        PageInput::Click(id.to_string())
    }

    pub fn select(id: &str) -> Self {
        PageInput::Select(id.to_string())
    }

    pub fn toggle(id: &str) -> Self {
        PageInput::Toggle(id.to_string())
    }

    /// The input that activating `control` produces, if it takes input at all
    pub fn for_control(control: &ControlNode) -> Option<Self> {
        match control.kind {
            ControlKind::Button => Some(PageInput::click(&control.id)),
            ControlKind::Radio => Some(PageInput::select(&control.id)),
            ControlKind::Toggle => Some(PageInput::toggle(&control.id)),
            _ => None,
        }
    }

    pub fn control_id(&self) -> &str {
        match self {
            PageInput::Click(id) | PageInput::Select(id) | PageInput::Toggle(id) => id,
        }
    }
}

/// Extra instructions carried by a transition-request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionPayload {
    /// Keep every control disabled when the next page mounts
    pub disable_on_entry: bool,
    pub error_code: Option<ErrorCode>,
}

impl TransitionPayload {
    pub fn disabled(error_code: ErrorCode) -> Self {
        Self {
            disable_on_entry: true,
            error_code: Some(error_code),
        }
    }
}

/// How the wizard ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    ExitToLogin,
    Reboot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEffect {
    Disable(bool),
    Transition {
        next: WizardState,
        payload: TransitionPayload,
    },
    Request(DeviceRequest),
    Finish(Outcome),
}

/// Outbox a page writes to while handling input, observations and responses
#[derive(Debug, Default)]
pub struct PageContext {
    effects: Vec<PageEffect>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_disable(&mut self, disable: bool) {
        self.effects.push(PageEffect::Disable(disable));
    }

    pub fn request_transition(&mut self, next: WizardState, payload: TransitionPayload) {
        self.effects.push(PageEffect::Transition { next, payload });
    }

    pub fn finish(&mut self, outcome: Outcome) {
        self.effects.push(PageEffect::Finish(outcome));
    }

    fn issue(&mut self, request: DeviceRequest) {
        self.effects.push(PageEffect::Request(request));
    }

    pub fn effects(&self) -> &[PageEffect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<PageEffect> {
        self.effects
    }
}

/// Tracks outstanding requests so each action has at most one in flight
#[derive(Debug, Default)]
pub struct RequestGuard {
    outstanding: HashSet<RequestAction>,
}

impl RequestGuard {
    pub fn issue(&mut self, request: DeviceRequest, ctx: &mut PageContext) -> Result<()> {
        let action = request.action();
        if !self.outstanding.insert(action) {
            return Err(WizardError::DuplicateRequest(action));
        }
        ctx.issue(request);
        Ok(())
    }

    pub fn settle(&mut self, action: RequestAction) -> bool {
        self.outstanding.remove(&action)
    }

    pub fn is_outstanding(&self, action: RequestAction) -> bool {
        self.outstanding.contains(&action)
    }
}

/// State every page carries: its controls, the disable flag it was handed,
/// its request guard and the last failure to show.
#[derive(Debug)]
pub struct PageFrame {
    pub controls: ControlNode,
    pub requests: RequestGuard,
    pub failure: Option<String>,
    all_buttons_disabled: bool,
    /// Actions in flight that asked for the global disable
    disable_holds: usize,
}

impl PageFrame {
    pub fn new(controls: ControlNode) -> Self {
        Self {
            controls,
            requests: RequestGuard::default(),
            failure: None,
            all_buttons_disabled: false,
            disable_holds: 0,
        }
    }

    pub fn all_buttons_disabled(&self) -> bool {
        self.all_buttons_disabled
    }

    pub fn set_all_buttons_disabled(&mut self, disabled: bool) {
        self.all_buttons_disabled = disabled;
        self.controls.apply_all_buttons_disabled(disabled);
    }

    /// Issue `request` unless the same action is already in flight.
    /// Duplicates are dropped here and never reach the user.
    pub fn issue(&mut self, request: DeviceRequest, ctx: &mut PageContext) -> bool {
        match self.requests.issue(request, ctx) {
            Ok(()) => true,
            Err(e) => {
                debug!("Suppressed request: {}", e);
                false
            }
        }
    }

    /// Ask the orchestrator to freeze every control until this page's action settles
    pub fn hold_disable(&mut self, ctx: &mut PageContext) {
        self.disable_holds += 1;
        if self.disable_holds == 1 {
            ctx.request_disable(true);
        }
    }

    /// Drop one hold; the disable is lifted once none are left
    pub fn release_disable(&mut self, ctx: &mut PageContext) {
        if self.disable_holds == 0 {
            return;
        }
        self.disable_holds -= 1;
        if self.disable_holds == 0 {
            ctx.request_disable(false);
        }
    }

    pub fn holds_disable(&self) -> bool {
        self.disable_holds > 0
    }

    pub fn fail(&mut self, message: String, ctx: &mut PageContext) {
        warn!("Page request failed: {}", message);
        self.failure = Some(message);
        self.release_disable(ctx);
    }

    /// Default handling of a request that moves the flow along
    pub fn route_result(
        &mut self,
        own_state: WizardState,
        action: RequestAction,
        result: Result<StateResult>,
        ctx: &mut PageContext,
    ) {
        self.requests.settle(action);
        match result {
            Ok(StateResult {
                state,
                error: ErrorCode::Ok,
            }) => {
                self.failure = None;
                if state != own_state {
                    ctx.request_transition(state, TransitionPayload::default());
                } else {
                    self.release_disable(ctx);
                }
            }
            Ok(StateResult { error, .. }) if error.is_power_cycle() => {
                ctx.request_transition(WizardState::Reboot, TransitionPayload::disabled(error));
            }
            Ok(StateResult {
                error: ErrorCode::CriticalError,
                ..
            }) => {
                ctx.request_transition(
                    WizardState::CriticalError,
                    TransitionPayload::disabled(ErrorCode::CriticalError),
                );
            }
            Ok(StateResult { error, .. }) => self.fail(format!("{action}: {error}"), ctx),
            Err(e) => self.fail(e.to_string(), ctx),
        }
    }

    /// Handling of a request whose success ends the wizard
    pub fn route_finish(
        &mut self,
        action: RequestAction,
        result: Result<StateResult>,
        outcome: Outcome,
        ctx: &mut PageContext,
    ) -> bool {
        self.requests.settle(action);
        match result {
            Ok(StateResult {
                error: ErrorCode::Ok,
                ..
            }) => {
                ctx.finish(outcome);
                true
            }
            Ok(StateResult { error, .. }) => {
                self.fail(format!("{action}: {error}"), ctx);
                false
            }
            Err(e) => {
                self.fail(e.to_string(), ctx);
                false
            }
        }
    }
}

/// Shared capability of every step page
pub trait StepPage: Send {
    fn state(&self) -> WizardState;

    /// Stable identifying tag, matching the page's mapping entry
    fn tag(&self) -> &'static str;

    fn frame(&self) -> &PageFrame;

    fn frame_mut(&mut self) -> &mut PageFrame;

    fn render(&self) -> PageView;

    fn controls(&self) -> &ControlNode {
        &self.frame().controls
    }

    fn all_buttons_disabled(&self) -> bool {
        self.frame().all_buttons_disabled()
    }

    fn on_all_buttons_disabled_changed(&mut self, disabled: bool) {
        self.frame_mut().set_all_buttons_disabled(disabled);
    }

    /// Observation kinds the orchestrator should forward while this page is mounted
    fn observed_kinds(&self) -> &'static [ObservationKind] {
        &[]
    }

    fn on_input(&mut self, _input: &PageInput, _ctx: &mut PageContext) {}

    fn on_observation(&mut self, _observation: &HardwareObservation) {}

    /// Called after every observation; pages with a local precondition may
    /// advance the flow here without user input.
    fn try_auto_transition(&mut self, _ctx: &mut PageContext) {}

    fn on_response(
        &mut self,
        action: RequestAction,
        result: Result<StateResult>,
        ctx: &mut PageContext,
    ) {
        let own_state = self.state();
        self.frame_mut().route_result(own_state, action, result, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> PageFrame {
        PageFrame::new(ControlNode::group("root", vec![ControlNode::button("next", "next")]))
    }

    #[test]
    fn guard_rejects_second_outstanding_request() {
        let mut guard = RequestGuard::default();
        let mut ctx = PageContext::new();
        guard.issue(DeviceRequest::BeginRma, &mut ctx).unwrap();
        assert!(matches!(
            guard.issue(DeviceRequest::BeginRma, &mut ctx),
            Err(WizardError::DuplicateRequest(RequestAction::BeginRma))
        ));
        assert_eq!(ctx.effects().len(), 1);

        assert!(guard.settle(RequestAction::BeginRma));
        guard.issue(DeviceRequest::BeginRma, &mut ctx).unwrap();
        assert_eq!(ctx.effects().len(), 2);
    }

    #[test]
    fn ok_result_transitions_to_new_state() {
        let mut frame = frame();
        let mut ctx = PageContext::new();
        frame.route_result(
            WizardState::Onboarding,
            RequestAction::BeginRma,
            Ok(StateResult::ok(WizardState::Diagnostics)),
            &mut ctx,
        );
        assert_eq!(
            ctx.effects(),
            &[PageEffect::Transition {
                next: WizardState::Diagnostics,
                payload: TransitionPayload::default()
            }]
        );
    }

    #[test]
    fn power_cycle_codes_route_to_reboot_page_disabled() {
        let mut frame = frame();
        let mut ctx = PageContext::new();
        frame.route_result(
            WizardState::ChooseWipeDevice,
            RequestAction::SetWipeDevice,
            Ok(StateResult::with_error(WizardState::ChooseWipeDevice, ErrorCode::ExpectShutdown)),
            &mut ctx,
        );
        assert_eq!(
            ctx.effects(),
            &[PageEffect::Transition {
                next: WizardState::Reboot,
                payload: TransitionPayload::disabled(ErrorCode::ExpectShutdown)
            }]
        );
    }

    #[test]
    fn failure_releases_held_disable_and_sets_banner() {
        let mut frame = frame();
        let mut ctx = PageContext::new();
        frame.hold_disable(&mut ctx);
        frame.route_result(
            WizardState::Onboarding,
            RequestAction::BeginRma,
            Err(WizardError::HardwareRequest {
                action: RequestAction::BeginRma,
                message: "timeout".to_string(),
            }),
            &mut ctx,
        );
        assert_eq!(
            ctx.effects(),
            &[PageEffect::Disable(true), PageEffect::Disable(false)]
        );
        assert!(frame.failure.as_deref().unwrap().contains("timeout"));
    }

    #[test]
    fn disable_is_released_only_after_the_last_hold() {
        let mut frame = frame();
        let mut ctx = PageContext::new();
        frame.hold_disable(&mut ctx);
        frame.hold_disable(&mut ctx);
        frame.fail("first failed".to_string(), &mut ctx);
        assert!(frame.holds_disable());
        assert_eq!(ctx.effects(), &[PageEffect::Disable(true)]);

        frame.fail("second failed".to_string(), &mut ctx);
        assert!(!frame.holds_disable());
        assert_eq!(
            ctx.effects(),
            &[PageEffect::Disable(true), PageEffect::Disable(false)]
        );
    }

    #[test]
    fn input_kind_follows_control_kind() {
        assert_eq!(
            PageInput::for_control(&ControlNode::radio("wipe-device", "wipe")),
            Some(PageInput::select("wipe-device"))
        );
        assert_eq!(
            PageInput::for_control(&ControlNode::group("g", vec![])),
            None
        );
    }
}
