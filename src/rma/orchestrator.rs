use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::mapping::{PageAttributes, StateComponentMapping};
use super::observer::{HardwareObservation, ObservationKind, SubscriptionHandle};
use super::pages::{Outcome, PageContext, PageEffect, PageInput, StepPage, TransitionPayload};
use super::service::{DeviceRequest, DeviceService, RequestAction};
use super::state::{StateResult, WizardState};
use crate::error::{Result, WizardError};

/// Identifies one mounting of a page. A page mounted twice gets two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

/// A request result tagged with the page that issued it
#[derive(Debug)]
pub struct Completion {
    pub mount: MountId,
    pub action: RequestAction,
    pub result: Result<StateResult>,
}

/// Something the orchestrator must react to
#[derive(Debug)]
pub enum Inbound {
    /// Observation forwarded for a mounted page (`Some`) or the wizard shell (`None`)
    Observation {
        mount: Option<MountId>,
        observation: HardwareObservation,
    },
    Completion(Completion),
}

struct ActivePage {
    mount: MountId,
    page: Box<dyn StepPage>,
    subscriptions: Vec<SubscriptionHandle>,
}

/// Owns the single mounted step page and the global disable flag.
///
/// Pages report what they want through `PageEffect`s; this type is the only
/// place that swaps pages or changes `all_buttons_disabled`.
pub struct Orchestrator {
    service: Arc<dyn DeviceService>,
    mapping: StateComponentMapping,
    initial_state: WizardState,
    components: Vec<String>,
    active: Option<ActivePage>,
    all_buttons_disabled: bool,
    next_mount: u64,
    inbound_tx: mpsc::UnboundedSender<Inbound>,
    inbound_rx: mpsc::UnboundedReceiver<Inbound>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    shell_subscriptions: Vec<SubscriptionHandle>,
    history: Vec<WizardState>,
    outcome: Option<Outcome>,
}

fn forward(
    tx: mpsc::UnboundedSender<Inbound>,
    mount: Option<MountId>,
) -> impl Fn(&HardwareObservation) -> Result<()> + Send + Sync + 'static {
    move |observation| {
        tx.send(Inbound::Observation {
            mount,
            observation: *observation,
        })
        .map_err(|_| WizardError::ObserverHandler {
            kind: observation.kind(),
            message: "wizard is no longer running".to_string(),
        })
    }
}

impl Orchestrator {
    pub fn new(service: Arc<dyn DeviceService>, initial_state: WizardState) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let shell_subscriptions = [ObservationKind::HardwareError, ObservationKind::RebootPending]
            .into_iter()
            .map(|kind| {
                service
                    .observers()
                    .subscribe(kind, forward(inbound_tx.clone(), None))
            })
            .collect();

        Self {
            service,
            mapping: StateComponentMapping::standard(),
            initial_state,
            components: Vec::new(),
            active: None,
            all_buttons_disabled: false,
            next_mount: 0,
            inbound_tx,
            inbound_rx,
            in_flight: FuturesUnordered::new(),
            shell_subscriptions,
            history: Vec::new(),
            outcome: None,
        }
    }

    pub fn with_mapping(mut self, mapping: StateComponentMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Components offered on the component selection page
    pub fn with_components(mut self, components: Vec<String>) -> Self {
        self.components = components;
        self
    }

    pub fn current_state(&self) -> Option<WizardState> {
        self.active.as_ref().map(|active| active.page.state())
    }

    pub fn active_page(&self) -> Option<&dyn StepPage> {
        self.active.as_ref().map(|active| active.page.as_ref())
    }

    pub fn mount_id(&self) -> Option<MountId> {
        self.active.as_ref().map(|active| active.mount)
    }

    pub fn all_buttons_disabled(&self) -> bool {
        self.all_buttons_disabled
    }

    /// States mounted so far, oldest first
    pub fn history(&self) -> &[WizardState] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn mount_initial_state(&mut self) -> Result<()> {
        if let Some(state) = self.current_state() {
            return Err(WizardError::AlreadyMounted(state));
        }
        self.mount(self.initial_state, TransitionPayload::default())
    }

    pub fn handle_disable_request(&mut self, disable: bool) {
        if disable == self.all_buttons_disabled {
            debug!("Disable flag already {}", disable);
            return;
        }
        self.all_buttons_disabled = disable;
        if let Some(active) = self.active.as_mut() {
            active.page.on_all_buttons_disabled_changed(disable);
        }
    }

    pub fn handle_transition_request(
        &mut self,
        next: WizardState,
        payload: TransitionPayload,
    ) -> Result<()> {
        self.mount(next, payload)
    }

    /// Build the page for `next` and swap it in. The new page is constructed
    /// before the old one is torn down so a failed lookup leaves the current
    /// page in place.
    fn mount(&mut self, next: WizardState, payload: TransitionPayload) -> Result<()> {
        let attributes = PageAttributes {
            error_code: payload.error_code,
            components: self.components.clone(),
        };
        let mut page = self.mapping.build(next, &attributes)?;

        if let Some(previous) = self.unmount() {
            info!("Leaving {}", previous);
        }

        self.next_mount += 1;
        let mount = MountId(self.next_mount);
        let subscriptions = page
            .observed_kinds()
            .iter()
            .map(|kind| {
                self.service
                    .observers()
                    .subscribe(*kind, forward(self.inbound_tx.clone(), Some(mount)))
            })
            .collect();

        self.all_buttons_disabled = payload.disable_on_entry;
        page.on_all_buttons_disabled_changed(self.all_buttons_disabled);

        info!(
            "Mounted {} ({}){}",
            next,
            page.tag(),
            if payload.disable_on_entry { " disabled" } else { "" }
        );
        self.history.push(next);
        self.active = Some(ActivePage {
            mount,
            page,
            subscriptions,
        });
        Ok(())
    }

    fn unmount(&mut self) -> Option<WizardState> {
        let active = self.active.take()?;
        for handle in active.subscriptions {
            self.service.observers().unsubscribe(handle);
        }
        Some(active.page.state())
    }

    /// Route user input to the active page. Input aimed at a control that is
    /// disabled, hidden or unknown is dropped.
    pub fn handle_input(&mut self, input: PageInput) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        if !active.page.controls().is_actionable(input.control_id()) {
            debug!("Dropping {:?}: control not actionable", input);
            return Ok(());
        }

        let mut ctx = PageContext::new();
        active.page.on_input(&input, &mut ctx);
        let mount = active.mount;
        self.apply(mount, ctx)
    }

    /// Wait for the next observation or request completion
    pub async fn next_inbound(&mut self) -> Option<Inbound> {
        let has_in_flight = !self.in_flight.is_empty();
        tokio::select! {
            Some(inbound) = self.inbound_rx.recv() => Some(inbound),
            Some(completion) = self.in_flight.next(), if has_in_flight => {
                Some(Inbound::Completion(completion))
            }
            else => None,
        }
    }

    /// Handle everything that is ready right now without waiting
    pub fn process_pending(&mut self) -> Result<()> {
        loop {
            if let Ok(inbound) = self.inbound_rx.try_recv() {
                self.handle_inbound(inbound)?;
                continue;
            }
            match self.in_flight.next().now_or_never() {
                Some(Some(completion)) => self.handle_inbound(Inbound::Completion(completion))?,
                _ => return Ok(()),
            }
        }
    }

    pub fn handle_inbound(&mut self, inbound: Inbound) -> Result<()> {
        match inbound {
            Inbound::Observation {
                mount: None,
                observation,
            } => self.handle_shell_observation(observation),
            Inbound::Observation {
                mount: Some(mount),
                observation,
            } => {
                let Some(active) = self.active.as_mut().filter(|a| a.mount == mount) else {
                    debug!("Dropping {:?} for unmounted page", observation);
                    return Ok(());
                };
                let mut ctx = PageContext::new();
                active.page.on_observation(&observation);
                active.page.try_auto_transition(&mut ctx);
                self.apply(mount, ctx)
            }
            Inbound::Completion(completion) => {
                let Some(active) = self.active.as_mut().filter(|a| a.mount == completion.mount)
                else {
                    debug!(
                        "Ignoring late {} result for unmounted page",
                        completion.action
                    );
                    return Ok(());
                };
                let mut ctx = PageContext::new();
                active
                    .page
                    .on_response(completion.action, completion.result, &mut ctx);
                self.apply(completion.mount, ctx)
            }
        }
    }

    fn handle_shell_observation(&mut self, observation: HardwareObservation) -> Result<()> {
        match observation {
            HardwareObservation::HardwareError { code } => {
                if self.current_state() == Some(WizardState::CriticalError) {
                    return Ok(());
                }
                warn!("Hardware error reported: {}", code);
                self.handle_transition_request(
                    WizardState::CriticalError,
                    TransitionPayload::disabled(code),
                )
            }
            HardwareObservation::RebootPending { code } => {
                info!("Device announced {}", code);
                self.handle_transition_request(WizardState::Reboot, TransitionPayload::disabled(code))
            }
            HardwareObservation::WriteProtectChanged { .. } => Ok(()),
        }
    }

    /// Apply a page's effects in the order it produced them. Once a transition
    /// swaps the page out, whatever the old page asked for afterwards is stale.
    fn apply(&mut self, origin: MountId, ctx: PageContext) -> Result<()> {
        for effect in ctx.into_effects() {
            if self.mount_id() != Some(origin) {
                debug!("Dropping {:?} from unmounted page", effect);
                continue;
            }
            match effect {
                PageEffect::Disable(disable) => self.handle_disable_request(disable),
                PageEffect::Transition { next, payload } => {
                    self.handle_transition_request(next, payload)?
                }
                PageEffect::Request(request) => self.issue(origin, request),
                PageEffect::Finish(outcome) => {
                    info!("Wizard finished: {:?}", outcome);
                    self.outcome = Some(outcome);
                }
            }
        }
        Ok(())
    }

    fn issue(&mut self, mount: MountId, request: DeviceRequest) {
        info!("Requesting {}", request.describe());
        let deferred = self.service.request(request);
        let action = deferred.action();
        self.in_flight.push(
            async move {
                Completion {
                    mount,
                    action,
                    result: deferred.await,
                }
            }
            .boxed(),
        );
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        self.unmount();
        for handle in self.shell_subscriptions.drain(..) {
            self.service.observers().unsubscribe(handle);
        }
    }
}
