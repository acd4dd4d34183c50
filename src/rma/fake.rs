use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::observer::{EmitReport, HardwareObservation, ObserverRegistry};
use super::service::{Deferred, DeviceRequest, DeviceService, RequestAction};
use super::state::{ErrorCode, StateResult, WizardState};
use crate::error::{Result, WizardError};

struct HeldResponse {
    action: RequestAction,
    tx: oneshot::Sender<Result<StateResult>>,
    result: Result<StateResult>,
}

#[derive(Default)]
struct FakeState {
    states: Vec<StateResult>,
    cursor: usize,
    overrides: HashMap<RequestAction, VecDeque<std::result::Result<StateResult, String>>>,
    held_actions: HashSet<RequestAction>,
    held: Vec<HeldResponse>,
    requests: Vec<DeviceRequest>,
}

/// In-process device backend. Responses follow a scripted list of states and
/// can be overridden or held back; observations are triggered on demand.
#[derive(Default)]
pub struct FakeDeviceService {
    observers: Arc<ObserverRegistry>,
    state: Mutex<FakeState>,
}

impl FakeDeviceService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend scripted to walk through `states` in order
    pub fn with_states(states: &[WizardState]) -> Self {
        let service = Self::new();
        service.set_states(states.iter().copied().map(StateResult::ok).collect());
        service
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_states(&self, states: Vec<StateResult>) {
        let mut inner = self.lock();
        inner.states = states;
        inner.cursor = 0;
    }

    pub fn current_state(&self) -> Option<StateResult> {
        let inner = self.lock();
        inner.states.get(inner.cursor).copied()
    }

    /// Queue a one-shot response for the next request with `action`.
    /// An `Err` message rejects the request.
    pub fn set_result(&self, action: RequestAction, result: std::result::Result<StateResult, String>) {
        self.lock().overrides.entry(action).or_default().push_back(result);
    }

    /// Keep responses to `action` unresolved until `release` is called
    pub fn hold(&self, action: RequestAction) {
        self.lock().held_actions.insert(action);
    }

    /// Resolve every held response for `action`. Returns how many were released.
    pub fn release(&self, action: RequestAction) -> usize {
        let released: Vec<HeldResponse> = {
            let mut inner = self.lock();
            inner.held_actions.remove(&action);
            let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut inner.held)
                .into_iter()
                .partition(|held| held.action == action);
            inner.held = rest;
            matching
        };

        let count = released.len();
        for held in released {
            if held.tx.send(held.result).is_err() {
                debug!("Held {} response had no receiver", held.action);
            }
        }
        count
    }

    pub fn requests(&self) -> Vec<DeviceRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self, action: RequestAction) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|request| request.action() == action)
            .count()
    }

    /// Clear scripted states, recorded requests, held responses and observers
    pub fn reset(&self) {
        *self.lock() = FakeState::default();
        self.observers.clear();
    }

    pub fn trigger_write_protect_observer(&self, enabled: bool, delay_ms: u64) -> Option<EmitReport> {
        self.trigger(HardwareObservation::WriteProtectChanged { enabled }, delay_ms)
    }

    pub fn trigger_hardware_error_observer(&self, code: ErrorCode, delay_ms: u64) -> Option<EmitReport> {
        self.trigger(HardwareObservation::HardwareError { code }, delay_ms)
    }

    pub fn trigger_reboot_observer(&self, code: ErrorCode, delay_ms: u64) -> Option<EmitReport> {
        self.trigger(HardwareObservation::RebootPending { code }, delay_ms)
    }

    /// Emit inline when `delay_ms` is zero, otherwise from a timer task on the
    /// current tokio runtime. Only inline emission reports its outcome.
    fn trigger(&self, observation: HardwareObservation, delay_ms: u64) -> Option<EmitReport> {
        info!("Simulating {:?} after {}ms", observation, delay_ms);
        if delay_ms == 0 {
            return Some(self.observers.emit(&observation));
        }

        let observers = Arc::clone(&self.observers);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            observers.emit(&observation);
        });
        None
    }

    fn respond(inner: &mut FakeState, action: RequestAction) -> Result<StateResult> {
        if let Some(result) = inner.overrides.get_mut(&action).and_then(VecDeque::pop_front) {
            return result.map_err(|message| WizardError::HardwareRequest { action, message });
        }

        let Some(current) = inner.states.get(inner.cursor).copied() else {
            return Err(WizardError::HardwareRequest {
                action,
                message: "no states scripted".to_string(),
            });
        };

        if !action.advances_state() {
            return Ok(StateResult::ok(current.state));
        }

        match inner.states.get(inner.cursor + 1).copied() {
            Some(next) => {
                inner.cursor += 1;
                Ok(next)
            }
            None => Ok(StateResult::with_error(current.state, ErrorCode::TransitionFailed)),
        }
    }
}

impl DeviceService for FakeDeviceService {
    fn request(&self, request: DeviceRequest) -> Deferred {
        let action = request.action();
        debug!("Fake backend received {}", request.describe());

        let mut inner = self.lock();
        inner.requests.push(request);
        let result = Self::respond(&mut inner, action);

        if inner.held_actions.contains(&action) {
            let (tx, deferred) = Deferred::channel(action);
            inner.held.push(HeldResponse { action, tx, result });
            return deferred;
        }
        Deferred::resolved(action, result)
    }

    fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }
}
