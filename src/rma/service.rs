use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use super::observer::{HardwareObservation, ObservationKind, ObserverRegistry, SubscriptionHandle};
use super::state::StateResult;
use crate::error::{Result, WizardError};

/// Logical action a request performs. Pages allow one outstanding request per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestAction {
    BeginRma,
    LaunchDiagnostics,
    CompleteDiagnostics,
    SetComponentRepair,
    SetWipeDevice,
    WriteProtectManuallyDisabled,
    WriteProtectManuallyEnabled,
    EndRmaAndReboot,
    CriticalErrorExitToLogin,
    CriticalErrorReboot,
}

impl RequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestAction::BeginRma => "beginRma",
            RequestAction::LaunchDiagnostics => "launchDiagnostics",
            RequestAction::CompleteDiagnostics => "completeDiagnostics",
            RequestAction::SetComponentRepair => "setComponentRepair",
            RequestAction::SetWipeDevice => "setWipeDevice",
            RequestAction::WriteProtectManuallyDisabled => "writeProtectManuallyDisabled",
            RequestAction::WriteProtectManuallyEnabled => "writeProtectManuallyEnabled",
            RequestAction::EndRmaAndReboot => "endRmaAndReboot",
            RequestAction::CriticalErrorExitToLogin => "criticalErrorExitToLogin",
            RequestAction::CriticalErrorReboot => "criticalErrorReboot",
        }
    }

    /// Whether a successful response moves the device to the next scripted state
    pub fn advances_state(&self) -> bool {
        !matches!(
            self,
            RequestAction::LaunchDiagnostics
                | RequestAction::EndRmaAndReboot
                | RequestAction::CriticalErrorExitToLogin
                | RequestAction::CriticalErrorReboot
        )
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request sent to the device backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceRequest {
    BeginRma,
    LaunchDiagnostics,
    CompleteDiagnostics,
    SetComponentRepair { components: Vec<String> },
    SetWipeDevice { wipe: bool },
    WriteProtectManuallyDisabled,
    WriteProtectManuallyEnabled,
    EndRmaAndReboot,
    CriticalErrorExitToLogin,
    CriticalErrorReboot,
}

impl DeviceRequest {
    pub fn action(&self) -> RequestAction {
        match self {
            DeviceRequest::BeginRma => RequestAction::BeginRma,
            DeviceRequest::LaunchDiagnostics => RequestAction::LaunchDiagnostics,
            DeviceRequest::CompleteDiagnostics => RequestAction::CompleteDiagnostics,
            DeviceRequest::SetComponentRepair { .. } => RequestAction::SetComponentRepair,
            DeviceRequest::SetWipeDevice { .. } => RequestAction::SetWipeDevice,
            DeviceRequest::WriteProtectManuallyDisabled => RequestAction::WriteProtectManuallyDisabled,
            DeviceRequest::WriteProtectManuallyEnabled => RequestAction::WriteProtectManuallyEnabled,
            DeviceRequest::EndRmaAndReboot => RequestAction::EndRmaAndReboot,
            DeviceRequest::CriticalErrorExitToLogin => RequestAction::CriticalErrorExitToLogin,
            DeviceRequest::CriticalErrorReboot => RequestAction::CriticalErrorReboot,
        }
    }

    /// Human readable form for logs and the activity line
    pub fn describe(&self) -> String {
        match self {
            DeviceRequest::SetComponentRepair { components } => {
                format!("{}({})", self.action(), components.join(","))
            }
            DeviceRequest::SetWipeDevice { wipe } => format!("{}({wipe})", self.action()),
            _ => self.action().to_string(),
        }
    }
}

/// Result of a device request that may not have arrived yet
pub struct Deferred {
    action: RequestAction,
    rx: oneshot::Receiver<Result<StateResult>>,
}

impl Deferred {
    /// Create a pending result and the sender that resolves it
    pub fn channel(action: RequestAction) -> (oneshot::Sender<Result<StateResult>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self { action, rx })
    }

    pub fn resolved(action: RequestAction, result: Result<StateResult>) -> Self {
        let (tx, deferred) = Self::channel(action);
        // The receiver is held by `deferred`, so this send cannot fail.
        let _ = tx.send(result);
        deferred
    }

    pub fn action(&self) -> RequestAction {
        self.action
    }
}

impl Future for Deferred {
    type Output = Result<StateResult>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let action = self.action;
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(WizardError::HardwareRequest {
                    action,
                    message: "device backend dropped the request".to_string(),
                })
            })
        })
    }
}

/// Boundary to the hardware management backend
pub trait DeviceService: Send + Sync {
    fn request(&self, request: DeviceRequest) -> Deferred;

    fn observers(&self) -> &ObserverRegistry;

    fn register_observer<F>(&self, kind: ObservationKind, handler: F) -> SubscriptionHandle
    where
        F: Fn(&HardwareObservation) -> Result<()> + Send + Sync + 'static,
        Self: Sized,
    {
        self.observers().subscribe(kind, handler)
    }
}
