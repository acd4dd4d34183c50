use thiserror::Error;

use crate::rma::{ObservationKind, RequestAction, WizardState};

#[derive(Error, Debug)]
pub enum WizardError {
    /// The state mapping has no entry for the requested state. Never recoverable.
    #[error("no page registered for wizard state {0}")]
    UnknownState(WizardState),

    #[error("a page is already mounted ({0})")]
    AlreadyMounted(WizardState),

    #[error("request {0} is already outstanding")]
    DuplicateRequest(RequestAction),

    #[error("observer for {kind} failed: {message}")]
    ObserverHandler {
        kind: ObservationKind,
        message: String,
    },

    #[error("hardware request {action} failed: {message}")]
    HardwareRequest {
        action: RequestAction,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
