pub mod config;
pub mod fake;
pub mod mapping;
pub mod observer;
pub mod orchestrator;
pub mod pages;
pub mod service;
pub mod state;

pub use config::WizardConfig;
pub use fake::FakeDeviceService;
pub use mapping::{PageAttribute, PageAttributes, StateComponentMapping};
pub use observer::{EmitReport, HardwareObservation, ObservationKind, ObserverRegistry};
pub use orchestrator::{Inbound, MountId, Orchestrator};
pub use pages::{Outcome, PageInput, StepPage, TransitionPayload};
pub use service::{Deferred, DeviceRequest, DeviceService, RequestAction};
pub use state::{ErrorCode, StateResult, WizardState};
