use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use super::state::ErrorCode;
use crate::error::Result;

/// Kind of asynchronous hardware event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservationKind {
    WriteProtectChanged,
    HardwareError,
    RebootPending,
}

impl fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObservationKind::WriteProtectChanged => "write-protect-changed",
            ObservationKind::HardwareError => "hardware-error",
            ObservationKind::RebootPending => "reboot-pending",
        })
    }
}

/// A single hardware event as reported by the device backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareObservation {
    WriteProtectChanged { enabled: bool },
    HardwareError { code: ErrorCode },
    RebootPending { code: ErrorCode },
}

impl HardwareObservation {
    pub fn kind(&self) -> ObservationKind {
        match self {
            HardwareObservation::WriteProtectChanged { .. } => ObservationKind::WriteProtectChanged,
            HardwareObservation::HardwareError { .. } => ObservationKind::HardwareError,
            HardwareObservation::RebootPending { .. } => ObservationKind::RebootPending,
        }
    }
}

pub type ObserverHandler = Arc<dyn Fn(&HardwareObservation) -> Result<()> + Send + Sync>;

/// Returned by `subscribe`; pass back to `unsubscribe` to stop delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    id: u64,
    kind: ObservationKind,
}

impl SubscriptionHandle {
    pub fn kind(&self) -> ObservationKind {
        self.kind
    }
}

/// Outcome of one `emit` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub delivered: usize,
    pub failed: usize,
}

struct Subscriber {
    handle: SubscriptionHandle,
    handler: ObserverHandler,
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// In-memory fan-out of hardware observations to registered handlers.
///
/// Handlers run synchronously on the emitting thread in registration order.
/// The subscriber list is snapshotted when `emit` starts, so handlers added
/// during delivery only see later occurrences.
#[derive(Default)]
pub struct ObserverRegistry {
    inner: Mutex<RegistryInner>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe<F>(&self, kind: ObservationKind, handler: F) -> SubscriptionHandle
    where
        F: Fn(&HardwareObservation) -> Result<()> + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        inner.next_id += 1;
        let handle = SubscriptionHandle {
            id: inner.next_id,
            kind,
        };
        inner.subscribers.push(Subscriber {
            handle,
            handler: Arc::new(handler),
        });
        debug!("Subscribed observer {} for {}", handle.id, kind);
        handle
    }

    /// Returns false if the handle was already removed
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut inner = self.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| s.handle != handle);
        before != inner.subscribers.len()
    }

    pub fn subscriber_count(&self, kind: ObservationKind) -> usize {
        self.lock()
            .subscribers
            .iter()
            .filter(|s| s.handle.kind == kind)
            .count()
    }

    pub fn clear(&self) {
        self.lock().subscribers.clear();
    }

    pub fn emit(&self, observation: &HardwareObservation) -> EmitReport {
        let kind = observation.kind();
        let handlers: Vec<ObserverHandler> = self
            .lock()
            .subscribers
            .iter()
            .filter(|s| s.handle.kind == kind)
            .map(|s| Arc::clone(&s.handler))
            .collect();

        let mut report = EmitReport::default();
        for handler in handlers {
            match handler(observation) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("Observer for {} failed: {}", kind, e);
                    report.failed += 1;
                }
            }
        }
        debug!(
            "Emitted {:?}: {} delivered, {} failed",
            observation, report.delivered, report.failed
        );
        report
    }
}
