//! # Registration Signal
//!
//! Single-slot completion signal. Raising it never blocks; raising it again
//! before anyone took it collapses into one pending notification.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Coalescing "registration complete" flag
#[derive(Debug, Default)]
pub struct RegistrationSignal {
    pending: AtomicBool,
    notify: Notify,
}

impl RegistrationSignal {
    /// Create a lowered signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal; returns false if it was already pending
    pub fn notify(&self) -> bool {
        let raised = !self.pending.swap(true, Ordering::AcqRel);
        if raised {
            self.notify.notify_one();
        }
        raised
    }

    /// Take the signal if pending
    pub fn try_take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Check without taking
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait until the signal is raised, then take it
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            if self.try_take() {
                return;
            }
            notified.await;
        }
    }
}
