//! Latest-state signal sink.
//!
//! Implements [`ChangeSink`] by publishing the state carried by every
//! event into an `embassy-sync` [`Signal`]. Intermediate states are
//! overwritten, so a slow consumer always wakes to the newest one.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::app::events::ChangeEvent;
use crate::app::ports::ChangeSink;
use crate::app::state::DeviceState;

pub struct SignalSink {
    latest: Signal<CriticalSectionRawMutex, DeviceState>,
}

impl Default for SignalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSink {
    pub const fn new() -> Self {
        Self {
            latest: Signal::new(),
        }
    }

    /// Wait for the next change and return the state it left behind.
    pub async fn wait(&self) -> DeviceState {
        self.latest.wait().await
    }

    /// Take the pending state without waiting.
    pub fn try_take(&self) -> Option<DeviceState> {
        self.latest.try_take()
    }
}

impl ChangeSink for SignalSink {
    fn emit(&self, event: &ChangeEvent) {
        self.latest.signal(*event.state());
    }
}
