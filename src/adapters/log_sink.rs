//! Log-based change sink adapter.
//!
//! Implements [`ChangeSink`] by writing every state change to the `log`
//! facade. A host integration would implement the same trait to push
//! updates to its entity model.

use log::{debug, info};

use crate::app::events::ChangeEvent;
use crate::app::ports::ChangeSink;
use crate::app::state::DeviceState;

/// Adapter that logs every [`ChangeEvent`].
#[derive(Debug, Default)]
pub struct LogChangeSink;

impl LogChangeSink {
    pub fn new() -> Self {
        Self
    }
}

fn describe(state: &DeviceState) -> String {
    match (state.power, state.hsv, state.preset) {
        (None, _, _) => "unknown".into(),
        (Some(false), _, _) => "off".into(),
        (Some(true), Some(hsv), _) => {
            format!("on | hsv=({}, {}%, {}%)", hsv.h, hsv.s, hsv.v)
        }
        (Some(true), None, Some(preset)) => format!(
            "on | preset={} brightness={}%",
            preset,
            state.brightness.unwrap_or_default()
        ),
        (Some(true), None, None) => "on".into(),
    }
}

impl ChangeSink for LogChangeSink {
    fn emit(&self, event: &ChangeEvent) {
        match event {
            ChangeEvent::Acknowledged(_) => debug!("ACK   | command acknowledged"),
            ChangeEvent::Applied(state) => info!("APPLY | {}", describe(state)),
            ChangeEvent::Reported(state) => info!("STATE | {}", describe(state)),
        }
    }
}
