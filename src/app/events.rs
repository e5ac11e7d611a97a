//! Outbound change events.
//!
//! The [`ProtocolEngine`](super::engine::ProtocolEngine) emits these through
//! the [`ChangeSink`](super::ports::ChangeSink) port. Every variant carries
//! the state as it stood right after the change.

use super::state::DeviceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// An ACK notification arrived. The state itself may be unchanged, but
    /// listeners are told that the device responded.
    Acknowledged(DeviceState),

    /// A status notification overwrote the state.
    Reported(DeviceState),

    /// A command was acknowledged and its effect applied optimistically.
    Applied(DeviceState),
}

impl ChangeEvent {
    pub fn state(&self) -> &DeviceState {
        match self {
            Self::Acknowledged(s) | Self::Reported(s) | Self::Applied(s) => s,
        }
    }
}
