//! Outbound device commands.
//!
//! A [`Command`] is constructed per engine call and consumed by encoding.
//! Values are expected to be in range already; the engine clamps before it
//! builds a command.

use heapless::Vec;

use crate::app::color::Hsv;
use crate::error::FrameError;

use super::codec::{CommandKind, Frame, MAX_PAYLOAD_LEN, MODE_COLOR, MODE_PRESET, encode_command};

/// A request to transition device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PowerSet(bool),
    ColorSet(Hsv),
    PresetSet { preset: u8, brightness: u8 },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::PowerSet(_) => CommandKind::Power,
            Self::ColorSet(_) | Self::PresetSet { .. } => CommandKind::ColorPreset,
        }
    }

    /// Payload bytes, excluding the frame header and checksum.
    pub fn payload(&self) -> Vec<u8, MAX_PAYLOAD_LEN> {
        let mut out = Vec::new();
        match *self {
            Self::PowerSet(on) => {
                let _ = out.push(u8::from(on));
            }
            Self::ColorSet(hsv) => {
                let _ = out.push(MODE_COLOR);
                let _ = out.extend_from_slice(&hsv.h.to_be_bytes());
                let _ = out.extend_from_slice(&(u16::from(hsv.s) * 10).to_be_bytes());
                let _ = out.extend_from_slice(&(u16::from(hsv.v) * 10).to_be_bytes());
            }
            Self::PresetSet { preset, brightness } => {
                let _ = out.push(MODE_PRESET);
                let _ = out.push(preset);
                let _ = out.extend_from_slice(&(u16::from(brightness) * 10).to_be_bytes());
            }
        }
        out
    }

    pub fn encode(&self) -> Result<Frame, FrameError> {
        encode_command(self.kind(), &self.payload())
    }
}
