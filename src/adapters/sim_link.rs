//! In-process controller emulator.
//!
//! [`SimulatedDevice`] implements [`Link`] without a radio: it validates
//! every written frame, applies it to an emulated controller and answers
//! through a [`NotificationInbox`] exactly like the real notify
//! characteristic would: an ACK first, then optionally a status report.
//!
//! ## Emitted notification layout
//!
//! ```text
//! ACK     AA <kind> 00 <cs>
//! Off     AA 01 08 00 00 00 00 <mode> 00 00 00 <cs>                 (12 B)
//! Colour  AA 01 0B 00 00 00 01 01 <h:2> <s*10:2> <v*10:2> <cs>      (15 B)
//! Preset  AA 01 08 00 00 00 01 02 <id> <bri*10:2> <cs>              (12 B)
//! ```

use core::fmt;

use log::{debug, warn};

use crate::app::color::{HUE_MAX, PERCENT_MAX};
use crate::protocol::channels::{NotificationInbox, deliver_notification};
use crate::protocol::codec::{
    ACK_LEN, CommandKind, FRAME_PREFIX, MODE_COLOR, MODE_PRESET, checksum, verify_checksum,
};
use crate::protocol::effects::{PRESET_MAX, PRESET_MIN};
use crate::protocol::link::Link;

const STATUS_KIND: u8 = 0x01;
const STATUS_HEADER_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    NotConnected,
    /// Injected failure.
    Refused,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "simulated device: not connected"),
            Self::Refused => write!(f, "simulated device: refused"),
        }
    }
}

/// Behaviour switches for the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    /// Send an ACK for every accepted frame.
    pub ack: bool,
    /// Follow each ACK with a status notification.
    pub report_status: bool,
    pub fail_connect: bool,
    pub fail_write: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            ack: true,
            report_status: true,
            fail_connect: false,
            fail_write: false,
        }
    }
}

/// What the emulated controller is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimMode {
    /// Hue 0–359, saturation and value in tenths of a percent.
    Color { h: u16, s: u16, v: u16 },
    /// Preset id, brightness in tenths of a percent.
    Preset { id: u8, brightness: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatedController {
    pub power: bool,
    pub mode: SimMode,
}

impl Default for EmulatedController {
    fn default() -> Self {
        Self {
            power: false,
            mode: SimMode::Color { h: 0, s: 0, v: 1000 },
        }
    }
}

impl EmulatedController {
    /// Apply a checksum-valid frame. Returns `false` when the frame is not
    /// a command the controller understands.
    fn apply(&mut self, kind: u8, payload: &[u8]) -> bool {
        match (kind, payload) {
            (k, [on]) if k == CommandKind::Power as u8 => {
                self.power = *on != 0;
                true
            }
            (k, [MODE_COLOR, hh, hl, sh, sl, vh, vl]) if k == CommandKind::ColorPreset as u8 => {
                let tenths_max = u16::from(PERCENT_MAX) * 10;
                self.mode = SimMode::Color {
                    h: u16::from_be_bytes([*hh, *hl]).min(HUE_MAX),
                    s: u16::from_be_bytes([*sh, *sl]).min(tenths_max),
                    v: u16::from_be_bytes([*vh, *vl]).min(tenths_max),
                };
                true
            }
            (k, [MODE_PRESET, id, bh, bl]) if k == CommandKind::ColorPreset as u8 => {
                self.mode = SimMode::Preset {
                    id: (*id).clamp(PRESET_MIN, PRESET_MAX),
                    brightness: u16::from_be_bytes([*bh, *bl]).min(u16::from(PERCENT_MAX) * 10),
                };
                true
            }
            _ => false,
        }
    }

    /// Status report in the controller's notification format.
    pub fn status_frame(&self) -> Vec<u8> {
        let mut out = vec![FRAME_PREFIX, STATUS_KIND, 0, 0, 0, 0];
        debug_assert_eq!(out.len(), STATUS_HEADER_LEN);
        out.push(u8::from(self.power));
        match self.mode {
            SimMode::Color { h, s, v } if self.power => {
                out.push(MODE_COLOR);
                out.extend_from_slice(&h.to_be_bytes());
                out.extend_from_slice(&s.to_be_bytes());
                out.extend_from_slice(&v.to_be_bytes());
            }
            SimMode::Preset { id, brightness } if self.power => {
                out.push(MODE_PRESET);
                out.push(id);
                out.extend_from_slice(&brightness.to_be_bytes());
            }
            SimMode::Color { .. } => out.extend_from_slice(&[MODE_COLOR, 0, 0, 0]),
            SimMode::Preset { .. } => out.extend_from_slice(&[MODE_PRESET, 0, 0, 0]),
        }
        out[2] = (out.len() - 3) as u8;
        out.push(checksum(&out));
        out
    }
}

/// Emulated controller behind the [`Link`] port.
pub struct SimulatedDevice<'a> {
    inbox: &'a NotificationInbox,
    options: SimOptions,
    connected: bool,
    controller: EmulatedController,
    writes: Vec<Vec<u8>>,
}

impl<'a> SimulatedDevice<'a> {
    pub fn new(inbox: &'a NotificationInbox) -> Self {
        Self::with_options(inbox, SimOptions::default())
    }

    pub fn with_options(inbox: &'a NotificationInbox, options: SimOptions) -> Self {
        Self {
            inbox,
            options,
            connected: false,
            controller: EmulatedController::default(),
            writes: Vec::new(),
        }
    }

    pub fn controller(&self) -> &EmulatedController {
        &self.controller
    }

    /// Every frame written so far, in order.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    fn notify(&self, data: &[u8]) {
        debug!("sim: notify {:02x?}", data);
        deliver_notification(self.inbox, data);
    }
}

impl Link for SimulatedDevice<'_> {
    type Error = SimError;

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), SimError> {
        if self.options.fail_connect {
            return Err(SimError::Refused);
        }
        self.connected = true;
        Ok(())
    }

    async fn write(&mut self, frame: &[u8]) -> Result<(), SimError> {
        if !self.connected {
            return Err(SimError::NotConnected);
        }
        if self.options.fail_write {
            return Err(SimError::Refused);
        }
        self.writes.push(frame.to_vec());

        // Malformed frames are ignored silently, as the controller does.
        let well_formed = frame.len() >= ACK_LEN
            && frame[0] == FRAME_PREFIX
            && usize::from(frame[2]) + ACK_LEN == frame.len()
            && verify_checksum(frame);
        if !well_formed {
            warn!("sim: ignoring malformed frame {:02x?}", frame);
            return Ok(());
        }

        let kind = frame[1];
        if !self.controller.apply(kind, &frame[3..frame.len() - 1]) {
            warn!("sim: ignoring unknown command {:02x?}", frame);
            return Ok(());
        }

        if self.options.ack {
            let mut ack = [FRAME_PREFIX, kind, 0x00, 0x00];
            ack[3] = checksum(&ack[..3]);
            self.notify(&ack);
        }
        if self.options.report_status {
            let status = self.controller.status_frame();
            self.notify(&status);
        }
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.connected = false;
    }
}
